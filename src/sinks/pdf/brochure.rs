//! Turns an extracted syllabus into the brochure story.

use super::config::Branding;
use super::flowable::{Flowable, Run};
use super::styles::Styles;
use super::units::Pt;
use crate::extract::{strip_symbols, ExtractedRecord, SessionRecord};

const TOPIC_SYMBOLS: &[&str] = &["✨", "🔮", "🤖", "💻", "🎁", "🔥"];

/// `• item` lines separated by line breaks.
fn bulleted(items: &[String]) -> Vec<Run> {
    let mut runs = Vec::with_capacity(items.len() * 2);
    for item in items {
        runs.push(Run::regular(format!("• {item}")));
        runs.push(Run::Break);
    }
    runs
}

/// Drop the decorative emoji and any leading bullet from a webinar topic.
fn clean_topic(topic: &str) -> String {
    let topic = strip_symbols(topic, TOPIC_SYMBOLS);
    match topic.strip_prefix('•') {
        Some(rest) => rest.trim().to_string(),
        None => topic,
    }
}

fn webinar_runs(record: &ExtractedRecord) -> Vec<Run> {
    let webinar = &record.webinar;
    let mut runs = vec![
        Run::bold(strip_symbols(&webinar.date, &["📅"])),
        Run::Break,
        Run::Break,
    ];

    for detail in webinar.details.iter() {
        match detail.split_once(':') {
            Some((key, value)) => {
                runs.push(Run::bold(format!("{key}:")));
                runs.push(Run::regular(value));
            }
            None => runs.push(Run::regular(detail.as_str())),
        }
        runs.push(Run::Break);
    }

    if !webinar.topics.is_empty() {
        runs.push(Run::Break);
        runs.push(Run::bold("Lo que descubrirás:"));
        runs.push(Run::Break);
        for topic in webinar.topics.iter() {
            runs.push(Run::regular(format!("• {}", clean_topic(topic))));
            runs.push(Run::Break);
        }
    }

    runs
}

fn session(session: &SessionRecord, styles: &Styles) -> Flowable {
    let title_style = if session.is_bonus {
        &styles.bonus_title
    } else {
        &styles.session_title
    };

    let mut items = vec![
        Flowable::paragraph(strip_symbols(&session.title, &["🎁"]), title_style),
        Flowable::paragraph(strip_symbols(&session.meta, &["📅"]), &styles.meta),
        Flowable::runs(bulleted(&session.topics), &styles.normal),
    ];

    if let Some(note) = &session.bonus_note {
        items.push(Flowable::Spacer(Pt(6.0)));
        items.push(Flowable::runs(
            vec![Run::bold(strip_symbols(note, &["⚡"]))],
            &styles.meta,
        ));
    }

    Flowable::KeepTogether(items)
}

/// The brochure story, top to bottom.
pub fn story(record: &ExtractedRecord, branding: &Branding) -> Vec<Flowable> {
    let styles = Styles::default();
    let mut story: Vec<Flowable> = Vec::default();

    story.push(Flowable::runs(
        vec![
            Run::bold(branding.name.as_str()),
            Run::regular(format!(" | {}", branding.website)),
        ],
        &styles.header,
    ));
    story.push(Flowable::Spacer(Pt(10.0)));

    story.push(Flowable::paragraph(record.title.as_str(), &styles.title));
    if !record.subtitle.is_empty() {
        story.push(Flowable::paragraph(
            strip_symbols(&record.subtitle, &["🚀"]),
            &styles.subtitle,
        ));
    }
    story.push(Flowable::Spacer(Pt(12.0)));

    if !record.badges.is_empty() {
        story.push(Flowable::paragraph(record.badges.join(" • "), &styles.meta));
        story.push(Flowable::Spacer(Pt(15.0)));
    }

    story.push(Flowable::paragraph(
        "Webinar Gratuito de Introducción",
        &styles.section,
    ));
    story.push(Flowable::runs(webinar_runs(record), &styles.webinar));
    story.push(Flowable::Spacer(Pt(15.0)));

    story.push(Flowable::paragraph(
        "Taller Modular Especializado",
        &styles.section,
    ));
    story.push(Flowable::paragraph(
        "Elige las sesiones que necesites o toma el paquete completo con descuento y sesión bonus.",
        &styles.normal,
    ));
    story.push(Flowable::Spacer(Pt(12.0)));

    for s in record.sessions.iter() {
        story.push(session(s, &styles));
        story.push(Flowable::Spacer(Pt(12.0)));
    }

    story.push(Flowable::Spacer(Pt(15.0)));
    story.push(Flowable::paragraph(
        "Inversión y Opciones de Pago",
        &styles.section,
    ));
    for option in record.pricing.options.iter() {
        story.push(Flowable::paragraph(
            strip_symbols(&option.price, &["🎉"]),
            &styles.price,
        ));
        story.push(Flowable::paragraph(
            option.description.as_str(),
            &styles.normal,
        ));
        story.push(Flowable::Spacer(Pt(8.0)));
    }

    if !record.pricing.includes.is_empty() {
        story.push(Flowable::Spacer(Pt(8.0)));
        story.push(Flowable::paragraph(
            "Todos los paquetes incluyen:",
            &styles.session_title,
        ));
        story.push(Flowable::runs(
            bulleted(&record.pricing.includes),
            &styles.normal,
        ));
    }
    story.push(Flowable::Spacer(Pt(15.0)));

    story.push(Flowable::paragraph("Información y Registro", &styles.section));
    let contact = &record.contact;
    let mut contact_runs: Vec<Run> = Vec::default();
    for (label, value) in [
        ("Email:", &contact.email),
        ("Website:", &contact.website),
        ("WhatsApp:", &contact.whatsapp),
    ] {
        if let Some(value) = value {
            if !contact_runs.is_empty() {
                contact_runs.push(Run::Break);
            }
            contact_runs.push(Run::bold(label));
            contact_runs.push(Run::regular(format!(" {value}")));
        }
    }
    story.push(Flowable::runs(contact_runs, &styles.normal));

    if !contact.process.is_empty() {
        story.push(Flowable::Spacer(Pt(12.0)));
        story.push(Flowable::paragraph(
            "Proceso de registro:",
            &styles.session_title,
        ));
        let mut runs: Vec<Run> = Vec::default();
        for (i, step) in contact.process.iter().enumerate() {
            runs.push(Run::regular(format!("{}. {step}", i + 1)));
            runs.push(Run::Break);
        }
        story.push(Flowable::runs(runs, &styles.normal));
    }

    story.push(Flowable::Spacer(Pt(30.0)));
    for line in branding.footer.iter() {
        story.push(Flowable::paragraph(line.as_str(), &styles.footer));
    }

    story
}
