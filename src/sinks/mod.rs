pub mod epub;
pub mod pdf;

pub use epub::EPUB;
pub use pdf::PDF;
