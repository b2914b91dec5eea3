pub mod media;

pub use ytmp3_core::models::{search, settings};
