pub mod search;
pub mod settings;
