pub mod traits;
pub mod youtube;
