#[cfg(feature = "network")]
pub mod images;
pub mod loader;
pub mod model;
