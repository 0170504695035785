pub mod category;
#[cfg(feature = "server")]
pub mod config;
pub mod jewelry;
pub mod jewelry_image;
