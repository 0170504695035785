pub mod category;
pub mod jewelry;
pub mod types;
