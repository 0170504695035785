//! JSON representations returned by the API.

pub mod categories;
pub mod jewelry;
