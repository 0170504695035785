//! Core library exports for the jewelry catalog service.
//!
//! The `data` feature exposes the domain types, Diesel models and
//! repositories. The default `server` feature adds the media pipeline,
//! services and the Actix-web HTTP layer.

pub mod db;
pub mod domain;
mod error_conversions;
pub mod models;
pub mod repository;
pub mod schema;

#[cfg(feature = "server")]
pub mod auth;
#[cfg(feature = "server")]
pub mod dto;
#[cfg(feature = "server")]
pub mod forms;
#[cfg(feature = "server")]
pub mod media;
#[cfg(feature = "server")]
pub mod routes;
#[cfg(feature = "server")]
pub mod services;
