//! Pair Admin - operator client for country-pair messaging routes.

pub mod api;
pub mod config;
pub mod display;
pub mod routes;
pub mod session;
pub mod stats;
