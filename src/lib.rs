//! Library exports for career-code, shared between the binary and tests.

pub mod auth;
pub mod config;
pub mod gates;
pub mod models;
pub mod providers;
pub mod routes;
pub mod startup;
pub mod state;
pub mod store;
pub mod utils;
