//! API routes

pub mod config;
pub mod health;
pub mod levels;
pub mod points;
