//! Configuration, wire models, the project registry, and command expansion

pub mod commands;
pub mod config;
pub mod models;
pub mod projects;
