//! Subcommand implementations

pub mod config;
pub mod doctor;
pub mod render;
pub mod serve;
pub mod sitemap;
