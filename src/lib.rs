pub mod analysis;
pub mod analytics;
pub mod auth;
pub mod banner;
pub mod commands;
pub mod config;
pub mod consts;
pub mod data;
pub mod ingest;
pub mod llm;
pub mod logging;
pub mod metrics;
pub mod prompts;
pub mod render;
pub mod session;
pub mod spinner;
