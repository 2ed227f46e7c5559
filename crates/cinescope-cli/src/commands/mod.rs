pub mod browse;
pub mod config;
pub mod progress;
pub mod prompts;
pub mod render;
pub mod shell;
