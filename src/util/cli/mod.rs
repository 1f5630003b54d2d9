pub mod commands;
pub mod load_config;
pub mod prompt;
