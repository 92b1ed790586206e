pub mod config;
mod config_env;
pub mod health_assistant;
pub mod identity;
pub mod llm;
pub mod models;
pub mod repos;
