pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod ingest;
pub mod llm;
pub mod models;
pub mod services;
