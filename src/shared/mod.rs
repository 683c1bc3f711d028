pub mod cache;
pub mod config;
pub mod error;
pub mod infra;
pub mod middleware;
pub mod state;
