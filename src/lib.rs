pub mod auth;
pub mod cache;
pub mod clock;
pub mod config;
pub mod db;
pub mod engine;
pub mod error;
pub mod handlers;
pub mod models;
pub mod scheduler;
pub mod store;

pub use db::create_pool;
