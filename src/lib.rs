pub mod api;
pub mod config;
pub mod database;
pub mod error;
pub mod filter;
pub mod handlers;
pub mod middleware;
pub mod server;
pub mod services;

#[cfg(test)]
pub mod testing;
