pub mod api;
pub mod client;
pub mod config;
pub mod cookie;
pub mod managers;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod state;
