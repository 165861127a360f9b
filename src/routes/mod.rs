pub mod auth;
pub mod csrf;
pub mod echo;
pub mod health;
