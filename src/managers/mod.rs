pub mod connections;
pub mod csrf;
pub mod session;
