pub mod config;
pub mod error;
pub mod media;
pub mod profile;
pub mod ticket;
pub mod trace;
pub mod turn;
