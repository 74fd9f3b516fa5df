pub mod chat;
pub mod config;
pub mod game;
pub mod night;
pub mod role;
pub mod seat;
pub mod swap;
pub mod vote;
