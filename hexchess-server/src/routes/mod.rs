//! HTTP route handlers

pub mod board;
pub mod game;
pub mod socket;
pub mod status;
