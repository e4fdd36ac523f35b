// src/models/mod.rs

pub mod session;
pub mod todo;
pub mod user;
