// src/store/mod.rs

pub mod error;
pub mod sessions;
pub mod todos;
pub mod users;
