// src/routes/mod.rs

pub mod auth;
pub mod routes;
pub mod todo;
