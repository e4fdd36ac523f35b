pub mod todo_handlers;
pub mod todo_models;
