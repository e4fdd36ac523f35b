use actix_web::web;

use super::auth::auth_handlers;
use super::todo::todo_handlers;

pub fn auth_configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/register", web::post().to(auth_handlers::register))
        .route("/login", web::post().to(auth_handlers::login))
        .route("/logout", web::post().to(auth_handlers::logout));
}

pub fn todo_configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(todo_handlers::get_todo_items))
        .route("/search", web::get().to(todo_handlers::search_todo_items))
        .route("/addToDoItem", web::post().to(todo_handlers::add_todo_item))
        .route(
            "/updateToDoItem/{id}",
            web::put().to(todo_handlers::update_todo_item),
        )
        .route(
            "/deleteToDoItem/{id}",
            web::delete().to(todo_handlers::delete_todo_item),
        );
}
