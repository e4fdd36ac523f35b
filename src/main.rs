use actix_web::{web, App, HttpServer};
use dotenv::dotenv;
use std::env;

use todo_backend::{db, routes};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    env_logger::init();

    let database_url =
        env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://todo.db?mode=rwc".to_string());
    let pool = db::connect(&database_url)
        .await
        .expect("Failed to create pool");
    db::init_schema(&pool)
        .await
        .expect("Failed to initialize schema");

    let server_address = "0.0.0.0:8080";
    println!("Server running at http://{}", server_address);

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(pool.clone()))
            .configure(routes::routes::auth_configure)
            .configure(routes::routes::todo_configure)
    })
    .bind(server_address)?
    .run()
    .await
}
