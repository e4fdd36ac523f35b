use actix_web::{web, HttpRequest, HttpResponse, Responder};
use log::{error, info};
use sqlx::SqlitePool;

use super::todo_models::{ListParams, SearchParams, ToDoItemRequest, ToDoItemResponse};
use crate::models::user::User;
use crate::store::error::StoreError;
use crate::store::sessions;
use crate::store::todos::{self, ToDoFields};

// Resolve the caller from the session cookie. The resolved identity is then
// passed explicitly into every store call; no handler relies on ambient
// auth state.
async fn caller_identity(pool: &SqlitePool, req: &HttpRequest) -> Result<User, HttpResponse> {
    let session_id = match req.cookie("session_id") {
        Some(cookie) => cookie.value().to_string(),
        None => {
            info!("Session ID not found in cookies");
            return Err(HttpResponse::Unauthorized().finish());
        }
    };

    match sessions::find_user(pool, &session_id).await {
        Ok(user) => Ok(user),
        Err(StoreError::AuthFailed) => {
            info!("Invalid or expired session ID: {}", session_id);
            Err(HttpResponse::Unauthorized().finish())
        }
        Err(e) => {
            error!("Failed to resolve session ID {}: {}", session_id, e);
            Err(HttpResponse::InternalServerError().finish())
        }
    }
}

fn fields_from(body: ToDoItemRequest) -> ToDoFields {
    ToDoFields {
        task: body.task,
        due_date: body.due_date,
        status: body.status,
    }
}

// GET / — the caller's items, paginated, optionally sorted. The response
// body is the bare item list, no pagination metadata.
pub async fn get_todo_items(
    pool: web::Data<SqlitePool>,
    req: HttpRequest,
    params: web::Query<ListParams>,
) -> impl Responder {
    let caller = match caller_identity(pool.get_ref(), &req).await {
        Ok(user) => user,
        Err(resp) => return resp,
    };

    match todos::list_by_owner(
        pool.get_ref(),
        &caller,
        params.sort_by.as_deref(),
        params.page,
        params.size,
    )
    .await
    {
        Ok(items) => HttpResponse::Ok().json(items),
        Err(e) => {
            error!("Failed to list to-do items for {}: {}", caller.email, e);
            HttpResponse::InternalServerError().finish()
        }
    }
}

// GET /search — keyword/status filter over the caller's items.
pub async fn search_todo_items(
    pool: web::Data<SqlitePool>,
    req: HttpRequest,
    params: web::Query<SearchParams>,
) -> impl Responder {
    let caller = match caller_identity(pool.get_ref(), &req).await {
        Ok(user) => user,
        Err(resp) => return resp,
    };

    match todos::search(
        pool.get_ref(),
        &caller,
        params.keyword.as_deref(),
        params.status.as_deref(),
        params.page,
        params.size,
    )
    .await
    {
        Ok(items) => HttpResponse::Ok().json(items),
        Err(e) => {
            error!("Failed to search to-do items for {}: {}", caller.email, e);
            HttpResponse::InternalServerError().finish()
        }
    }
}

pub async fn add_todo_item(
    pool: web::Data<SqlitePool>,
    req: HttpRequest,
    body: web::Json<ToDoItemRequest>,
) -> impl Responder {
    let caller = match caller_identity(pool.get_ref(), &req).await {
        Ok(user) => user,
        Err(resp) => return resp,
    };

    let fields = fields_from(body.into_inner());
    match todos::create(pool.get_ref(), &fields, &caller.email).await {
        Ok(item) => {
            info!("To-do item {} added by {}", item.id, caller.email);
            HttpResponse::Created().json(ToDoItemResponse {
                success: true,
                message: "To-do item added successfully.".into(),
            })
        }
        Err(e) => {
            error!("Failed to add to-do item for {}: {}", caller.email, e);
            HttpResponse::InternalServerError().json(ToDoItemResponse {
                success: false,
                message: "Failed to add to-do item.".into(),
            })
        }
    }
}

// PUT /updateToDoItem/{id}. A false return from the store covers both an
// unknown id and someone else's item, so both surface as 404 here.
pub async fn update_todo_item(
    pool: web::Data<SqlitePool>,
    req: HttpRequest,
    path: web::Path<i64>,
    body: web::Json<ToDoItemRequest>,
) -> impl Responder {
    let caller = match caller_identity(pool.get_ref(), &req).await {
        Ok(user) => user,
        Err(resp) => return resp,
    };

    let id = path.into_inner();
    let fields = fields_from(body.into_inner());
    match todos::update(pool.get_ref(), id, &fields, &caller.email).await {
        Ok(true) => HttpResponse::Ok().json(ToDoItemResponse {
            success: true,
            message: "Edit success.".into(),
        }),
        Ok(false) => HttpResponse::NotFound().json(ToDoItemResponse {
            success: false,
            message: "To-do item not found or not authorized to update.".into(),
        }),
        Err(e) => {
            error!("Failed to update to-do item {} for {}: {}", id, caller.email, e);
            HttpResponse::InternalServerError().json(ToDoItemResponse {
                success: false,
                message: "Failed to update to-do item.".into(),
            })
        }
    }
}

// DELETE /deleteToDoItem/{id}. Unlike update, the store distinguishes an
// unknown id (404) from someone else's item (403); the 403 message is the
// store's own, echoed verbatim.
pub async fn delete_todo_item(
    pool: web::Data<SqlitePool>,
    req: HttpRequest,
    path: web::Path<i64>,
) -> impl Responder {
    let caller = match caller_identity(pool.get_ref(), &req).await {
        Ok(user) => user,
        Err(resp) => return resp,
    };

    let id = path.into_inner();
    match todos::delete(pool.get_ref(), id, &caller.email).await {
        Ok(true) => HttpResponse::Ok().json(ToDoItemResponse {
            success: true,
            message: "Delete success.".into(),
        }),
        Ok(false) => HttpResponse::NotFound().json(ToDoItemResponse {
            success: false,
            message: format!("To-do item with id {} not found.", id),
        }),
        Err(StoreError::Forbidden(message)) => {
            HttpResponse::Forbidden().json(ToDoItemResponse {
                success: false,
                message,
            })
        }
        Err(e) => {
            error!("Failed to delete to-do item {} for {}: {}", id, caller.email, e);
            HttpResponse::InternalServerError().json(ToDoItemResponse {
                success: false,
                message: "Failed to delete to-do item.".into(),
            })
        }
    }
}
