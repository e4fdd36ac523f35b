use actix_web::{web, HttpRequest, HttpResponse, Responder};
use log::{error, info};
use sqlx::SqlitePool;

use super::auth_models::{
    LoginRequest, LoginResponse, LogoutResponse, RegisterRequest, RegisterResponse,
};
use crate::store::error::StoreError;
use crate::store::{sessions, users};

// Register a new user. Every failure, duplicate emails included, comes back
// as a 400 with the same generic message; the detail only goes to the log.
pub async fn register(
    pool: web::Data<SqlitePool>,
    req: web::Json<RegisterRequest>,
) -> impl Responder {
    info!("Received registration request for {}", req.email);

    match users::register(pool.get_ref(), &req.email, &req.password).await {
        Ok(_) => HttpResponse::Created().json(RegisterResponse {
            success: true,
            message: "User registered successfully.".into(),
        }),
        Err(e) => {
            error!("Failed to register {}: {}", req.email, e);
            HttpResponse::BadRequest().json(RegisterResponse {
                success: false,
                message: "Registration failed.".into(),
            })
        }
    }
}

// Verify credentials and hand out a session cookie.
pub async fn login(pool: web::Data<SqlitePool>, req: web::Json<LoginRequest>) -> impl Responder {
    info!("Received login request for {}", req.email);

    let user = match users::authenticate(pool.get_ref(), &req.email, &req.password).await {
        Ok(user) => user,
        Err(StoreError::AuthFailed) => {
            info!("Login rejected for {}", req.email);
            return HttpResponse::Unauthorized().json(LoginResponse {
                success: false,
                message: "Invalid credentials.".into(),
            });
        }
        Err(e) => {
            error!("Failed to authenticate {}: {}", req.email, e);
            return HttpResponse::InternalServerError().json(LoginResponse {
                success: false,
                message: "Failed to check credentials.".into(),
            });
        }
    };

    match sessions::create(pool.get_ref(), user.user_id).await {
        Ok(session) => {
            info!("User {} logged in successfully", user.email);
            HttpResponse::Ok()
                .cookie(
                    actix_web::cookie::Cookie::build("session_id", session.session_id)
                        .http_only(true)
                        .finish(),
                )
                .json(LoginResponse {
                    success: true,
                    message: "Login successful.".into(),
                })
        }
        Err(e) => {
            error!("Failed to create session for {}: {}", user.email, e);
            HttpResponse::InternalServerError().json(LoginResponse {
                success: false,
                message: "Failed to create session.".into(),
            })
        }
    }
}

pub async fn logout(pool: web::Data<SqlitePool>, req: HttpRequest) -> impl Responder {
    let session_id = match req.cookie("session_id") {
        Some(cookie) => cookie.value().to_string(),
        None => {
            info!("Session ID does not exist in cookies for logout");
            return HttpResponse::BadRequest().json(LogoutResponse {
                success: false,
                message: "Session ID does not exist.".into(),
            });
        }
    };

    match sessions::delete(pool.get_ref(), &session_id).await {
        Ok(true) => {
            info!("Logout successful for session ID {}", session_id);
            HttpResponse::Ok().json(LogoutResponse {
                success: true,
                message: "Logout successful.".into(),
            })
        }
        Ok(false) => {
            info!("Session not found for session ID {}", session_id);
            HttpResponse::BadRequest().json(LogoutResponse {
                success: false,
                message: "Session not found.".into(),
            })
        }
        Err(e) => {
            error!("Failed to delete session ID {}: {}", session_id, e);
            HttpResponse::InternalServerError().json(LogoutResponse {
                success: false,
                message: "Failed to logout.".into(),
            })
        }
    }
}
