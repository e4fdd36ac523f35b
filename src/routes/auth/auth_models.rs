use serde::{Deserialize, Serialize};

// Registration request and response
#[derive(Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
}

#[derive(Serialize)]
pub struct RegisterResponse {
    pub success: bool,
    pub message: String,
}

// Login request and response
#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Serialize)]
pub struct LoginResponse {
    pub success: bool,
    pub message: String,
}

// Logout response (the request carries no body, only the cookie)
#[derive(Serialize)]
pub struct LogoutResponse {
    pub success: bool,
    pub message: String,
}
