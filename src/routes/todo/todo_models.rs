use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

fn default_size() -> u32 {
    10
}

// Query parameters for GET /; page and size default to 0 and 10.
#[derive(Deserialize)]
pub struct ListParams {
    #[serde(rename = "sortBy")]
    pub sort_by: Option<String>,
    #[serde(default)]
    pub page: u32,
    #[serde(default = "default_size")]
    pub size: u32,
}

// Query parameters for GET /search.
#[derive(Deserialize)]
pub struct SearchParams {
    pub keyword: Option<String>,
    pub status: Option<String>,
    #[serde(default)]
    pub page: u32,
    #[serde(default = "default_size")]
    pub size: u32,
}

// Body of POST /addToDoItem and PUT /updateToDoItem/{id}. The item id comes
// from the path and the owner from the session, never from the body.
#[derive(Deserialize)]
pub struct ToDoItemRequest {
    pub task: String,
    #[serde(rename = "dueDate", default)]
    pub due_date: Option<NaiveDateTime>,
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Serialize)]
pub struct ToDoItemResponse {
    pub success: bool,
    pub message: String,
}
