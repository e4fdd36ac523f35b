use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ToDo {
    pub id: i64,
    pub user_id: i64,
    pub task: String,
    #[serde(rename = "dueDate")]
    pub due_date: Option<NaiveDateTime>,
    pub status: Option<String>,
}
