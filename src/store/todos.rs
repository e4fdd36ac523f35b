use chrono::NaiveDateTime;
use log::{info, warn};
use sqlx::SqlitePool;

use super::error::StoreError;
use super::users;
use crate::models::todo::ToDo;
use crate::models::user::User;

/// The fields a caller may set on a to-do item. The id and the owner are
/// assigned by the store and never taken from the caller.
#[derive(Debug, Clone)]
pub struct ToDoFields {
    pub task: String,
    pub due_date: Option<NaiveDateTime>,
    pub status: Option<String>,
}

const SELECT_COLUMNS: &str = "SELECT id, user_id, task, due_date, status FROM todos";

// Sort keys arrive as caller input, so they are matched against the column
// whitelist instead of being spliced into the query. An unrecognized key
// leaves the order store-defined.
fn sort_column(key: &str) -> Option<&'static str> {
    match key {
        "id" => Some("id"),
        "task" => Some("task"),
        "dueDate" | "due_date" => Some("due_date"),
        "status" => Some("status"),
        _ => None,
    }
}

/// Page through the items owned by `owner`, optionally ordered ascending by
/// a whitelisted column.
pub async fn list_by_owner(
    pool: &SqlitePool,
    owner: &User,
    sort_by: Option<&str>,
    page: u32,
    size: u32,
) -> Result<Vec<ToDo>, StoreError> {
    let sql = match sort_by.and_then(sort_column) {
        Some(col) => format!(
            "{} WHERE user_id = ? ORDER BY {} ASC LIMIT ? OFFSET ?",
            SELECT_COLUMNS, col
        ),
        None => format!("{} WHERE user_id = ? LIMIT ? OFFSET ?", SELECT_COLUMNS),
    };

    let todos = sqlx::query_as::<_, ToDo>(&sql)
        .bind(owner.user_id)
        .bind(size as i64)
        .bind(page as i64 * size as i64)
        .fetch_all(pool)
        .await?;
    Ok(todos)
}

/// Keyword/status search over the items owned by `owner`. The two filters
/// combine with OR, each widening the match on its own: the description
/// must case-insensitively contain `keyword`, or the status must
/// case-insensitively equal `status`. Absent filters become empty strings,
/// so a missing keyword matches every row while a missing status matches
/// only rows whose status is itself empty.
pub async fn search(
    pool: &SqlitePool,
    owner: &User,
    keyword: Option<&str>,
    status: Option<&str>,
    page: u32,
    size: u32,
) -> Result<Vec<ToDo>, StoreError> {
    let sql = format!(
        "{} WHERE user_id = ? \
         AND (LOWER(task) LIKE '%' || LOWER(?) || '%' OR LOWER(status) = LOWER(?)) \
         LIMIT ? OFFSET ?",
        SELECT_COLUMNS
    );

    let todos = sqlx::query_as::<_, ToDo>(&sql)
        .bind(owner.user_id)
        .bind(keyword.unwrap_or(""))
        .bind(status.unwrap_or(""))
        .bind(size as i64)
        .bind(page as i64 * size as i64)
        .fetch_all(pool)
        .await?;
    Ok(todos)
}

/// Create an item for the user behind `owner_email`. Fails with `NotFound`
/// when the email does not resolve to a registered user.
pub async fn create(
    pool: &SqlitePool,
    fields: &ToDoFields,
    owner_email: &str,
) -> Result<ToDo, StoreError> {
    let owner = users::find_by_email(pool, owner_email).await?;

    let result = sqlx::query("INSERT INTO todos (user_id, task, due_date, status) VALUES (?, ?, ?, ?)")
        .bind(owner.user_id)
        .bind(&fields.task)
        .bind(fields.due_date)
        .bind(fields.status.as_deref())
        .execute(pool)
        .await?;

    let id = result.last_insert_rowid();
    info!("To-do item {} created for {}", id, owner_email);
    Ok(ToDo {
        id,
        user_id: owner.user_id,
        task: fields.task.clone(),
        due_date: fields.due_date,
        status: fields.status.clone(),
    })
}

/// Overwrite the task/due-date/status of an existing item. Returns false
/// both when the id is unknown and when the item belongs to someone else;
/// this layer does not distinguish the two (delete below does). The stored
/// owner is kept regardless of what the caller sent.
pub async fn update(
    pool: &SqlitePool,
    id: i64,
    fields: &ToDoFields,
    caller_email: &str,
) -> Result<bool, StoreError> {
    let owner_email: Option<String> = sqlx::query_scalar(
        "SELECT u.email FROM todos t JOIN users u ON t.user_id = u.user_id WHERE t.id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    match owner_email {
        Some(email) if email == caller_email => {}
        _ => {
            warn!(
                "To-do item {} not found or unauthorized update attempt by {}",
                id, caller_email
            );
            return Ok(false);
        }
    }

    sqlx::query("UPDATE todos SET task = ?, due_date = ?, status = ? WHERE id = ?")
        .bind(&fields.task)
        .bind(fields.due_date)
        .bind(fields.status.as_deref())
        .bind(id)
        .execute(pool)
        .await?;

    info!("To-do item {} updated by {}", id, caller_email);
    Ok(true)
}

/// Delete an item. Unknown ids return false; an item owned by someone else
/// fails with `Forbidden`, whose message the handler echoes verbatim.
pub async fn delete(pool: &SqlitePool, id: i64, caller_email: &str) -> Result<bool, StoreError> {
    let owner_email: Option<String> = sqlx::query_scalar(
        "SELECT u.email FROM todos t JOIN users u ON t.user_id = u.user_id WHERE t.id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    let owner_email = match owner_email {
        Some(email) => email,
        None => {
            warn!("Attempted to delete non-existing to-do item {}", id);
            return Ok(false);
        }
    };

    if owner_email != caller_email {
        warn!(
            "{} attempted to delete to-do item {} that does not belong to them",
            caller_email, id
        );
        return Err(StoreError::Forbidden(
            "Unauthorized action: you cannot delete this to-do item.".into(),
        ));
    }

    sqlx::query("DELETE FROM todos WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    info!("To-do item {} deleted by {}", id, caller_email);
    Ok(true)
}
