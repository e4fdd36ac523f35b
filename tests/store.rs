use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;

use todo_backend::db;
use todo_backend::store::error::StoreError;
use todo_backend::store::todos::{self, ToDoFields};
use todo_backend::store::{sessions, users};

// A shared in-memory database needs a single connection; a second
// connection would see its own empty database.
async fn test_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("in-memory pool");
    db::init_schema(&pool).await.expect("schema");
    pool
}

fn fields(task: &str, status: Option<&str>) -> ToDoFields {
    ToDoFields {
        task: task.into(),
        due_date: None,
        status: status.map(Into::into),
    }
}

#[tokio::test]
async fn register_and_authenticate_round_trip() {
    let pool = test_pool().await;

    let user = users::register(&pool, "a@x.com", "pw1").await.unwrap();
    assert_eq!(user.email, "a@x.com");
    assert!(user.user_id > 0);

    let authed = users::authenticate(&pool, "a@x.com", "pw1").await.unwrap();
    assert_eq!(authed.user_id, user.user_id);

    // Wrong password and unknown email fail with the same variant.
    let wrong = users::authenticate(&pool, "a@x.com", "nope").await;
    assert!(matches!(wrong, Err(StoreError::AuthFailed)));
    let unknown = users::authenticate(&pool, "b@x.com", "pw1").await;
    assert!(matches!(unknown, Err(StoreError::AuthFailed)));
}

#[tokio::test]
async fn register_validates_email_and_password() {
    let pool = test_pool().await;

    for email in ["", "no-at-sign", "@x.com", "a@", "a b@x.com"] {
        let result = users::register(&pool, email, "pw").await;
        assert!(
            matches!(result, Err(StoreError::Validation(_))),
            "email {:?} should be rejected",
            email
        );
    }

    let blank_pw = users::register(&pool, "a@x.com", "").await;
    assert!(matches!(blank_pw, Err(StoreError::Validation(_))));
}

#[tokio::test]
async fn register_rejects_duplicate_email() {
    let pool = test_pool().await;

    users::register(&pool, "a@x.com", "pw1").await.unwrap();
    let dup = users::register(&pool, "a@x.com", "pw2").await;
    assert!(matches!(dup, Err(StoreError::Conflict(_))));
}

#[tokio::test]
async fn find_by_email_reports_not_found() {
    let pool = test_pool().await;

    let missing = users::find_by_email(&pool, "ghost@x.com").await;
    assert!(matches!(missing, Err(StoreError::NotFound(_))));
}

#[tokio::test]
async fn listing_is_scoped_to_owner() {
    let pool = test_pool().await;
    let alice = users::register(&pool, "alice@x.com", "pw").await.unwrap();
    let bob = users::register(&pool, "bob@x.com", "pw").await.unwrap();

    todos::create(&pool, &fields("buy milk", Some("pending")), "alice@x.com")
        .await
        .unwrap();
    todos::create(&pool, &fields("walk dog", Some("done")), "bob@x.com")
        .await
        .unwrap();

    let for_alice = todos::list_by_owner(&pool, &alice, None, 0, 10).await.unwrap();
    assert_eq!(for_alice.len(), 1);
    assert_eq!(for_alice[0].task, "buy milk");
    assert_eq!(for_alice[0].user_id, alice.user_id);

    let for_bob = todos::list_by_owner(&pool, &bob, None, 0, 10).await.unwrap();
    assert_eq!(for_bob.len(), 1);
    assert_eq!(for_bob[0].task, "walk dog");
}

#[tokio::test]
async fn list_paginates_and_sorts() {
    let pool = test_pool().await;
    let alice = users::register(&pool, "alice@x.com", "pw").await.unwrap();
    for task in ["banana", "apple", "cherry"] {
        todos::create(&pool, &fields(task, None), "alice@x.com")
            .await
            .unwrap();
    }

    let sorted = todos::list_by_owner(&pool, &alice, Some("task"), 0, 10)
        .await
        .unwrap();
    let names: Vec<&str> = sorted.iter().map(|t| t.task.as_str()).collect();
    assert_eq!(names, vec!["apple", "banana", "cherry"]);

    let first_page = todos::list_by_owner(&pool, &alice, Some("task"), 0, 2)
        .await
        .unwrap();
    assert_eq!(first_page.len(), 2);
    let second_page = todos::list_by_owner(&pool, &alice, Some("task"), 1, 2)
        .await
        .unwrap();
    assert_eq!(second_page.len(), 1);
    assert_eq!(second_page[0].task, "cherry");

    // An unrecognized sort key falls back to store-defined order.
    let unsorted = todos::list_by_owner(&pool, &alice, Some("nonsense"), 0, 10)
        .await
        .unwrap();
    assert_eq!(unsorted.len(), 3);
}

#[tokio::test]
async fn search_combines_filters_with_or() {
    let pool = test_pool().await;
    let alice = users::register(&pool, "alice@x.com", "pw").await.unwrap();
    todos::create(&pool, &fields("Buy Milk", Some("pending")), "alice@x.com")
        .await
        .unwrap();
    todos::create(&pool, &fields("walk dog", Some("done")), "alice@x.com")
        .await
        .unwrap();
    todos::create(&pool, &fields("idle", Some("")), "alice@x.com")
        .await
        .unwrap();

    // Either clause alone is enough to match: keyword hits the first item,
    // status hits the second, case-insensitively on both sides.
    let both = todos::search(&pool, &alice, Some("milk"), Some("DONE"), 0, 10)
        .await
        .unwrap();
    let tasks: Vec<&str> = both.iter().map(|t| t.task.as_str()).collect();
    assert_eq!(tasks.len(), 2);
    assert!(tasks.contains(&"Buy Milk"));
    assert!(tasks.contains(&"walk dog"));

    // An absent keyword becomes the empty string, which is a substring of
    // every description, so everything matches.
    let no_keyword = todos::search(&pool, &alice, None, Some("done"), 0, 10)
        .await
        .unwrap();
    assert_eq!(no_keyword.len(), 3);

    // An absent status only matches items whose status is itself empty.
    let no_status = todos::search(&pool, &alice, Some("zzz"), None, 0, 10)
        .await
        .unwrap();
    assert_eq!(no_status.len(), 1);
    assert_eq!(no_status[0].task, "idle");
}

#[tokio::test]
async fn search_is_scoped_to_owner() {
    let pool = test_pool().await;
    let alice = users::register(&pool, "alice@x.com", "pw").await.unwrap();
    users::register(&pool, "bob@x.com", "pw").await.unwrap();
    todos::create(&pool, &fields("buy milk", None), "bob@x.com")
        .await
        .unwrap();

    let hits = todos::search(&pool, &alice, Some("milk"), None, 0, 10)
        .await
        .unwrap();
    assert!(hits.is_empty());
}

#[tokio::test]
async fn create_resolves_the_owner() {
    let pool = test_pool().await;
    let alice = users::register(&pool, "alice@x.com", "pw").await.unwrap();

    let missing = todos::create(&pool, &fields("x", None), "ghost@x.com").await;
    assert!(matches!(missing, Err(StoreError::NotFound(_))));

    let item = todos::create(&pool, &fields("buy milk", Some("pending")), "alice@x.com")
        .await
        .unwrap();
    assert!(item.id > 0);
    assert_eq!(item.user_id, alice.user_id);
    assert_eq!(item.status.as_deref(), Some("pending"));
}

#[tokio::test]
async fn update_conflates_missing_and_foreign_items() {
    let pool = test_pool().await;
    users::register(&pool, "alice@x.com", "pw").await.unwrap();
    let bob = users::register(&pool, "bob@x.com", "pw").await.unwrap();
    let item = todos::create(&pool, &fields("walk dog", Some("pending")), "bob@x.com")
        .await
        .unwrap();

    let missing = todos::update(&pool, 9999, &fields("x", None), "alice@x.com")
        .await
        .unwrap();
    assert!(!missing);

    // Someone else's item also comes back false, and stays untouched.
    let foreign = todos::update(&pool, item.id, &fields("hijacked", None), "alice@x.com")
        .await
        .unwrap();
    assert!(!foreign);

    let bobs = todos::list_by_owner(&pool, &bob, None, 0, 10).await.unwrap();
    assert_eq!(bobs[0].task, "walk dog");
    assert_eq!(bobs[0].status.as_deref(), Some("pending"));
}

#[tokio::test]
async fn update_applies_fields_and_preserves_owner() {
    let pool = test_pool().await;
    let alice = users::register(&pool, "alice@x.com", "pw").await.unwrap();
    let item = todos::create(&pool, &fields("buy milk", Some("pending")), "alice@x.com")
        .await
        .unwrap();

    let due = chrono::NaiveDate::from_ymd_opt(2026, 9, 1)
        .unwrap()
        .and_hms_opt(12, 0, 0)
        .unwrap();
    let updated = todos::update(
        &pool,
        item.id,
        &ToDoFields {
            task: "buy oat milk".into(),
            due_date: Some(due),
            status: Some("done".into()),
        },
        "alice@x.com",
    )
    .await
    .unwrap();
    assert!(updated);

    let after = todos::list_by_owner(&pool, &alice, None, 0, 10).await.unwrap();
    assert_eq!(after.len(), 1);
    assert_eq!(after[0].id, item.id);
    assert_eq!(after[0].user_id, alice.user_id);
    assert_eq!(after[0].task, "buy oat milk");
    assert_eq!(after[0].due_date, Some(due));
    assert_eq!(after[0].status.as_deref(), Some("done"));
}

#[tokio::test]
async fn delete_distinguishes_missing_from_foreign() {
    let pool = test_pool().await;
    users::register(&pool, "alice@x.com", "pw").await.unwrap();
    let bob = users::register(&pool, "bob@x.com", "pw").await.unwrap();
    let item = todos::create(&pool, &fields("walk dog", None), "bob@x.com")
        .await
        .unwrap();

    // Missing id is a plain false, never an error.
    let missing = todos::delete(&pool, 9999, "alice@x.com").await.unwrap();
    assert!(!missing);

    // Someone else's item is a Forbidden error and the row survives.
    let foreign = todos::delete(&pool, item.id, "alice@x.com").await;
    assert!(matches!(foreign, Err(StoreError::Forbidden(_))));
    let bobs = todos::list_by_owner(&pool, &bob, None, 0, 10).await.unwrap();
    assert_eq!(bobs.len(), 1);

    // The owner may delete it.
    let deleted = todos::delete(&pool, item.id, "bob@x.com").await.unwrap();
    assert!(deleted);
    let after = todos::list_by_owner(&pool, &bob, None, 0, 10).await.unwrap();
    assert!(after.is_empty());
}

#[tokio::test]
async fn session_lifecycle() {
    let pool = test_pool().await;
    let alice = users::register(&pool, "alice@x.com", "pw").await.unwrap();

    let session = sessions::create(&pool, alice.user_id).await.unwrap();
    let resolved = sessions::find_user(&pool, &session.session_id).await.unwrap();
    assert_eq!(resolved.email, "alice@x.com");

    // A second login replaces the first session.
    let newer = sessions::create(&pool, alice.user_id).await.unwrap();
    let stale = sessions::find_user(&pool, &session.session_id).await;
    assert!(matches!(stale, Err(StoreError::AuthFailed)));

    assert!(sessions::delete(&pool, &newer.session_id).await.unwrap());
    assert!(!sessions::delete(&pool, &newer.session_id).await.unwrap());
}

#[tokio::test]
async fn expired_sessions_are_rejected_and_removed() {
    let pool = test_pool().await;
    let alice = users::register(&pool, "alice@x.com", "pw").await.unwrap();

    let expired_at = chrono::Utc::now() - chrono::Duration::hours(1);
    sqlx::query("INSERT INTO sessions (session_id, user_id, expires_at) VALUES (?, ?, ?)")
        .bind("stale-session")
        .bind(alice.user_id)
        .bind(expired_at)
        .execute(&pool)
        .await
        .unwrap();

    let result = sessions::find_user(&pool, "stale-session").await;
    assert!(matches!(result, Err(StoreError::AuthFailed)));

    let remaining: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sessions")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(remaining, 0);
}
