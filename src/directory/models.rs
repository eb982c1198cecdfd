use chrono::{DateTime, Utc};

/// An account holder.
#[derive(Clone, Debug, sqlx::FromRow)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub full_name: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A client managed by an account holder.
#[derive(Clone, Debug, sqlx::FromRow)]
pub struct Client {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    pub email: Option<String>,
    pub created_at: DateTime<Utc>,
}
