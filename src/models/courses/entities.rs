use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Course {
    pub id: i64,
    pub owner_id: i64,
    pub subject_id: i64,
    pub title: String,
    pub slug: String,
    pub overview: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}
