use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct CreateSubjectRequest {
    pub title: String,
    pub slug: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateSubjectRequest {
    pub title: Option<String>,
    pub slug: Option<String>,
}
