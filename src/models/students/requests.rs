use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct EnrollRequest {
    pub course_id: i64,
}
