use serde::{Deserialize, Serialize};

use super::entities::Subject;
use crate::models::common::PaginatedResponse;

/// 学科及其课程统计
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubjectSummary {
    pub id: i64,
    pub title: String,
    pub slug: String,
    pub total_courses: i64,
    /// 选课人数最多的三门课程，格式为 `"<title> (<students>)"`
    pub popular_courses: Vec<String>,
}

impl SubjectSummary {
    pub fn new(subject: Subject, total_courses: i64, popular: &[(String, i64)]) -> Self {
        Self {
            id: subject.id,
            title: subject.title,
            slug: subject.slug,
            total_courses,
            popular_courses: popular
                .iter()
                .map(|(title, students)| format_popular_course(title, *students))
                .collect(),
        }
    }
}

pub fn format_popular_course(title: &str, students: i64) -> String {
    format!("{title} ({students})")
}

pub type SubjectListResponse = PaginatedResponse<SubjectSummary>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_popular_course_format() {
        let summary = SubjectSummary::new(
            Subject {
                id: 1,
                title: "Programming".into(),
                slug: "programming".into(),
            },
            4,
            &[("Django".into(), 12), ("Rust".into(), 3)],
        );
        assert_eq!(summary.popular_courses, vec!["Django (12)", "Rust (3)"]);
        assert_eq!(summary.total_courses, 4);
    }
}
