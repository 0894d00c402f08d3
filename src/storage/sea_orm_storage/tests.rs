use super::SeaOrmStorage;
use crate::models::{
    PaginationQuery,
    chat::requests::ChatMessageQuery,
    contents::entities::{ContentKind, ItemBody},
    courses::{
        entities::Course,
        requests::{CourseListQuery, CreateCourseRequest},
    },
    modules::requests::{ModuleFormsetPlan, NewModule},
    subjects::requests::CreateSubjectRequest,
    users::{
        entities::{User, UserRole},
        requests::CreateUserRequest,
    },
};

async fn storage() -> SeaOrmStorage {
    SeaOrmStorage::new_in_memory()
        .await
        .expect("in-memory storage")
}

async fn user(storage: &SeaOrmStorage, name: &str, role: UserRole) -> User {
    storage
        .create_user_impl(CreateUserRequest {
            username: name.to_string(),
            email: format!("{name}@example.com"),
            password: "hash".to_string(),
            role,
            display_name: None,
        })
        .await
        .expect("create user")
}

async fn course(storage: &SeaOrmStorage, owner_id: i64, slug: &str) -> Course {
    let subject = match storage
        .get_subject_by_slug_impl("programming")
        .await
        .expect("query subject")
    {
        Some(subject) => subject,
        None => storage
            .create_subject_impl(CreateSubjectRequest {
                title: "Programming".to_string(),
                slug: "programming".to_string(),
            })
            .await
            .expect("create subject"),
    };

    storage
        .create_course_impl(
            owner_id,
            CreateCourseRequest {
                subject_id: subject.id,
                title: slug.to_uppercase(),
                slug: slug.to_string(),
                overview: String::new(),
            },
        )
        .await
        .expect("create course")
}

fn new_module(course_id: i64, title: &str, order: Option<i32>) -> NewModule {
    NewModule {
        course_id,
        title: title.to_string(),
        description: String::new(),
        order,
    }
}

fn text(content: &str) -> ItemBody {
    ItemBody::Text {
        content: content.to_string(),
    }
}

#[tokio::test]
async fn test_module_order_is_scoped_per_course() {
    let storage = storage().await;
    let owner = user(&storage, "mentor", UserRole::Instructor).await;
    let a = course(&storage, owner.id, "course-a").await;
    let b = course(&storage, owner.id, "course-b").await;

    let first = storage
        .create_module_impl(new_module(a.id, "one", None))
        .await
        .expect("module");
    let second = storage
        .create_module_impl(new_module(a.id, "two", None))
        .await
        .expect("module");
    let other = storage
        .create_module_impl(new_module(b.id, "other", None))
        .await
        .expect("module");

    assert_eq!(first.order, 0);
    assert_eq!(second.order, 1);
    assert_eq!(other.order, 0);
}

#[tokio::test]
async fn test_explicit_module_order_is_kept() {
    let storage = storage().await;
    let owner = user(&storage, "mentor", UserRole::Instructor).await;
    let c = course(&storage, owner.id, "course-a").await;

    let explicit = storage
        .create_module_impl(new_module(c.id, "five", Some(5)))
        .await
        .expect("module");
    let next = storage
        .create_module_impl(new_module(c.id, "six", None))
        .await
        .expect("module");

    assert_eq!(explicit.order, 5);
    assert_eq!(next.order, 6);
}

#[tokio::test]
async fn test_concurrent_module_creates_get_distinct_orders() {
    let storage = storage().await;
    let owner = user(&storage, "mentor", UserRole::Instructor).await;
    let c = course(&storage, owner.id, "course-a").await;

    let (a, b, d) = tokio::join!(
        storage.create_module_impl(new_module(c.id, "a", None)),
        storage.create_module_impl(new_module(c.id, "b", None)),
        storage.create_module_impl(new_module(c.id, "c", None)),
    );

    let mut orders = vec![
        a.expect("module").order,
        b.expect("module").order,
        d.expect("module").order,
    ];
    orders.sort_unstable();
    assert_eq!(orders, vec![0, 1, 2]);
}

#[tokio::test]
async fn test_content_order_and_delete_removes_item() {
    let storage = storage().await;
    let owner = user(&storage, "mentor", UserRole::Instructor).await;
    let c = course(&storage, owner.id, "course-a").await;
    let module = storage
        .create_module_impl(new_module(c.id, "one", None))
        .await
        .expect("module");

    let first = storage
        .create_content_impl(module.id, owner.id, "Intro".into(), text("hello"))
        .await
        .expect("content");
    let second = storage
        .create_content_impl(
            module.id,
            owner.id,
            "Clip".into(),
            ItemBody::Video {
                url: "https://youtu.be/dQw4w9WgXcQ".into(),
            },
        )
        .await
        .expect("content");

    assert_eq!(first.order, 0);
    assert_eq!(second.order, 1);
    assert_eq!(second.content_type, ContentKind::Video);

    let listed = storage
        .list_contents_by_module_impl(module.id)
        .await
        .expect("list");
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0].item.title, "Intro");

    assert!(
        storage
            .delete_content_impl(first.id)
            .await
            .expect("delete")
    );
    assert!(
        storage
            .get_item_impl(ContentKind::Text, first.item.id)
            .await
            .expect("get item")
            .is_none()
    );
    assert_eq!(
        storage
            .list_contents_by_module_impl(module.id)
            .await
            .expect("list")
            .len(),
        1
    );
}

#[tokio::test]
async fn test_course_delete_cascades() {
    let storage = storage().await;
    let owner = user(&storage, "mentor", UserRole::Instructor).await;
    let student = user(&storage, "student", UserRole::Student).await;
    let c = course(&storage, owner.id, "course-a").await;
    let module = storage
        .create_module_impl(new_module(c.id, "one", None))
        .await
        .expect("module");
    assert!(
        storage
            .enroll_student_impl(c.id, student.id)
            .await
            .expect("enroll")
    );

    assert!(storage.delete_course_impl(c.id).await.expect("delete"));
    assert!(
        storage
            .get_module_by_id_impl(module.id)
            .await
            .expect("get module")
            .is_none()
    );
    assert!(
        !storage
            .is_enrolled_impl(c.id, student.id)
            .await
            .expect("enrolled")
    );
}

#[tokio::test]
async fn test_messages_protect_user_and_course() {
    let storage = storage().await;
    let owner = user(&storage, "mentor", UserRole::Instructor).await;
    let student = user(&storage, "student", UserRole::Student).await;
    let c = course(&storage, owner.id, "course-a").await;

    storage
        .create_message_impl(student.id, c.id, "hi", chrono::Utc::now())
        .await
        .expect("message");

    let err = storage
        .delete_course_impl(c.id)
        .await
        .expect_err("course is referenced");
    assert!(err.is_reference_protected());

    let err = storage
        .delete_user_impl(student.id)
        .await
        .expect_err("user is referenced");
    assert!(err.is_reference_protected());

    // 课程下有他人的消息，删除讲师会级联到课程，被外键拦下
    let err = storage
        .delete_user_impl(owner.id)
        .await
        .expect_err("owner's course is referenced");
    assert!(err.is_reference_protected());

    assert!(
        storage
            .get_course_by_id_impl(c.id)
            .await
            .expect("get course")
            .is_some()
    );
}

#[tokio::test]
async fn test_enroll_is_idempotent() {
    let storage = storage().await;
    let owner = user(&storage, "mentor", UserRole::Instructor).await;
    let student = user(&storage, "student", UserRole::Student).await;
    let c = course(&storage, owner.id, "course-a").await;

    assert!(
        storage
            .enroll_student_impl(c.id, student.id)
            .await
            .expect("enroll")
    );
    assert!(
        !storage
            .enroll_student_impl(c.id, student.id)
            .await
            .expect("enroll again")
    );

    let enrolled = storage
        .list_courses_with_pagination_impl(CourseListQuery {
            student_id: Some(student.id),
            ..Default::default()
        })
        .await
        .expect("list");
    assert_eq!(enrolled.pagination.total, 1);
    assert_eq!(enrolled.items[0].id, c.id);
}

#[tokio::test]
async fn test_formset_plan_is_applied() {
    let storage = storage().await;
    let owner = user(&storage, "mentor", UserRole::Instructor).await;
    let c = course(&storage, owner.id, "course-a").await;
    let keep = storage
        .create_module_impl(new_module(c.id, "keep", None))
        .await
        .expect("module");
    let drop = storage
        .create_module_impl(new_module(c.id, "drop", None))
        .await
        .expect("module");

    let modules = storage
        .apply_module_formset_impl(
            c.id,
            ModuleFormsetPlan {
                creates: vec![
                    ("new".into(), "desc".into(), None),
                    ("placed".into(), String::new(), Some(7)),
                    ("after".into(), String::new(), None),
                ],
                updates: vec![(keep.id, "kept".into(), "updated".into())],
                deletes: vec![drop.id],
            },
        )
        .await
        .expect("apply");

    let titles: Vec<&str> = modules.iter().map(|m| m.title.as_str()).collect();
    assert_eq!(titles, vec!["kept", "new", "placed", "after"]);
    let orders: Vec<i32> = modules.iter().map(|m| m.order).collect();
    assert_eq!(orders, vec![0, 1, 7, 8]);
}

#[tokio::test]
async fn test_reorder_only_touches_owned_rows() {
    let storage = storage().await;
    let owner = user(&storage, "mentor", UserRole::Instructor).await;
    let other = user(&storage, "another", UserRole::Instructor).await;
    let mine = course(&storage, owner.id, "course-a").await;
    let theirs = course(&storage, other.id, "course-b").await;
    let m1 = storage
        .create_module_impl(new_module(mine.id, "one", None))
        .await
        .expect("module");
    let m2 = storage
        .create_module_impl(new_module(theirs.id, "two", None))
        .await
        .expect("module");

    let updated = storage
        .reorder_modules_impl(owner.id, &[(m1.id, 9), (m2.id, 9)])
        .await
        .expect("reorder");
    assert_eq!(updated, 1);

    let m2 = storage
        .get_module_by_id_impl(m2.id)
        .await
        .expect("get")
        .expect("exists");
    assert_eq!(m2.order, 0);
    assert!(
        storage
            .get_owned_module_impl(owner.id, m2.id)
            .await
            .expect("owned")
            .is_none()
    );
}

#[tokio::test]
async fn test_recent_messages_are_chronological() {
    let storage = storage().await;
    let owner = user(&storage, "mentor", UserRole::Instructor).await;
    let c = course(&storage, owner.id, "course-a").await;
    let start = chrono::Utc::now();

    for i in 0..7 {
        storage
            .create_message_impl(
                owner.id,
                c.id,
                &format!("message {i}"),
                start + chrono::Duration::seconds(i),
            )
            .await
            .expect("message");
    }

    let recent = storage
        .list_recent_messages_impl(c.id, 5)
        .await
        .expect("recent");
    let contents: Vec<&str> = recent.iter().map(|m| m.content.as_str()).collect();
    assert_eq!(
        contents,
        vec!["message 2", "message 3", "message 4", "message 5", "message 6"]
    );
    assert_eq!(recent[0].username, "mentor");

    let page = storage
        .list_messages_with_pagination_impl(ChatMessageQuery {
            pagination: PaginationQuery::new(1, 3),
            course_id: Some(c.id),
            search: Some("message 1".into()),
        })
        .await
        .expect("page");
    assert_eq!(page.pagination.total, 1);
}

#[tokio::test]
async fn test_page_far_past_the_end_is_empty() {
    let storage = storage().await;
    let owner = user(&storage, "mentor", UserRole::Instructor).await;
    course(&storage, owner.id, "course-a").await;

    let subjects = storage
        .list_subject_summaries_with_pagination_impl(PaginationQuery::new(i64::MAX, 40))
        .await
        .expect("subjects");
    assert!(subjects.items.is_empty());
    assert_eq!(subjects.pagination.total, 1);

    let courses = storage
        .list_courses_with_pagination_impl(CourseListQuery {
            pagination: PaginationQuery::new(i64::MAX, 40),
            ..Default::default()
        })
        .await
        .expect("courses");
    assert!(courses.items.is_empty());
}

#[tokio::test]
async fn test_subject_summary_counts_students() {
    let storage = storage().await;
    let owner = user(&storage, "mentor", UserRole::Instructor).await;
    let student = user(&storage, "student", UserRole::Student).await;
    let a = course(&storage, owner.id, "course-a").await;
    course(&storage, owner.id, "course-b").await;
    storage
        .enroll_student_impl(a.id, student.id)
        .await
        .expect("enroll");

    let summary = storage
        .get_subject_summary_impl(a.subject_id)
        .await
        .expect("summary")
        .expect("subject exists");
    assert_eq!(summary.total_courses, 2);
    assert_eq!(summary.popular_courses[0], "COURSE-A (1)");

    let catalog = storage
        .list_course_summaries_impl(Some(a.subject_id))
        .await
        .expect("catalog");
    assert_eq!(catalog.len(), 2);
}

#[tokio::test]
async fn test_duplicate_slug_is_conflict() {
    let storage = storage().await;
    let owner = user(&storage, "mentor", UserRole::Instructor).await;
    let c = course(&storage, owner.id, "course-a").await;

    let err = storage
        .create_course_impl(
            owner.id,
            CreateCourseRequest {
                subject_id: c.subject_id,
                title: "Again".into(),
                slug: "course-a".into(),
                overview: String::new(),
            },
        )
        .await
        .expect_err("duplicate slug");
    assert!(err.is_conflict());
}
