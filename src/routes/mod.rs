pub mod api;

pub mod auth;

pub mod catalog;

pub mod chat;

pub mod files;

pub mod manage;

pub mod students;

pub mod subjects;

pub mod users;

pub use api::configure_api_routes;
pub use auth::configure_auth_routes;
pub use catalog::configure_catalog_routes;
pub use chat::configure_chat_routes;
pub use files::configure_file_routes;
pub use manage::configure_manage_routes;
pub use students::configure_student_routes;
pub use subjects::configure_subject_routes;
pub use users::configure_user_routes;
