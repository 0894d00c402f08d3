//! 预导入模块，方便使用

pub use super::chat_messages::{
    ActiveModel as ChatMessageActiveModel, Entity as ChatMessages, Model as ChatMessageModel,
};
pub use super::contents::{
    ActiveModel as ContentActiveModel, Entity as Contents, Model as ContentModel,
};
pub use super::course_students::{
    ActiveModel as CourseStudentActiveModel, Entity as CourseStudents,
    Model as CourseStudentModel,
};
pub use super::courses::{ActiveModel as CourseActiveModel, Entity as Courses, Model as CourseModel};
pub use super::files::{ActiveModel as FileActiveModel, Entity as Files, Model as FileModel};
pub use super::images::{ActiveModel as ImageActiveModel, Entity as Images, Model as ImageModel};
pub use super::modules::{ActiveModel as ModuleActiveModel, Entity as Modules, Model as ModuleModel};
pub use super::subjects::{
    ActiveModel as SubjectActiveModel, Entity as Subjects, Model as SubjectModel,
};
pub use super::texts::{ActiveModel as TextActiveModel, Entity as Texts, Model as TextModel};
pub use super::uploads::{ActiveModel as UploadActiveModel, Entity as Uploads, Model as UploadModel};
pub use super::users::{ActiveModel as UserActiveModel, Entity as Users, Model as UserModel};
pub use super::videos::{ActiveModel as VideoActiveModel, Entity as Videos, Model as VideoModel};
