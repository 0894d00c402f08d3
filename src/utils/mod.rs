pub mod extractor;
pub mod file_magic;
pub mod jwt;
pub mod parameter_error_handler;
pub mod password;
pub mod sql;
pub mod validate;

pub use extractor::{
    SafeContentIdI64, SafeCourseIdI64, SafeFileToken, SafeIDI64, SafeItemIdI64, SafeModelName,
    SafeModuleIdI64, SafeSlug,
};
pub use file_magic::sniff_mime_type;
pub use parameter_error_handler::json_error_handler;
pub use parameter_error_handler::query_error_handler;
pub use sql::{contains_like, escape_like_pattern};
