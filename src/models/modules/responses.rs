use serde::Serialize;

use super::entities::Module;
use crate::models::contents::responses::ContentDetail;
use crate::models::courses::entities::Course;

/// 额外空表单数量
pub const MODULE_FORMSET_EXTRA: usize = 2;

#[derive(Debug, Clone, Serialize)]
pub struct ModuleFormsetResponse {
    pub course: Course,
    pub modules: Vec<Module>,
    pub extra: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ModuleWithContents {
    #[serde(flatten)]
    pub module: Module,
    pub contents: Vec<ContentDetail>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FormsetErrorResponse {
    pub errors: Vec<FormError>,
}

/// 表单集中某一项的错误
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormError {
    pub index: usize,
    pub message: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct OrderSaved {
    pub saved: &'static str,
}

impl OrderSaved {
    pub fn ok() -> Self {
        Self { saved: "OK" }
    }
}
