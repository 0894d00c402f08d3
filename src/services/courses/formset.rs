//! 模块表单集
//!
//! 一次提交课程的全部模块：已有模块可修改或删除，没有 id 的条目追加为新模块。
//! 先整体校验，任一条目出错则什么都不写。

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::collections::HashSet;

use super::{COURSE_TITLE_MAX_LEN, CourseService};
use crate::models::{
    ApiResponse, ErrorCode,
    modules::{
        requests::{ModuleFormEntry, ModuleFormsetPlan},
        responses::{
            FormError, FormsetErrorResponse, MODULE_FORMSET_EXTRA, ModuleFormsetResponse,
        },
    },
};
use crate::services::{current_user, internal_error, not_found};
use crate::utils::validate::validate_title;

/// 把提交的表单集转换为写入计划
pub fn plan_module_formset(
    existing_ids: &[i64],
    forms: Vec<ModuleFormEntry>,
) -> Result<ModuleFormsetPlan, Vec<FormError>> {
    let existing: HashSet<i64> = existing_ids.iter().copied().collect();
    let mut seen = HashSet::new();
    let mut plan = ModuleFormsetPlan::default();
    let mut errors = Vec::new();

    for (index, form) in forms.into_iter().enumerate() {
        if form.is_blank_extra() {
            continue;
        }

        if let Some(id) = form.id {
            if !existing.contains(&id) {
                errors.push(FormError {
                    index,
                    message: format!("Module {id} does not belong to this course"),
                });
                continue;
            }
            if !seen.insert(id) {
                errors.push(FormError {
                    index,
                    message: format!("Module {id} is submitted more than once"),
                });
                continue;
            }
        }

        if form.delete {
            // 勾选删除的新表单直接丢弃
            if let Some(id) = form.id {
                plan.deletes.push(id);
            }
            continue;
        }

        let title = form.title.trim().to_string();
        if let Err(message) = validate_title(&title, COURSE_TITLE_MAX_LEN) {
            errors.push(FormError { index, message });
            continue;
        }
        let description = form.description.trim().to_string();

        match form.id {
            Some(id) => plan.updates.push((id, title, description)),
            None => match form.order {
                Some(order) if order < 0 => errors.push(FormError {
                    index,
                    message: "Order must not be negative".to_string(),
                }),
                order => plan.creates.push((title, description, order)),
            },
        }
    }

    if errors.is_empty() {
        Ok(plan)
    } else {
        Err(errors)
    }
}

pub async fn get_module_formset(
    service: &CourseService,
    course_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(response) => return Ok(response),
    };
    let storage = service.get_storage(request)?;

    let course = match storage.get_owned_course(user.id, course_id).await {
        Ok(Some(course)) => course,
        Ok(None) => return Ok(not_found(ErrorCode::CourseNotFound, "Course not found")),
        Err(e) => {
            return Ok(internal_error(
                ErrorCode::InternalServerError,
                "Failed to query course",
                e,
            ));
        }
    };

    match storage.list_modules_by_course(course.id).await {
        Ok(modules) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            ModuleFormsetResponse {
                course,
                modules,
                extra: MODULE_FORMSET_EXTRA,
            },
            "Modules retrieved successfully",
        ))),
        Err(e) => Ok(internal_error(
            ErrorCode::InternalServerError,
            "Failed to retrieve modules",
            e,
        )),
    }
}

pub async fn save_module_formset(
    service: &CourseService,
    course_id: i64,
    forms: Vec<ModuleFormEntry>,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(response) => return Ok(response),
    };
    let storage = service.get_storage(request)?;

    let course = match storage.get_owned_course(user.id, course_id).await {
        Ok(Some(course)) => course,
        Ok(None) => return Ok(not_found(ErrorCode::CourseNotFound, "Course not found")),
        Err(e) => {
            return Ok(internal_error(
                ErrorCode::InternalServerError,
                "Failed to query course",
                e,
            ));
        }
    };

    let existing_ids: Vec<i64> = match storage.list_modules_by_course(course.id).await {
        Ok(modules) => modules.into_iter().map(|m| m.id).collect(),
        Err(e) => {
            return Ok(internal_error(
                ErrorCode::InternalServerError,
                "Failed to retrieve modules",
                e,
            ));
        }
    };

    let plan = match plan_module_formset(&existing_ids, forms) {
        Ok(plan) => plan,
        Err(errors) => {
            return Ok(HttpResponse::BadRequest().json(ApiResponse::error(
                ErrorCode::ModuleFormsetInvalid,
                FormsetErrorResponse { errors },
                "Module formset is invalid",
            )));
        }
    };

    match storage.apply_module_formset(course.id, plan).await {
        Ok(modules) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            ModuleFormsetResponse {
                course,
                modules,
                extra: MODULE_FORMSET_EXTRA,
            },
            "Modules saved successfully",
        ))),
        Err(e) => Ok(internal_error(
            ErrorCode::InternalServerError,
            "Failed to save modules",
            e,
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(id: Option<i64>, title: &str, delete: bool) -> ModuleFormEntry {
        ModuleFormEntry {
            id,
            title: title.to_string(),
            description: String::new(),
            order: None,
            delete,
        }
    }

    #[test]
    fn test_plan_splits_creates_updates_and_deletes() {
        let plan = plan_module_formset(
            &[1, 2],
            vec![
                form(Some(1), " Intro ", false),
                form(Some(2), "Old", true),
                form(None, "New", false),
                form(None, "", false),
            ],
        )
        .expect("valid formset");

        assert_eq!(plan.updates, vec![(1, "Intro".to_string(), String::new())]);
        assert_eq!(plan.deletes, vec![2]);
        assert_eq!(plan.creates, vec![("New".to_string(), String::new(), None)]);
    }

    #[test]
    fn test_foreign_module_id_is_rejected() {
        let forms = vec![form(Some(1), "a", false), form(Some(9), "b", false)];
        let errors =
            plan_module_formset(&[1], forms).expect_err("module 9 is not part of the course");
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].index, 1);
    }

    #[test]
    fn test_missing_title_reports_index() {
        let mut entry = form(None, "  ", false);
        entry.description = "only a description".into();
        let errors = plan_module_formset(&[], vec![form(None, "ok", false), entry])
            .expect_err("blank title");
        assert_eq!(errors[0].index, 1);
    }

    #[test]
    fn test_new_form_marked_for_delete_is_dropped() {
        let plan = plan_module_formset(&[], vec![form(None, "draft", true)]).expect("valid");
        assert_eq!(plan, ModuleFormsetPlan::default());
    }

    #[test]
    fn test_duplicate_id_is_rejected() {
        let forms = vec![form(Some(3), "a", false), form(Some(3), "b", true)];
        let errors = plan_module_formset(&[3], forms).expect_err("duplicate");
        assert_eq!(errors[0].index, 1);
    }

    #[test]
    fn test_new_module_keeps_explicit_order() {
        let mut placed = form(None, "Placed", false);
        placed.order = Some(4);
        let plan = plan_module_formset(&[], vec![placed]).expect("valid");
        assert_eq!(plan.creates, vec![("Placed".to_string(), String::new(), Some(4))]);

        let mut negative = form(None, "Negative", false);
        negative.order = Some(-1);
        let errors = plan_module_formset(&[], vec![negative]).expect_err("negative order");
        assert_eq!(errors[0].index, 0);
    }
}
