//! 应用配置
//!
//! 配置来源优先级（从低到高）：
//! 内置默认值 → `config.toml` → `config.{APP_ENV}.toml` → `SKILLSPARK_*` 环境变量 → 显式环境变量覆盖

mod r#impl;
mod structs;

pub use structs::*;
