//! 应用配置

mod r#impl;
mod structs;

pub use structs::*;
