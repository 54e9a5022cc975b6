//! Middleware 模块

mod auth;

pub use auth::*;
