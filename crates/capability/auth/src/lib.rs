//! 认证能力：登录、JWT 生成与校验。

mod jwt;
mod password;

use domain::UserContext;
use signage_storage::{UserRecord, UserStore};
use std::sync::Arc;

pub use jwt::JwtManager;
pub use password::{hash_password, verify_password};

/// 认证相关错误。
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("token expired")]
    TokenExpired,
    #[error("token invalid")]
    TokenInvalid,
    #[error("internal error: {0}")]
    Internal(String),
}

/// 登录返回的 token 结构。
#[derive(Debug)]
pub struct AuthTokens {
    pub access_token: String,
    pub expires_at: u64,
}

/// 认证服务实现（基于 UserStore + JWT）。
pub struct AuthService {
    user_store: Arc<dyn UserStore>,
    jwt: JwtManager,
}

impl AuthService {
    /// 创建认证服务实例。
    pub fn new(user_store: Arc<dyn UserStore>, jwt: JwtManager) -> Self {
        Self { user_store, jwt }
    }

    /// 登录校验并签发 token。
    pub async fn login(
        &self,
        email: &str,
        password: &str,
    ) -> Result<(UserRecord, AuthTokens), AuthError> {
        let user = self
            .user_store
            .find_by_email(email)
            .await
            .map_err(|err| AuthError::Internal(err.to_string()))?
            .ok_or(AuthError::InvalidCredentials)?;
        if !verify_password(&user.password_hash, password)? {
            return Err(AuthError::InvalidCredentials);
        }
        let tokens = self.jwt.issue_access(&user.to_user_context())?;
        Ok((user, tokens))
    }

    /// 校验 access token 并提取 UserContext。
    pub fn verify_access_token(&self, token: &str) -> Result<UserContext, AuthError> {
        self.jwt.decode_access(token)
    }
}
