use crate::{AuthError, AuthTokens};
use domain::{Role, UserContext};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

// 管理端仅签发 access token；设备侧端点不走凭证。
const ACCESS_TOKEN_TYPE: &str = "access";

#[derive(Debug, Serialize, Deserialize)]
/// JWT 内部 claims。
struct Claims {
    sub: String,
    email: String,
    role: String,
    site_id: Option<String>,
    exp: usize,
    token_type: String,
}

/// JWT 生成与校验。
pub struct JwtManager {
    secret: Vec<u8>,
    access_ttl_seconds: u64,
}

impl JwtManager {
    /// 创建 JWT 管理器。
    pub fn new(secret: String, access_ttl_seconds: u64) -> Self {
        Self {
            secret: secret.into_bytes(),
            access_ttl_seconds,
        }
    }

    /// 基于 UserContext 签发 access token。
    pub fn issue_access(&self, ctx: &UserContext) -> Result<AuthTokens, AuthError> {
        let expires_at = now_epoch_seconds() + self.access_ttl_seconds;
        let claims = Claims {
            sub: ctx.user_id.clone(),
            email: ctx.email.clone(),
            role: ctx.role.as_str().to_string(),
            site_id: ctx.site_id.clone(),
            exp: expires_at as usize,
            token_type: ACCESS_TOKEN_TYPE.to_string(),
        };
        let access_token = jsonwebtoken::encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(&self.secret),
        )
        .map_err(|err| AuthError::Internal(err.to_string()))?;
        Ok(AuthTokens {
            access_token,
            expires_at,
        })
    }

    /// 解析 access token，校验签名、过期与 token 类型。
    pub fn decode_access(&self, token: &str) -> Result<UserContext, AuthError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        let decoded = jsonwebtoken::decode::<Claims>(
            token,
            &DecodingKey::from_secret(&self.secret),
            &validation,
        )
        .map_err(map_jwt_error)?;
        let claims = decoded.claims;
        if claims.token_type != ACCESS_TOKEN_TYPE {
            return Err(AuthError::TokenInvalid);
        }
        let role = claims
            .role
            .parse::<Role>()
            .map_err(|_| AuthError::TokenInvalid)?;
        Ok(UserContext::new(claims.sub, claims.email, role, claims.site_id))
    }
}

/// 当前时间戳（秒）。
fn now_epoch_seconds() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

/// 将 jwt 库错误映射为业务错误。
fn map_jwt_error(err: jsonwebtoken::errors::Error) -> AuthError {
    match err.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::TokenExpired,
        _ => AuthError::TokenInvalid,
    }
}
