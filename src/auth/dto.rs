use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{
    auth::repo_types::{Role, User},
    error::AppError,
};

fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

/// Request body for user registration.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

/// Trims a username and checks it is 3-20 characters.
pub fn normalize_username(raw: &str) -> Result<String, AppError> {
    let username = raw.trim();
    if username.is_empty() {
        return Err(AppError::validation("用户名不能为空"));
    }
    if !(3..=20).contains(&username.chars().count()) {
        return Err(AppError::validation("用户名长度必须在3-20个字符之间"));
    }
    Ok(username.to_string())
}

/// Trims and lower-cases an email; it must be well-formed and fit the
/// 100-character column.
pub fn normalize_email(raw: &str) -> Result<String, AppError> {
    let email = raw.trim().to_lowercase();
    if email.is_empty() {
        return Err(AppError::validation("邮箱不能为空"));
    }
    if email.chars().count() > 100 {
        return Err(AppError::validation("邮箱长度不能超过100个字符"));
    }
    if !is_valid_email(&email) {
        return Err(AppError::validation("邮箱格式不正确"));
    }
    Ok(email)
}

impl RegisterRequest {
    /// Trims identifiers, lower-cases the email and checks field formats.
    pub fn normalize(mut self) -> Result<Self, AppError> {
        self.username = normalize_username(&self.username)?;
        self.email = normalize_email(&self.email)?;

        if self.password.is_empty() {
            return Err(AppError::validation("密码不能为空"));
        }
        if self.confirm_password.is_empty() {
            return Err(AppError::validation("确认密码不能为空"));
        }
        Ok(self)
    }
}

/// Request body for login.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

impl LoginRequest {
    pub fn normalize(mut self) -> Result<Self, AppError> {
        self.username = self.username.trim().to_string();
        if self.username.is_empty() {
            return Err(AppError::validation("用户名不能为空"));
        }
        if self.password.is_empty() {
            return Err(AppError::validation("密码不能为空"));
        }
        Ok(self)
    }
}

/// Public part of the user returned to the client.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfileResponse {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub role: Role,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl From<&User> for UserProfileResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
            role: user.role,
            created_at: user.created_at,
        }
    }
}

/// Response returned after login.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    pub token_type: &'static str,
    pub user: UserProfileResponse,
}

#[derive(Debug, Deserialize)]
pub struct UsernameQuery {
    pub username: String,
}

#[derive(Debug, Deserialize)]
pub struct EmailQuery {
    pub email: String,
}

#[derive(Debug, Serialize)]
pub struct Availability {
    pub available: bool,
}
