use std::sync::Arc;

use tracing::{info, instrument, warn};

use crate::{
    auth::{
        context::{Authentication, SecurityContext},
        dto::{normalize_email, normalize_username, LoginRequest, RegisterRequest},
        manager::AuthenticationManager,
        password::PasswordEncoder,
        repo::{StoreError, UserStore},
        repo_types::{NewUser, Role, User},
    },
    config::AdminSeed,
    error::AppError,
};

pub const REGISTERED: &str = "用户注册成功！";
pub const USERNAME_TAKEN: &str = "用户名已存在！";
pub const EMAIL_TAKEN: &str = "邮箱已被注册！";
pub const PASSWORD_MISMATCH: &str = "两次输入的密码不一致！";

/// Registration and credential checks on top of the user store.
#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserStore>,
    encoder: Arc<dyn PasswordEncoder>,
    manager: AuthenticationManager,
}

impl AuthService {
    pub fn new(users: Arc<dyn UserStore>, encoder: Arc<dyn PasswordEncoder>) -> Self {
        let manager = AuthenticationManager::new(users.clone(), encoder.clone());
        Self {
            users,
            encoder,
            manager,
        }
    }

    /// Creates a `USER` account. Checks run in order (username, email,
    /// password confirmation) and the first failure wins.
    #[instrument(skip(self, request), fields(username = %request.username))]
    pub async fn register_user(&self, request: RegisterRequest) -> Result<&'static str, AppError> {
        if self.users.exists_by_username(&request.username).await? {
            warn!("username already registered");
            return Err(AppError::validation(USERNAME_TAKEN));
        }
        if self.users.exists_by_email(&request.email).await? {
            warn!(email = %request.email, "email already registered");
            return Err(AppError::validation(EMAIL_TAKEN));
        }
        if request.password != request.confirm_password {
            warn!("password confirmation mismatch");
            return Err(AppError::validation(PASSWORD_MISMATCH));
        }

        let user = self
            .create(request.username, request.email, &request.password, Role::User)
            .await?;
        info!(user_id = user.id, email = %user.email, "user registered");
        Ok(REGISTERED)
    }

    /// Verifies credentials and binds the result into `context`.
    #[instrument(skip(self, context, request), fields(username = %request.username))]
    pub async fn authenticate_user(
        &self,
        context: &mut SecurityContext,
        request: LoginRequest,
    ) -> Result<Authentication, AppError> {
        let authentication = self
            .manager
            .authenticate(&request.username, &request.password)
            .await?;
        context.set_authentication(authentication.clone());
        info!(user_id = authentication.principal.id, "user logged in");
        Ok(authentication)
    }

    pub async fn find_by_username(&self, username: &str) -> anyhow::Result<Option<User>> {
        self.users.find_by_username(username).await
    }

    pub async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<User>> {
        self.users.find_by_email(email).await
    }

    /// Creates the configured administrator. An existing ADMIN under the
    /// same username is left alone; a non-admin holding it is an error.
    pub async fn ensure_admin(&self, seed: &AdminSeed) -> Result<Option<User>, AppError> {
        let username = normalize_username(&seed.username)?;
        let email = normalize_email(&seed.email)?;

        if let Some(existing) = self.users.find_by_username(&username).await? {
            if existing.role != Role::Admin {
                warn!(%username, role = %existing.role, "admin username held by a non-admin account");
                return Err(AppError::validation(format!(
                    "管理员用户名 {username} 已被非管理员账号占用"
                )));
            }
            info!(%username, "admin account already present");
            return Ok(None);
        }
        let admin = self.create(username, email, &seed.password, Role::Admin).await?;
        info!(user_id = admin.id, username = %admin.username, "admin account created");
        Ok(Some(admin))
    }

    async fn create(
        &self,
        username: String,
        email: String,
        password: &str,
        role: Role,
    ) -> Result<User, AppError> {
        let password_hash = self.encoder.encode(password)?;
        self.users
            .save(NewUser {
                username,
                email,
                password_hash,
                role,
            })
            .await
            .map_err(|e| match e {
                StoreError::DuplicateUsername => AppError::validation(USERNAME_TAKEN),
                StoreError::DuplicateEmail => AppError::validation(EMAIL_TAKEN),
                StoreError::Backend(e) => AppError::Internal(e),
            })
    }
}
