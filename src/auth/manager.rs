use std::sync::Arc;

use tracing::{debug, warn};

use crate::{
    auth::{context::Authentication, password::PasswordEncoder, repo::UserStore},
    error::AppError,
};

/// Checks a username/password pair against stored credentials.
#[derive(Clone)]
pub struct AuthenticationManager {
    users: Arc<dyn UserStore>,
    encoder: Arc<dyn PasswordEncoder>,
}

impl AuthenticationManager {
    pub fn new(users: Arc<dyn UserStore>, encoder: Arc<dyn PasswordEncoder>) -> Self {
        Self { users, encoder }
    }

    /// Unknown users and wrong passwords fail the same way.
    pub async fn authenticate(&self, username: &str, password: &str) -> Result<Authentication, AppError> {
        let Some(user) = self.users.find_by_username(username).await? else {
            warn!(%username, "login unknown username");
            return Err(AppError::bad_credentials());
        };

        if !self.encoder.matches(password, &user.password_hash)? {
            warn!(%username, user_id = user.id, "login invalid password");
            return Err(AppError::bad_credentials());
        }

        debug!(user_id = user.id, role = %user.role, "credentials accepted");
        Ok(Authentication::new(user))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{
        password::Argon2PasswordEncoder,
        repo::MemoryUserStore,
        repo_types::{NewUser, Role},
    };

    async fn manager_with_alice() -> AuthenticationManager {
        let users = Arc::new(MemoryUserStore::new());
        let encoder = Arc::new(Argon2PasswordEncoder);
        users
            .save(NewUser {
                username: "alice".into(),
                email: "a@x.com".into(),
                password_hash: encoder.encode("p1").unwrap(),
                role: Role::User,
            })
            .await
            .unwrap();
        AuthenticationManager::new(users, encoder)
    }

    #[tokio::test]
    async fn accepts_correct_password() {
        let manager = manager_with_alice().await;
        let auth = manager.authenticate("alice", "p1").await.unwrap();
        assert_eq!(auth.principal.username, "alice");
        assert_eq!(auth.authorities, vec![Role::User]);
    }

    #[tokio::test]
    async fn rejects_wrong_password_and_unknown_user_alike() {
        let manager = manager_with_alice().await;
        let wrong = manager.authenticate("alice", "nope").await.unwrap_err();
        let unknown = manager.authenticate("mallory", "p1").await.unwrap_err();
        assert!(matches!(wrong, AppError::Authentication(_)));
        assert_eq!(wrong.to_string(), unknown.to_string());
    }
}
