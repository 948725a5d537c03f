use crate::auth::repo_types::{Role, User};

/// A verified identity together with the roles it was granted.
#[derive(Debug, Clone)]
pub struct Authentication {
    pub principal: User,
    pub authorities: Vec<Role>,
}

impl Authentication {
    pub fn new(principal: User) -> Self {
        let authorities = vec![principal.role];
        Self {
            principal,
            authorities,
        }
    }

    pub fn has_any_role(&self, roles: &[Role]) -> bool {
        self.authorities.iter().any(|r| roles.contains(r))
    }
}

/// Holder of the current identity. Lives for a single request and is
/// handed to whatever needs to read or bind it.
#[derive(Debug, Default)]
pub struct SecurityContext {
    authentication: Option<Authentication>,
}

impl SecurityContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_authentication(&mut self, authentication: Authentication) {
        self.authentication = Some(authentication);
    }

    pub fn principal(&self) -> Option<&User> {
        self.authentication.as_ref().map(|a| &a.principal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::OffsetDateTime;

    fn user(role: Role) -> User {
        User {
            id: 1,
            username: "alice".into(),
            email: "a@x.com".into(),
            password_hash: "h".into(),
            role,
            created_at: OffsetDateTime::now_utc(),
        }
    }

    #[test]
    fn context_starts_empty_and_binds() {
        let mut ctx = SecurityContext::new();
        assert!(ctx.principal().is_none());

        ctx.set_authentication(Authentication::new(user(Role::User)));
        assert_eq!(ctx.principal().map(|u| u.username.as_str()), Some("alice"));
    }

    #[test]
    fn authorities_follow_user_role() {
        let admin = Authentication::new(user(Role::Admin));
        assert!(admin.has_any_role(&[Role::Admin]));
        assert!(admin.has_any_role(&[Role::User, Role::Admin]));
        assert!(!admin.has_any_role(&[Role::User]));

        let plain = Authentication::new(user(Role::User));
        assert!(!plain.has_any_role(&[Role::Admin]));
    }
}
