//! Admin session flags: a role marker and the signed-in username.
//!
//! These flags gate the admin views and name the actor in audit entries.
//! They are plain session state, not a security boundary.

use std::sync::RwLock;

use thiserror::Error;

use crate::application::admin::audit::AdminAuditService;
use crate::application::repos::RepoError;
use crate::cache::lock::{rw_read, rw_write};
use crate::domain::error::{DomainError, ensure_non_empty};

const SOURCE: &str = "application::session";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Admin,
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("admin session required")]
    NotSignedIn,
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error(transparent)]
    Repo(#[from] RepoError),
}

#[derive(Debug, Clone, Default)]
struct SessionFlags {
    role: Option<Role>,
    username: Option<String>,
}

pub struct AdminSession {
    flags: RwLock<SessionFlags>,
    audit: AdminAuditService,
}

impl AdminSession {
    pub fn new(audit: AdminAuditService) -> Self {
        Self {
            flags: RwLock::new(SessionFlags::default()),
            audit,
        }
    }

    pub async fn login(&self, username: &str) -> Result<(), SessionError> {
        ensure_non_empty(username, "username")?;
        let username = username.trim().to_string();
        {
            let mut flags = rw_write(&self.flags, SOURCE, "login");
            flags.role = Some(Role::Admin);
            flags.username = Some(username.clone());
        }
        self.audit.record(&username, "login", None).await?;
        Ok(())
    }

    /// Clear both flags. Signing out without a session is a no-op.
    pub async fn logout(&self) -> Result<(), SessionError> {
        let previous = std::mem::take(&mut *rw_write(&self.flags, SOURCE, "logout"));
        if let Some(username) = previous.username {
            self.audit.record(&username, "logout", None).await?;
        }
        Ok(())
    }

    pub fn role(&self) -> Option<Role> {
        rw_read(&self.flags, SOURCE, "role").role
    }

    pub fn username(&self) -> Option<String> {
        rw_read(&self.flags, SOURCE, "username").username.clone()
    }

    /// The signed-in admin's username.
    pub fn require_admin(&self) -> Result<String, SessionError> {
        let flags = rw_read(&self.flags, SOURCE, "require_admin");
        match (&flags.role, &flags.username) {
            (Some(Role::Admin), Some(username)) => Ok(username.clone()),
            _ => Err(SessionError::NotSignedIn),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::infra::memory::InMemoryAuditRepo;

    fn session() -> (AdminSession, Arc<InMemoryAuditRepo>) {
        let repo = Arc::new(InMemoryAuditRepo::default());
        let session = AdminSession::new(AdminAuditService::new(repo.clone()));
        (session, repo)
    }

    #[tokio::test]
    async fn login_sets_flags_and_logout_clears_them() {
        let (session, repo) = session();
        assert!(matches!(
            session.require_admin(),
            Err(SessionError::NotSignedIn)
        ));

        session.login(" dana ").await.expect("login");
        assert_eq!(session.role(), Some(Role::Admin));
        assert_eq!(session.require_admin().expect("admin"), "dana");

        session.logout().await.expect("logout");
        assert_eq!(session.username(), None);
        assert_eq!(session.role(), None);

        let actions: Vec<_> = repo.entries().into_iter().map(|e| e.action).collect();
        assert_eq!(actions, vec!["login", "logout"]);
    }

    #[tokio::test]
    async fn blank_username_is_rejected_and_logout_without_session_is_silent() {
        let (session, repo) = session();
        assert!(matches!(
            session.login("   ").await,
            Err(SessionError::Domain(_))
        ));
        session.logout().await.expect("logout");
        assert!(repo.entries().is_empty());
    }
}
