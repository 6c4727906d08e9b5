use std::error::Error as StdError;

use thiserror::Error;

use crate::application::admin::blog::AdminBlogError;
use crate::application::admin::content::AdminContentError;
use crate::application::repos::RepoError;
use crate::application::session::SessionError;
use crate::config::LoadError;
use crate::domain::content::{ContentError, PathError};
use crate::domain::error::DomainError;
use crate::infra::error::InfraError;

/// An error flattened into its cause chain for logging.
#[derive(Debug, Clone)]
pub struct ErrorReport {
    pub source: &'static str,
    pub messages: Vec<String>,
}

impl ErrorReport {
    pub fn from_error(source: &'static str, error: &dyn StdError) -> Self {
        let mut messages = vec![error.to_string()];
        let mut current = error.source();
        while let Some(inner) = current {
            messages.push(inner.to_string());
            current = inner.source();
        }
        Self { source, messages }
    }

    pub fn chain(&self) -> String {
        self.messages.join(": ")
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] LoadError),
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error(transparent)]
    Path(#[from] PathError),
    #[error(transparent)]
    Content(#[from] ContentError),
    #[error(transparent)]
    Repo(#[from] RepoError),
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error(transparent)]
    Infra(#[from] InfraError),
    #[error("resource not found")]
    NotFound,
    #[error("validation failed: {0}")]
    Validation(String),
    #[error("unexpected error: {0}")]
    Unexpected(String),
}

impl AppError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn unexpected(message: impl Into<String>) -> Self {
        Self::Unexpected(message.into())
    }

    /// Process exit code: 2 for caller mistakes, 3 for missing resources,
    /// 1 for everything else.
    pub fn exit_code(&self) -> i32 {
        match self {
            AppError::Domain(DomainError::NotFound { .. })
            | AppError::Repo(RepoError::NotFound)
            | AppError::NotFound => 3,
            AppError::Config(_)
            | AppError::Path(_)
            | AppError::Domain(_)
            | AppError::Session(SessionError::NotSignedIn)
            | AppError::Repo(RepoError::InvalidInput { .. })
            | AppError::Validation(_) => 2,
            AppError::Content(_)
            | AppError::Repo(_)
            | AppError::Session(_)
            | AppError::Infra(_)
            | AppError::Unexpected(_) => 1,
        }
    }

    pub fn report(&self) -> ErrorReport {
        ErrorReport::from_error("application::error::AppError", self)
    }
}

impl From<AdminContentError> for AppError {
    fn from(error: AdminContentError) -> Self {
        match error {
            AdminContentError::Path(err) => AppError::Path(err),
            AdminContentError::Content(err) => AppError::Content(err),
            AdminContentError::Domain(err) => AppError::Domain(err),
            AdminContentError::Repo(err) => AppError::Repo(err),
        }
    }
}

impl From<AdminBlogError> for AppError {
    fn from(error: AdminBlogError) -> Self {
        match error {
            AdminBlogError::Domain(err) => AppError::Domain(err),
            AdminBlogError::Repo(err) => AppError::Repo(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_separate_caller_mistakes_from_failures() {
        assert_eq!(AppError::from(DomainError::not_found("post", "x")).exit_code(), 3);
        assert_eq!(AppError::from(PathError::Empty).exit_code(), 2);
        assert_eq!(
            AppError::from(RepoError::Persistence("down".into())).exit_code(),
            1
        );
        assert_eq!(AppError::from(SessionError::NotSignedIn).exit_code(), 2);
    }

    #[test]
    fn report_walks_the_source_chain() {
        let error = AppError::from(AdminContentError::Domain(DomainError::validation(
            "name",
            "must not be empty",
        )));
        let report = error.report();
        assert_eq!(report.source, "application::error::AppError");
        assert!(report.chain().contains("name"));
    }
}
