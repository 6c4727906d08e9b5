use std::sync::Arc;

use time::OffsetDateTime;
use tracing::info;
use uuid::Uuid;

use crate::application::repos::{AuditRepo, RepoError};
use crate::domain::entities::AuditLogRecord;

/// Thin wrapper around the audit repository to simplify logging admin actions.
#[derive(Clone)]
pub struct AdminAuditService {
    repo: Arc<dyn AuditRepo>,
}

impl AdminAuditService {
    pub fn new(repo: Arc<dyn AuditRepo>) -> Self {
        Self { repo }
    }

    pub async fn record(
        &self,
        actor: &str,
        action: &str,
        detail: Option<&str>,
    ) -> Result<(), RepoError> {
        let record = AuditLogRecord {
            id: Uuid::new_v4(),
            actor: actor.to_string(),
            action: action.to_string(),
            detail: detail.map(str::to_string),
            created_at: OffsetDateTime::now_utc(),
        };

        info!(
            target = "application::admin::audit::record",
            actor,
            action,
            detail = detail.unwrap_or_default(),
            "admin action recorded"
        );
        self.repo.append_log(record).await
    }

    pub async fn list_recent(&self, limit: u32) -> Result<Vec<AuditLogRecord>, RepoError> {
        self.repo.list_recent(limit).await
    }
}
