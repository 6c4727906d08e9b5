use std::sync::Arc;

use serde_json::Value;
use thiserror::Error;

use crate::application::admin::audit::AdminAuditService;
use crate::application::repos::RepoError;
use crate::cache::ContentStore;
use crate::domain::content::{ContentChange, ContentError, PathError};
use crate::domain::doctors::find_doctor;
use crate::domain::entities::Doctor;
use crate::domain::error::{DomainError, ensure_non_empty};
use crate::domain::schedule::{SlotToggle, TimeSlot};

#[derive(Debug, Error)]
pub enum AdminContentError {
    #[error(transparent)]
    Path(#[from] PathError),
    #[error(transparent)]
    Content(#[from] ContentError),
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error(transparent)]
    Repo(#[from] RepoError),
}

/// Admin edits to the content tree. Each successful write is audited with
/// its change description.
#[derive(Clone)]
pub struct AdminContentService {
    store: Arc<ContentStore>,
    audit: AdminAuditService,
}

impl AdminContentService {
    pub fn new(store: Arc<ContentStore>, audit: AdminAuditService) -> Self {
        Self { store, audit }
    }

    pub fn store(&self) -> &Arc<ContentStore> {
        &self.store
    }

    pub async fn update_path(
        &self,
        actor: &str,
        path: &str,
        value: Value,
    ) -> Result<ContentChange, AdminContentError> {
        let change = self.store.set(path, value)?;
        self.audit
            .record(actor, "content.update", Some(&change.description))
            .await?;
        Ok(change)
    }

    pub async fn add_doctor(
        &self,
        actor: &str,
        doctor: Doctor,
    ) -> Result<ContentChange, AdminContentError> {
        validate_doctor(&doctor)?;
        let id = doctor.id.clone();
        let change = self.store.update(|config| -> Result<_, AdminContentError> {
            let mut doctors = config.try_doctors()?;
            if find_doctor(&doctors, &doctor.id).is_some() {
                return Err(DomainError::duplicate("doctor", &doctor.id).into());
            }
            doctors.push(doctor);
            Ok(config.set_doctors(&doctors)?)
        })?;

        self.audit
            .record(actor, "doctor.create", Some(&format!("Added doctor {id}")))
            .await?;
        Ok(change)
    }

    pub async fn update_doctor(
        &self,
        actor: &str,
        doctor: Doctor,
    ) -> Result<ContentChange, AdminContentError> {
        validate_doctor(&doctor)?;
        let id = doctor.id.clone();
        let change = self.store.update(|config| -> Result<_, AdminContentError> {
            let mut doctors = config.try_doctors()?;
            let slot = doctors
                .iter_mut()
                .find(|existing| existing.id == doctor.id)
                .ok_or_else(|| DomainError::not_found("doctor", &doctor.id))?;
            *slot = doctor;
            Ok(config.set_doctors(&doctors)?)
        })?;

        self.audit
            .record(actor, "doctor.update", Some(&format!("Updated doctor {id}")))
            .await?;
        Ok(change)
    }

    /// Remove a doctor along with their schedule.
    pub async fn delete_doctor(
        &self,
        actor: &str,
        id: &str,
    ) -> Result<ContentChange, AdminContentError> {
        let change = self.store.update(|config| -> Result<_, AdminContentError> {
            let mut doctors = config.try_doctors()?;
            let before = doctors.len();
            doctors.retain(|doctor| doctor.id != id);
            if doctors.len() == before {
                return Err(DomainError::not_found("doctor", id).into());
            }

            let mut schedules = config.try_schedules()?;
            if schedules.remove_doctor(id) {
                config.set_schedules(&schedules)?;
            }
            Ok(config.set_doctors(&doctors)?)
        })?;

        self.audit
            .record(actor, "doctor.delete", Some(&format!("Deleted doctor {id}")))
            .await?;
        Ok(change)
    }

    pub async fn toggle_schedule_slot(
        &self,
        actor: &str,
        doctor_id: &str,
        date: &str,
        slot: TimeSlot,
    ) -> Result<SlotToggle, AdminContentError> {
        let outcome = self.store.update(|config| -> Result<_, AdminContentError> {
            if find_doctor(&config.try_doctors()?, doctor_id).is_none() {
                return Err(DomainError::not_found("doctor", doctor_id).into());
            }
            let mut schedules = config.try_schedules()?;
            let outcome = schedules.toggle(doctor_id, date, slot)?;
            config.set_schedules(&schedules)?;
            Ok(outcome)
        })?;

        let verb = match outcome {
            SlotToggle::Added => "Opened",
            SlotToggle::Removed => "Closed",
        };
        self.audit
            .record(
                actor,
                "schedule.update",
                Some(&format!("{verb} {slot} on {date} for {doctor_id}")),
            )
            .await?;
        Ok(outcome)
    }
}

fn validate_doctor(doctor: &Doctor) -> Result<(), DomainError> {
    ensure_non_empty(&doctor.id, "id")?;
    ensure_non_empty(&doctor.name, "name")?;
    ensure_non_empty(&doctor.specialty, "specialty")?;
    if doctor.id.contains(['.', '[', ']']) {
        return Err(DomainError::validation(
            "id",
            "must not contain `.`, `[` or `]`",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::infra::memory::InMemoryAuditRepo;

    fn service() -> (AdminContentService, Arc<InMemoryAuditRepo>) {
        let repo = Arc::new(InMemoryAuditRepo::default());
        let service = AdminContentService::new(
            Arc::new(ContentStore::default()),
            AdminAuditService::new(repo.clone()),
        );
        (service, repo)
    }

    fn new_doctor(id: &str) -> Doctor {
        let mut doctor = ContentStore::default().doctors().remove(0);
        doctor.id = id.to_string();
        doctor.name = "Dr. New Hire".to_string();
        doctor
    }

    #[tokio::test]
    async fn path_update_is_audited_with_description() {
        let (service, repo) = service();
        service
            .update_path("dana", "hero.title", json!("Open Day"))
            .await
            .expect("update");

        assert_eq!(service.store().get("hero.title"), Some(json!("Open Day")));
        let entries = repo.entries();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].actor, "dana");
        assert_eq!(entries[0].action, "content.update");
        assert_eq!(entries[0].detail.as_deref(), Some("Updated hero.title"));
    }

    #[tokio::test]
    async fn failed_write_is_not_audited() {
        let (service, repo) = service();
        let result = service
            .update_path("dana", "doctors[40].name", json!("X"))
            .await;
        assert!(matches!(
            result,
            Err(AdminContentError::Path(PathError::OutOfRange { .. }))
        ));
        assert!(repo.entries().is_empty());
    }

    #[tokio::test]
    async fn doctors_are_added_updated_and_deleted_by_list_replacement() {
        let (service, repo) = service();

        service
            .add_doctor("dana", new_doctor("dr-new"))
            .await
            .expect("add");
        assert_eq!(service.store().doctors().len(), 6);

        assert!(matches!(
            service.add_doctor("dana", new_doctor("dr-new")).await,
            Err(AdminContentError::Domain(DomainError::Duplicate { .. }))
        ));

        let mut edited = new_doctor("dr-new");
        edited.specialty = "Neurology".to_string();
        service.update_doctor("dana", edited).await.expect("update");
        assert_eq!(
            service.store().get("doctors[5].specialty"),
            Some(json!("Neurology"))
        );

        service
            .delete_doctor("dana", "dr-ayesha-khan")
            .await
            .expect("delete");
        assert_eq!(service.store().doctors().len(), 5);
        assert!(!service.store().schedules().has_doctor("dr-ayesha-khan"));

        let actions: Vec<_> = repo.entries().into_iter().map(|e| e.action).collect();
        assert_eq!(
            actions,
            vec!["doctor.create", "doctor.update", "doctor.delete"]
        );
    }

    #[tokio::test]
    async fn toggling_the_only_slot_removes_the_date() {
        let (service, _repo) = service();
        let date = "2024-06-10";

        let added = service
            .toggle_schedule_slot("dana", "dr-imran-khan", date, TimeSlot::TenAm)
            .await
            .expect("add");
        assert_eq!(added, SlotToggle::Added);
        assert_eq!(
            service
                .store()
                .get(&format!("doctor_schedules.dr-imran-khan.{date}")),
            Some(json!(["10:00 AM"]))
        );

        let removed = service
            .toggle_schedule_slot("dana", "dr-imran-khan", date, TimeSlot::TenAm)
            .await
            .expect("remove");
        assert_eq!(removed, SlotToggle::Removed);
        assert_eq!(
            service
                .store()
                .get(&format!("doctor_schedules.dr-imran-khan.{date}")),
            None
        );
    }

    #[tokio::test]
    async fn malformed_doctor_entry_blocks_list_rewrites() {
        let (service, repo) = service();
        service
            .update_path("dana", "doctors[4].expertise", json!("Sports injuries"))
            .await
            .expect("update");
        let before = service.store().snapshot();

        assert!(matches!(
            service.add_doctor("dana", new_doctor("dr-new")).await,
            Err(AdminContentError::Content(ContentError::Decode { .. }))
        ));
        assert!(matches!(
            service.update_doctor("dana", new_doctor("dr-ayesha-khan")).await,
            Err(AdminContentError::Content(ContentError::Decode { .. }))
        ));
        assert!(matches!(
            service.delete_doctor("dana", "dr-ayesha-khan").await,
            Err(AdminContentError::Content(ContentError::Decode { .. }))
        ));
        assert!(matches!(
            service
                .toggle_schedule_slot("dana", "dr-imran-khan", "2024-06-10", TimeSlot::TenAm)
                .await,
            Err(AdminContentError::Content(ContentError::Decode { .. }))
        ));

        assert_eq!(service.store().snapshot(), before);
        assert_eq!(
            service
                .store()
                .get("doctors")
                .and_then(|doctors| doctors.as_array().map(Vec::len)),
            Some(5)
        );
        assert_eq!(repo.entries().len(), 1);
    }

    #[tokio::test]
    async fn malformed_schedule_blocks_slot_toggles() {
        let (service, repo) = service();
        service
            .update_path(
                "dana",
                "doctor_schedules.dr-maria-lopez.2024-06-04",
                json!(["9am"]),
            )
            .await
            .expect("update");
        let before = service.store().snapshot();

        assert!(matches!(
            service
                .toggle_schedule_slot("dana", "dr-imran-khan", "2024-06-10", TimeSlot::TenAm)
                .await,
            Err(AdminContentError::Content(ContentError::Decode { .. }))
        ));
        assert!(matches!(
            service.delete_doctor("dana", "dr-imran-khan").await,
            Err(AdminContentError::Content(ContentError::Decode { .. }))
        ));

        assert_eq!(service.store().snapshot(), before);
        assert_eq!(
            service
                .store()
                .get("doctor_schedules.dr-ayesha-khan.2024-06-05"),
            Some(json!(["11:00 AM", "03:00 PM"]))
        );
        assert_eq!(repo.entries().len(), 1);
    }

    #[tokio::test]
    async fn toggling_for_unknown_doctor_fails() {
        let (service, repo) = service();
        assert!(matches!(
            service
                .toggle_schedule_slot("dana", "dr-ghost", "2024-06-10", TimeSlot::TenAm)
                .await,
            Err(AdminContentError::Domain(DomainError::NotFound { .. }))
        ));
        assert!(repo.entries().is_empty());
    }
}
