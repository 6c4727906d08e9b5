//! Admin flows over a fully assembled site: sign in, edit content and
//! schedules, and read the audit trail back.

use std::{num::NonZeroU32, sync::Arc};

use serde_json::json;

use carewell::application::admin::content::AdminContentError;
use carewell::application::error::AppError;
use carewell::application::session::SessionError;
use carewell::application::site::SiteContext;
use carewell::cache::ContentStore;
use carewell::domain::content::PathError;
use carewell::domain::doctors::{DoctorFilter, VisibleWindow, doctors_for_specialty};
use carewell::domain::navigation::Route;
use carewell::domain::schedule::{SlotToggle, TimeSlot};
use carewell::infra::memory::{InMemoryAuditRepo, InMemoryPostsRepo};

fn site() -> (SiteContext, Arc<InMemoryAuditRepo>) {
    let audit = Arc::new(InMemoryAuditRepo::default());
    let site = SiteContext::assemble(
        Arc::new(ContentStore::default()),
        Arc::new(InMemoryPostsRepo::default()),
        audit.clone(),
        NonZeroU32::MIN,
    );
    (site, audit)
}

#[tokio::test]
async fn admin_session_edits_are_audited_in_order() {
    let (site, audit) = site();
    assert!(Route::from_fragment("#admin").requires_admin());
    assert!(matches!(
        site.session.require_admin(),
        Err(SessionError::NotSignedIn)
    ));

    site.session.login("dana").await.expect("login");
    let actor = site.session.require_admin().expect("admin");

    let change = site
        .admin_content
        .update_path(&actor, "contact.phone", json!("+1 555 0100"))
        .await
        .expect("update");
    assert_eq!(change.description, "Updated contact.phone");
    assert_eq!(site.content.get("contact.phone"), Some(json!("+1 555 0100")));

    site.admin_content
        .toggle_schedule_slot(&actor, "dr-sarah-mitchell", "2024-07-01", TimeSlot::ThreePm)
        .await
        .expect("toggle");
    site.session.logout().await.expect("logout");

    let recent = site.audit.list_recent(10).await.expect("recent");
    let actions: Vec<_> = recent.iter().map(|entry| entry.action.as_str()).collect();
    assert_eq!(
        actions,
        vec!["logout", "schedule.update", "content.update", "login"]
    );
    assert!(recent.iter().all(|entry| entry.actor == "dana"));
    assert_eq!(audit.entries().len(), 4);
}

#[tokio::test]
async fn toggling_off_the_only_slot_drops_the_date() {
    let (site, _audit) = site();
    let path = "doctor_schedules.dr-maria-lopez.2024-06-04";
    assert_eq!(site.content.get(path), Some(json!(["09:00 AM", "12:00 PM"])));

    for slot in [TimeSlot::NineAm, TimeSlot::Noon] {
        let outcome = site
            .admin_content
            .toggle_schedule_slot("dana", "dr-maria-lopez", "2024-06-04", slot)
            .await
            .expect("toggle");
        assert_eq!(outcome, SlotToggle::Removed);
    }

    assert_eq!(site.content.get(path), None);
    assert!(!site.content.schedules().has_doctor("dr-maria-lopez"));
    assert_eq!(
        site.content.get("doctor_schedules.dr-ayesha-khan.2024-06-05"),
        Some(json!(["11:00 AM", "03:00 PM"]))
    );
}

#[tokio::test]
async fn scalar_traversal_is_rejected_without_touching_the_tree() {
    let (site, audit) = site();
    let before = site.content.snapshot();

    let result = site
        .admin_content
        .update_path("dana", "hero.title.text", json!("nested"))
        .await;
    assert!(matches!(
        result,
        Err(AdminContentError::Path(PathError::NotContainer { .. }))
    ));
    assert_eq!(site.content.snapshot(), before);
    assert!(audit.entries().is_empty());
}

#[tokio::test]
async fn failed_admin_edit_still_signs_out() {
    let (site, audit) = site();
    let site = &site;

    let result = site
        .as_admin("dana", |actor| async move {
            site.admin_content
                .update_path(&actor, "hero.title.text", json!("nested"))
                .await
                .map_err(AppError::from)
        })
        .await;
    assert!(matches!(result, Err(AppError::Path(PathError::NotContainer { .. }))));
    assert!(site.session.username().is_none());

    let actions: Vec<_> = audit.entries().into_iter().map(|entry| entry.action).collect();
    assert_eq!(actions, vec!["login", "logout"]);

    let change = site
        .as_admin("dana", |actor| async move {
            site.admin_content
                .update_path(&actor, "contact.phone", json!("+1 555 0101"))
                .await
                .map_err(AppError::from)
        })
        .await
        .expect("edit");
    assert_eq!(change.path, "contact.phone");
    assert_eq!(audit.entries().len(), 5);
}

#[test]
fn specialty_facet_composes_with_text_query() {
    let (site, _audit) = site();
    let doctors = site.content.doctors();

    let filter = DoctorFilter::new("khan", Some("Cardiology".to_string()));
    let matched: Vec<_> = filter
        .apply(&doctors)
        .into_iter()
        .map(|doctor| doctor.id.clone())
        .collect();
    assert_eq!(matched, vec!["dr-ayesha-khan".to_string()]);
    assert_eq!(doctors_for_specialty(&doctors, "Cardiology").len(), 2);

    let everyone = DoctorFilter::new("KHAN", None).apply(&doctors);
    let names: Vec<_> = everyone.iter().map(|doctor| doctor.name.as_str()).collect();
    assert_eq!(names.len(), 3);

    let mut window = VisibleWindow::new(2);
    assert_eq!(window.slice(&everyone).len(), 2);
    assert!(window.has_more(everyone.len()));
    window.load_more();
    assert_eq!(window.slice(&everyone).len(), 3);
    assert!(!window.has_more(everyone.len()));
}
