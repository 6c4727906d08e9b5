//! Doctor directory filtering and the "load more" window.

use super::entities::Doctor;
use super::posts::is_all;

pub const DEFAULT_DOCTOR_PAGE_SIZE: usize = 8;

/// Free-text query composed with an exact specialty facet.
#[derive(Debug, Clone, Default)]
pub struct DoctorFilter {
    pub query: String,
    pub specialty: Option<String>,
}

impl DoctorFilter {
    pub fn new(query: impl Into<String>, specialty: Option<String>) -> Self {
        Self {
            query: query.into(),
            specialty,
        }
    }

    pub fn matches(&self, doctor: &Doctor) -> bool {
        let facet = match self.specialty.as_deref() {
            Some(specialty) if !is_all(specialty) => doctor.specialty == specialty,
            _ => true,
        };
        if !facet {
            return false;
        }

        let needle = self.query.trim().to_lowercase();
        needle.is_empty()
            || doctor.name.to_lowercase().contains(&needle)
            || doctor.specialty.to_lowercase().contains(&needle)
    }

    pub fn apply<'a>(&self, doctors: &'a [Doctor]) -> Vec<&'a Doctor> {
        doctors.iter().filter(|doctor| self.matches(doctor)).collect()
    }
}

/// Doctors listed under a department, for the appointment form's doctor select.
pub fn doctors_for_specialty<'a>(doctors: &'a [Doctor], specialty: &str) -> Vec<&'a Doctor> {
    DoctorFilter::new("", Some(specialty.to_string())).apply(doctors)
}

pub fn find_doctor<'a>(doctors: &'a [Doctor], id: &str) -> Option<&'a Doctor> {
    doctors.iter().find(|doctor| doctor.id == id)
}

/// Number of list entries currently shown; grows by a fixed page size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisibleWindow {
    visible: usize,
    page_size: usize,
}

impl VisibleWindow {
    pub fn new(page_size: usize) -> Self {
        let page_size = page_size.max(1);
        Self {
            visible: page_size,
            page_size,
        }
    }

    pub fn visible(&self) -> usize {
        self.visible
    }

    pub fn load_more(&mut self) {
        self.visible = self.visible.saturating_add(self.page_size);
    }

    /// Reset after the filter changes.
    pub fn reset(&mut self) {
        self.visible = self.page_size;
    }

    pub fn has_more(&self, total: usize) -> bool {
        total > self.visible
    }

    pub fn slice<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        &items[..self.visible.min(items.len())]
    }
}

impl Default for VisibleWindow {
    fn default() -> Self {
        Self::new(DEFAULT_DOCTOR_PAGE_SIZE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{ImageRef, SocialLinks};

    fn doctor(id: &str, name: &str, specialty: &str) -> Doctor {
        Doctor {
            id: id.into(),
            name: name.into(),
            specialty: specialty.into(),
            image: ImageRef::Index(0),
            qualifications: String::new(),
            experience: String::new(),
            bio: String::new(),
            expertise: Vec::new(),
            social: SocialLinks::default(),
        }
    }

    fn roster() -> Vec<Doctor> {
        vec![
            doctor("d1", "Dr. Ayesha Khan", "Cardiology"),
            doctor("d2", "Dr. Imran Khan", "Neurology"),
            doctor("d3", "Dr. Sarah Mitchell", "Cardiology"),
            doctor("d4", "Dr. Rahul Khanna", "Orthopedics"),
        ]
    }

    #[test]
    fn query_and_specialty_compose() {
        let doctors = roster();
        let filter = DoctorFilter::new("khan", Some("Cardiology".into()));
        let ids: Vec<_> = filter.apply(&doctors).iter().map(|d| d.id.clone()).collect();
        assert_eq!(ids, vec!["d1"]);
    }

    #[test]
    fn query_is_case_insensitive_and_matches_specialty() {
        let doctors = roster();
        let ids: Vec<_> = DoctorFilter::new("KHAN", None)
            .apply(&doctors)
            .iter()
            .map(|d| d.id.clone())
            .collect();
        assert_eq!(ids, vec!["d1", "d2", "d4"]);

        let neuro = DoctorFilter::new("neuro", Some("All".into())).apply(&doctors);
        assert_eq!(neuro.len(), 1);
    }

    #[test]
    fn window_grows_by_page_size() {
        let items: Vec<u32> = (0..5).collect();
        let mut window = VisibleWindow::new(2);
        assert_eq!(window.slice(&items), &[0, 1]);
        assert!(window.has_more(items.len()));

        window.load_more();
        window.load_more();
        assert_eq!(window.slice(&items).len(), 5);
        assert!(!window.has_more(items.len()));

        window.reset();
        assert_eq!(window.visible(), 2);
    }
}
