//! Fragment routing: the page or detail view is chosen by the URL fragment.

use std::fmt;

use url::Url;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Home,
    About,
    Doctors,
    Specialties,
    Blog,
    Contact,
    Careers,
    Admin,
    Post { id: String },
    DoctorBio { id: String },
}

impl Route {
    /// Parse `#blog`, `#post/<id>` and friends. Unknown or empty fragments land on `Home`.
    pub fn from_fragment(fragment: &str) -> Self {
        let trimmed = fragment.trim().trim_start_matches('#');
        let (head, tail) = match trimmed.split_once('/') {
            Some((head, tail)) => (head, Some(tail.trim())),
            None => (trimmed, None),
        };

        match (head, tail) {
            ("post", Some(id)) if !id.is_empty() => Route::Post { id: id.to_string() },
            ("doctor-bio", Some(id)) if !id.is_empty() => Route::DoctorBio { id: id.to_string() },
            ("about", None) => Route::About,
            ("doctors", None) => Route::Doctors,
            ("specialties", None) => Route::Specialties,
            ("blog", None) => Route::Blog,
            ("contact", None) => Route::Contact,
            ("careers", None) => Route::Careers,
            ("admin", None) => Route::Admin,
            _ => Route::Home,
        }
    }

    pub fn from_url(url: &Url) -> Self {
        Self::from_fragment(url.fragment().unwrap_or_default())
    }

    pub fn fragment(&self) -> String {
        match self {
            Route::Home => "#home".to_string(),
            Route::About => "#about".to_string(),
            Route::Doctors => "#doctors".to_string(),
            Route::Specialties => "#specialties".to_string(),
            Route::Blog => "#blog".to_string(),
            Route::Contact => "#contact".to_string(),
            Route::Careers => "#careers".to_string(),
            Route::Admin => "#admin".to_string(),
            Route::Post { id } => format!("#post/{id}"),
            Route::DoctorBio { id } => format!("#doctor-bio/{id}"),
        }
    }

    pub fn requires_admin(&self) -> bool {
        matches!(self, Route::Admin)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.fragment())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_detail_fragments() {
        assert_eq!(
            Route::from_fragment("#post/post_1"),
            Route::Post { id: "post_1".into() }
        );
        assert_eq!(
            Route::from_fragment("doctor-bio/dr-imran-khan"),
            Route::DoctorBio {
                id: "dr-imran-khan".into()
            }
        );
    }

    #[test]
    fn unknown_and_empty_fragments_go_home() {
        assert_eq!(Route::from_fragment(""), Route::Home);
        assert_eq!(Route::from_fragment("#nowhere"), Route::Home);
        assert_eq!(Route::from_fragment("#post/"), Route::Home);
        assert_eq!(Route::from_fragment("#blog/extra"), Route::Home);
    }

    #[test]
    fn fragment_round_trips_through_url() {
        let url = Url::parse("https://carewell.example/#doctor-bio/dr-maria-lopez").expect("url");
        let route = Route::from_url(&url);
        assert_eq!(route.fragment(), "#doctor-bio/dr-maria-lopez");
        assert_eq!(Route::from_fragment(&route.fragment()), route);
        assert!(Route::from_fragment("#admin").requires_admin());
    }
}
