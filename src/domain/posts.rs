//! Built-in blog posts and read-model helpers over post lists.

use std::collections::BTreeSet;

use super::entities::{ImageRef, Post};

/// Posts served when the posts table has never been reached.
pub fn default_posts() -> Vec<Post> {
    vec![
        Post {
            id: "post_1".into(),
            title: "Understanding Heart Health".into(),
            category: "Cardiology".into(),
            featured: true,
            excerpt: "Simple daily habits that keep your heart strong and what warning signs \
                      should never be ignored."
                .into(),
            content: "Heart disease remains one of the leading causes of death worldwide, yet \
                      most risk factors can be managed. Regular exercise, a diet rich in \
                      vegetables and whole grains, and routine blood pressure checks go a long \
                      way. Chest pain, shortness of breath and unexplained fatigue warrant a \
                      visit to a cardiologist."
                .into(),
            image: ImageRef::Index(0),
            author: "Dr. Ayesha Khan".into(),
            date: "2024-01-15".into(),
            created_at: None,
        },
        Post {
            id: "post_2".into(),
            title: "Managing Seasonal Allergies".into(),
            category: "General Health".into(),
            featured: false,
            excerpt: "How to recognise seasonal allergy symptoms and keep them under control."
                .into(),
            content: "Pollen counts rise every spring and autumn. Keeping windows closed on \
                      high-pollen days, showering after time outdoors and starting \
                      antihistamines early in the season reduce symptoms for most patients."
                .into(),
            image: ImageRef::Index(1),
            author: "Dr. Sarah Mitchell".into(),
            date: "2024-02-02".into(),
            created_at: None,
        },
    ]
}

pub fn find_by_id<'a>(posts: &'a [Post], id: &str) -> Option<&'a Post> {
    posts.iter().find(|post| post.id == id)
}

/// Distinct categories in first-seen order.
pub fn categories(posts: &[Post]) -> Vec<String> {
    let mut seen = BTreeSet::new();
    posts
        .iter()
        .filter(|post| seen.insert(post.category.as_str()))
        .map(|post| post.category.clone())
        .collect()
}

/// Posts in `category`, or every post when the filter is absent or `All`.
pub fn in_category<'a>(posts: &'a [Post], category: Option<&str>) -> Vec<&'a Post> {
    match category.filter(|value| !is_all(value)) {
        Some(category) => posts
            .iter()
            .filter(|post| post.category == category)
            .collect(),
        None => posts.iter().collect(),
    }
}

/// Other posts sharing the category of `post`.
pub fn related<'a>(posts: &'a [Post], post: &Post, limit: usize) -> Vec<&'a Post> {
    posts
        .iter()
        .filter(|candidate| candidate.id != post.id && candidate.category == post.category)
        .take(limit)
        .collect()
}

pub(crate) fn is_all(value: &str) -> bool {
    let trimmed = value.trim();
    trimmed.is_empty() || trimmed.eq_ignore_ascii_case("all")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_contain_two_samples() {
        let posts = default_posts();
        assert_eq!(posts.len(), 2);
        let heart = find_by_id(&posts, "post_1").expect("post_1");
        assert_eq!(heart.title, "Understanding Heart Health");
        assert!(heart.featured);
        assert!(find_by_id(&posts, "nonexistent").is_none());
    }

    #[test]
    fn category_filter_treats_all_as_no_filter() {
        let posts = default_posts();
        assert_eq!(in_category(&posts, Some("All")).len(), 2);
        assert_eq!(in_category(&posts, None).len(), 2);

        let cardio = in_category(&posts, Some("Cardiology"));
        assert_eq!(cardio.len(), 1);
        assert_eq!(cardio[0].id, "post_1");
    }

    #[test]
    fn categories_keep_first_seen_order() {
        let mut posts = default_posts();
        let mut extra = posts[0].clone();
        extra.id = "post_3".into();
        posts.push(extra);

        assert_eq!(categories(&posts), vec!["Cardiology", "General Health"]);
        let related = related(&posts, &posts[0], 5);
        assert_eq!(related.len(), 1);
        assert_eq!(related[0].id, "post_3");
    }
}
