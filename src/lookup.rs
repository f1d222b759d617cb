//! Lookup and filter operations over an already-loaded collection
//!
//! Pure functions; the service layer feeds them cached collections and wraps
//! the results in envelopes.

use rustc_hash::FxHashSet;

use crate::error::ContentError;
use crate::models::{Entity, Fielded, Identified, Slugged, Tagged};

/// Cap on related items when the caller does not choose one
pub const DEFAULT_RELATED_LIMIT: usize = 3;

/// Exact, case-sensitive id match
pub fn get_by_id<T: Entity + Identified>(items: &[T], id: &str) -> Result<T, ContentError> {
    items
        .iter()
        .find(|item| item.id() == id)
        .cloned()
        .ok_or_else(|| ContentError::NotFound {
            entity: T::LABEL,
            key: id.to_string(),
        })
}

pub fn get_by_slug<T: Entity + Slugged>(items: &[T], slug: &str) -> Result<T, ContentError> {
    items
        .iter()
        .find(|item| item.slug() == slug)
        .cloned()
        .ok_or_else(|| ContentError::NotFound {
            entity: T::LABEL,
            key: slug.to_string(),
        })
}

/// Items sharing at least one tag with `source`, skipping `exclude_id`.
///
/// Tags compare case-insensitively, as in [`filter_by_tag`]. Keeps collection
/// order (no relevance sort) and stops at `limit`.
pub fn related_items<T>(items: &[T], source: &T, exclude_id: &str, limit: usize) -> Vec<T>
where
    T: Identified + Tagged + Clone,
{
    let wanted: FxHashSet<String> = source.tags().iter().map(|t| t.to_lowercase()).collect();
    if wanted.is_empty() {
        return Vec::new();
    }

    items
        .iter()
        .filter(|item| item.id() != exclude_id)
        .filter(|item| item.tags().iter().any(|t| wanted.contains(&t.to_lowercase())))
        .take(limit)
        .cloned()
        .collect()
}

/// Items whose named field equals `value`.
///
/// `None` (or a blank value, as sent by an empty query parameter) means no
/// filter and returns the whole collection. Field names the entity does not
/// expose match nothing.
pub fn filter_by_field<T: Fielded + Clone>(items: &[T], field: &str, value: Option<&str>) -> Vec<T> {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        None => items.to_vec(),
        Some(wanted) => items
            .iter()
            .filter(|item| item.field(field) == Some(wanted))
            .cloned()
            .collect(),
    }
}

/// Items carrying `tag` (case-insensitive); `None` or blank returns everything
pub fn filter_by_tag<T: Tagged + Clone>(items: &[T], tag: Option<&str>) -> Vec<T> {
    match tag.map(str::trim).filter(|t| !t.is_empty()) {
        None => items.to_vec(),
        Some(wanted) => items
            .iter()
            .filter(|item| item.tags().iter().any(|t| t.eq_ignore_ascii_case(wanted)))
            .cloned()
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::models::{ApplicationInfo, ApplicationStatus, NewsArticle};
    use chrono::NaiveDate;

    fn article(id: &str, slug: &str, tags: &[&str]) -> NewsArticle {
        NewsArticle {
            id: id.to_string(),
            slug: slug.to_string(),
            title: format!("Title {}", id),
            summary: "Summary".to_string(),
            content: "Body".to_string(),
            author: "Comms Office".to_string(),
            published_at: NaiveDate::from_ymd_opt(2026, 5, 1).unwrap(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            category: None,
            image_url: None,
        }
    }

    fn application(program_id: &str, term: &str) -> ApplicationInfo {
        ApplicationInfo {
            program_id: program_id.to_string(),
            term: term.to_string(),
            deadline: NaiveDate::from_ymd_opt(2027, 1, 15).unwrap(),
            requirements: vec!["Transcript".to_string()],
            status: ApplicationStatus::Open,
            application_url: None,
            fee: None,
        }
    }

    #[test]
    fn get_by_id_exact_match() {
        let items = vec![article("1", "a", &[]), article("2", "b", &[])];
        assert_eq!(get_by_id(&items, "2").unwrap().slug, "b");

        let err = get_by_id(&items, "3").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(err.to_string(), "Article not found");

        // no trimming, no case folding
        assert!(get_by_id(&items, " 2").is_err());
    }

    #[test]
    fn get_by_slug_matches_slug() {
        let items = vec![article("1", "first", &[]), article("2", "second", &[])];
        assert_eq!(get_by_slug(&items, "second").unwrap().id, "2");
        assert!(get_by_slug(&items, "third").is_err());
    }

    #[test]
    fn related_items_by_shared_tag() {
        let source = article("1", "ai-diagnostics-breakthrough", &["ai", "diagnostics"]);
        let items = vec![
            source.clone(),
            article("2", "ai-ethics", &["ai", "ethics"]),
            article("3", "campus-gala", &["events"]),
            article("4", "diagnostic-imaging", &["diagnostics"]),
        ];
        let related = related_items(&items, &source, &source.id, DEFAULT_RELATED_LIMIT);
        let ids: Vec<&str> = related.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec!["2", "4"]);
    }

    #[test]
    fn related_items_respects_limit_and_order() {
        let source = article("0", "src", &["ai"]);
        let items: Vec<NewsArticle> = (0..8)
            .map(|i| article(&i.to_string(), &format!("s{}", i), &["ai"]))
            .collect();

        let related = related_items(&items, &source, "0", 3);
        let ids: Vec<&str> = related.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2", "3"]);

        assert!(related_items(&items, &source, "0", 0).is_empty());
        assert!(related.iter().all(|a| a.id != "0"));
    }

    #[test]
    fn related_items_ignore_tag_case() {
        let source = article("1", "ai-diagnostics-breakthrough", &["ai"]);
        let items = vec![source.clone(), article("2", "ai-fellowship", &["AI"])];
        let related = related_items(&items, &source, &source.id, 3);
        assert_eq!(related.len(), 1);
        assert_eq!(related[0].id, "2");
    }

    #[test]
    fn related_items_empty_when_source_has_no_tags() {
        let source = article("0", "src", &[]);
        let items = vec![article("1", "a", &["ai"])];
        assert!(related_items(&items, &source, "0", 3).is_empty());
    }

    #[test]
    fn filter_by_field_with_and_without_value() {
        let items = vec![
            application("ms-clinical-ai", "Fall 2027"),
            application("phd-biomedical-informatics", "Fall 2027"),
            application("ms-clinical-ai", "Spring 2028"),
        ];

        assert_eq!(filter_by_field(&items, "programId", None).len(), 3);
        assert_eq!(filter_by_field(&items, "programId", Some("")).len(), 3);

        let filtered = filter_by_field(&items, "programId", Some("ms-clinical-ai"));
        assert_eq!(filtered.len(), 2);
        assert_eq!(filtered[1].term, "Spring 2028");

        assert!(filter_by_field(&items, "programId", Some("unknown")).is_empty());
        assert!(filter_by_field(&items, "noSuchField", Some("x")).is_empty());
    }

    #[test]
    fn filter_by_tag_is_case_insensitive() {
        let items = vec![article("1", "a", &["AI"]), article("2", "b", &["events"])];
        assert_eq!(filter_by_tag(&items, Some("ai")).len(), 1);
        assert_eq!(filter_by_tag(&items, None).len(), 2);
    }
}
