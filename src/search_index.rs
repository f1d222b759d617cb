//! FST-based Search Index over site content
//!
//! Provides prefix and fuzzy (one typo) search across:
//! - Faculty names and research interests
//! - Research project titles and tags
//! - Program names and degree types
//! - News titles and tags
//!
//! The index is immutable once built; `ContentService::rebuild_search_index`
//! builds a fresh one and swaps it in.

use chrono::{DateTime, Utc};
use fst::automaton::Levenshtein;
use fst::{Automaton, IntoStreamer, Map, MapBuilder, Streamer};
use rustc_hash::{FxHashMap, FxHashSet};
use serde::Serialize;

use crate::error::ContentError;
use crate::models::{Collection, StringEnum};
use crate::service::ContentSnapshot;

/// Words shorter than this are not indexed on their own
const MIN_WORD_LEN: usize = 3;

/// Reference to a page in the index
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchHit {
    pub kind: Collection,
    pub id: String,
    pub title: String,
    pub href: String,
}

pub struct SearchIndex {
    /// FST mapping normalized search term -> first document index
    fst_map: Map<Vec<u8>>,
    /// All documents (indexed by position)
    docs: Vec<SearchHit>,
    /// Reverse lookup: search term -> list of document indices (for duplicates)
    term_to_indices: FxHashMap<String, Vec<usize>>,
    /// Size of FST in bytes (stored at build time)
    fst_size: usize,
    built_at: Option<DateTime<Utc>>,
}

impl SearchIndex {
    /// Index with no documents, used until the first successful build
    pub fn empty() -> Self {
        Self {
            fst_map: Map::default(),
            docs: Vec::new(),
            term_to_indices: FxHashMap::default(),
            fst_size: 0,
            built_at: None,
        }
    }

    /// Build search index from a fully loaded content snapshot
    pub fn build(snapshot: &ContentSnapshot) -> Result<Self, ContentError> {
        let start = std::time::Instant::now();

        let mut docs: Vec<SearchHit> = Vec::new();
        let mut search_terms: Vec<(String, usize)> = Vec::new(); // (term, doc_index)

        let mut add = |hit: SearchHit, phrases: Vec<&str>| {
            let idx = docs.len();
            for phrase in phrases {
                index_phrase(phrase, idx, &mut search_terms);
            }
            docs.push(hit);
        };

        for member in snapshot.faculty.iter() {
            let mut phrases = vec![member.name.as_str(), member.title.as_str()];
            phrases.extend(member.research_interests.iter().map(String::as_str));
            if let Some(dept) = &member.department {
                phrases.push(dept);
            }
            add(
                SearchHit {
                    kind: Collection::Faculty,
                    id: member.id.clone(),
                    title: member.name.clone(),
                    href: format!("/faculty/{}", member.id),
                },
                phrases,
            );
        }

        for project in snapshot.research.iter() {
            let mut phrases = vec![project.title.as_str()];
            phrases.extend(project.tags.iter().map(String::as_str));
            add(
                SearchHit {
                    kind: Collection::Research,
                    id: project.id.clone(),
                    title: project.title.clone(),
                    href: format!("/research/{}", project.id),
                },
                phrases,
            );
        }

        for program in snapshot.programs.iter() {
            add(
                SearchHit {
                    kind: Collection::Programs,
                    id: program.id.clone(),
                    title: program.name.clone(),
                    href: format!("/programs/{}", program.id),
                },
                vec![program.name.as_str(), program.degree_type.as_str()],
            );
        }

        for article in snapshot.news.iter() {
            let mut phrases = vec![article.title.as_str()];
            phrases.extend(article.tags.iter().map(String::as_str));
            if let Some(category) = &article.category {
                phrases.push(category);
            }
            add(
                SearchHit {
                    kind: Collection::News,
                    id: article.id.clone(),
                    title: article.title.clone(),
                    href: format!("/news/{}", article.slug),
                },
                phrases,
            );
        }

        let index = Self::from_terms(docs, search_terms)?;

        tracing::info!(
            "Search index built in {:?} ({} documents, {} unique terms, {} bytes)",
            start.elapsed(),
            index.docs.len(),
            index.term_to_indices.len(),
            index.fst_size
        );

        Ok(index)
    }

    fn from_terms(docs: Vec<SearchHit>, mut search_terms: Vec<(String, usize)>) -> Result<Self, ContentError> {
        // Sort terms lexicographically (required for FST)
        search_terms.sort();

        // Build term -> indices map (for handling duplicates)
        let mut term_to_indices: FxHashMap<String, Vec<usize>> = FxHashMap::default();
        for (term, idx) in &search_terms {
            let indices = term_to_indices.entry(term.clone()).or_default();
            if indices.last() != Some(idx) {
                indices.push(*idx);
            }
        }

        // FST requires unique keys
        search_terms.dedup_by(|a, b| a.0 == b.0);

        let mut builder = MapBuilder::memory();
        for (term, idx) in &search_terms {
            builder.insert(term.as_bytes(), *idx as u64).map_err(fst_error)?;
        }
        let fst_bytes = builder.into_inner().map_err(fst_error)?;
        let fst_size = fst_bytes.len();
        let fst_map = Map::new(fst_bytes).map_err(fst_error)?;

        Ok(Self {
            fst_map,
            docs,
            term_to_indices,
            fst_size,
            built_at: Some(Utc::now()),
        })
    }

    /// Prefix search (fast, for typeahead)
    pub fn search_prefix(&self, query: &str, limit: usize) -> Vec<&SearchHit> {
        let query_lower = normalize(query);
        if query_lower.is_empty() {
            return vec![];
        }

        let prefix = fst::automaton::Str::new(&query_lower).starts_with();
        self.collect(self.fst_map.search(prefix).into_stream(), limit)
    }

    /// Fuzzy search (allows typos)
    pub fn search_fuzzy(&self, query: &str, max_distance: u32, limit: usize) -> Vec<&SearchHit> {
        let query_lower = normalize(query);
        if query_lower.is_empty() {
            return vec![];
        }

        let lev = match Levenshtein::new(&query_lower, max_distance) {
            Ok(l) => l,
            Err(e) => {
                tracing::debug!("Levenshtein automaton unavailable for '{}': {}", query_lower, e);
                return self.search_prefix(query, limit);
            }
        };

        self.collect(self.fst_map.search(lev).into_stream(), limit)
    }

    /// Combined search: prefix first, then fuzzy if few results
    pub fn search(&self, query: &str, limit: usize) -> Vec<&SearchHit> {
        let prefix_results = self.search_prefix(query, limit);

        if prefix_results.len() >= limit / 2 {
            return prefix_results;
        }

        if query.trim().len() >= 3 {
            let fuzzy_results = self.search_fuzzy(query, 1, limit);
            if fuzzy_results.len() > prefix_results.len() {
                return fuzzy_results;
            }
        }

        prefix_results
    }

    fn collect<'a, S>(&'a self, mut stream: S, limit: usize) -> Vec<&'a SearchHit>
    where
        S: for<'s> Streamer<'s, Item = (&'s [u8], u64)>,
    {
        let mut seen: FxHashSet<usize> = FxHashSet::default();
        let mut results: Vec<&SearchHit> = Vec::new();

        while let Some((term, _idx)) = stream.next() {
            let Ok(term_str) = std::str::from_utf8(term) else {
                continue;
            };
            let Some(indices) = self.term_to_indices.get(term_str) else {
                continue;
            };
            for &doc_idx in indices {
                if let Some(doc) = self.docs.get(doc_idx) {
                    if seen.insert(doc_idx) {
                        results.push(doc);
                        if results.len() >= limit {
                            return results;
                        }
                    }
                }
            }
        }

        results
    }

    pub fn len(&self) -> usize {
        self.docs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }

    /// Get index statistics
    pub fn stats(&self) -> SearchIndexStats {
        SearchIndexStats {
            document_count: self.docs.len(),
            term_count: self.term_to_indices.len(),
            fst_bytes: self.fst_size,
            built_at: self.built_at.map(|t| t.to_rfc3339()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchIndexStats {
    pub document_count: usize,
    pub term_count: usize,
    pub fst_bytes: usize,
    pub built_at: Option<String>,
}

fn normalize(text: &str) -> String {
    text.trim().to_lowercase()
}

/// Index the whole phrase plus each word long enough to search on its own
fn index_phrase(phrase: &str, doc_idx: usize, terms: &mut Vec<(String, usize)>) {
    let lower = normalize(phrase);
    if lower.is_empty() {
        return;
    }
    for word in lower.split(|c: char| !c.is_alphanumeric()) {
        if word.chars().count() >= MIN_WORD_LEN && word != lower {
            terms.push((word.to_string(), doc_idx));
        }
    }
    terms.push((lower, doc_idx));
}

fn fst_error(e: fst::Error) -> ContentError {
    ContentError::Upstream {
        stage: "search index build",
        message: e.to_string(),
    }
}
