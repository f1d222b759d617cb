use chrono::NaiveDate;
use serde::Serialize;
use serde_json::Value;

use super::{Collection, Entity, Fielded, Identified, Slugged, Tagged};
use crate::schema::{self, ValidationError};

/// News article. `content` is Markdown; the news detail route renders it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsArticle {
    pub id: String,
    pub slug: String,
    pub title: String,
    pub summary: String,
    pub content: String,
    pub author: String,
    pub published_at: NaiveDate,
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl Entity for NewsArticle {
    const COLLECTION: Collection = Collection::News;
    const LABEL: &'static str = "Article";

    fn validate(raw: &Value) -> Result<Self, ValidationError> {
        schema::validate_news(raw)
    }

    fn unique_keys(&self) -> Vec<(&'static str, &str)> {
        vec![("id", &self.id), ("slug", &self.slug)]
    }
}

impl Identified for NewsArticle {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Slugged for NewsArticle {
    fn slug(&self) -> &str {
        &self.slug
    }
}

impl Tagged for NewsArticle {
    fn tags(&self) -> &[String] {
        &self.tags
    }
}

impl Fielded for NewsArticle {
    fn field(&self, name: &str) -> Option<&str> {
        match name {
            "id" => Some(&self.id),
            "slug" => Some(&self.slug),
            "author" => Some(&self.author),
            "category" => self.category.as_deref(),
            _ => None,
        }
    }
}
