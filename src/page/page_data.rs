use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::builder::{BuilderComponent, LayerGroup};
use crate::constants::{DEFAULT_PAGE_NAME, DEFAULT_PAGE_ROUTE, PAGE_FORMAT_VERSION};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageStatus {
    #[default]
    Draft,
    Published,
    Archived,
}

/// SEO metadata
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMetadata {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub og_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub og_description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub og_image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub canonical_url: Option<String>,
}

/// A page document: its component forest plus bookkeeping
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    pub id: String,
    pub name: String,
    pub route: String,
    #[serde(default)]
    pub components: Vec<BuilderComponent>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub layer_groups: Vec<LayerGroup>,
    #[serde(default)]
    pub metadata: PageMetadata,
    #[serde(default)]
    pub status: PageStatus,
    /// Incremented on every save
    #[serde(default)]
    pub version: u32,
    #[serde(default = "format_version")]
    pub format_version: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn format_version() -> u32 {
    PAGE_FORMAT_VERSION
}

impl Default for Page {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_NAME, DEFAULT_PAGE_ROUTE)
    }
}

impl Page {
    pub fn new(name: impl Into<String>, route: impl Into<String>) -> Self {
        let now = Utc::now();
        let name = name.into();
        Self {
            id: format!("page_{}", Uuid::new_v4().simple()),
            metadata: PageMetadata {
                title: name.clone(),
                ..Default::default()
            },
            name,
            route: route.into(),
            components: Vec::new(),
            layer_groups: Vec::new(),
            status: PageStatus::Draft,
            version: 0,
            format_version: PAGE_FORMAT_VERSION,
            created_at: now,
            updated_at: now,
        }
    }

    /// Mark a new saved revision
    pub fn touch(&mut self) {
        self.version += 1;
        self.updated_at = Utc::now();
    }

    /// Total number of components, nested ones included
    pub fn component_count(&self) -> usize {
        self.components
            .iter()
            .map(BuilderComponent::subtree_len)
            .sum()
    }
}
