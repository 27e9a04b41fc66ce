//! Categories API shapes.

use serde::{Deserialize, Serialize};
use wix_headless_core::CategoryId;

use super::common::{ImageRef, PagingMetadata};

/// App namespace of the Wix Stores category tree.
pub const STORES_APP_NAMESPACE: &str = "@wix/stores";

/// A store category.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    /// Category ID.
    #[serde(rename = "_id", alias = "id", default)]
    pub id: CategoryId,
    /// Category name.
    pub name: Option<String>,
    /// URL slug.
    pub slug: Option<String>,
    /// Plain text description.
    pub description: Option<String>,
    /// Whether the category is visible on the site.
    pub visible: Option<bool>,
    /// Category image.
    pub image: Option<ImageRef>,
    /// Number of items assigned to the category.
    pub item_counter: Option<u32>,
    /// Parent category.
    pub parent_category: Option<ParentCategory>,
    /// Path from the root category.
    pub breadcrumbs_info: Option<BreadcrumbsInfo>,
}

impl Category {
    /// Breadcrumbs, or an empty slice.
    #[must_use]
    pub fn breadcrumbs(&self) -> &[Breadcrumb] {
        self.breadcrumbs_info
            .as_ref()
            .map_or(&[], |info| info.breadcrumbs.as_slice())
    }
}

/// Parent reference.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParentCategory {
    #[serde(rename = "_id", alias = "id", default)]
    pub id: CategoryId,
}

/// Breadcrumbs wrapper.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreadcrumbsInfo {
    #[serde(default)]
    pub breadcrumbs: Vec<Breadcrumb>,
}

/// One ancestor category.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Breadcrumb {
    #[serde(default)]
    pub category_id: CategoryId,
    pub category_name: Option<String>,
    pub category_slug: Option<String>,
}

/// Category tree selector sent with every Categories API call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeReference {
    pub app_namespace: String,
}

impl Default for TreeReference {
    fn default() -> Self {
        Self {
            app_namespace: STORES_APP_NAMESPACE.to_string(),
        }
    }
}

/// `{ "category": ... }` response.
#[derive(Debug, Clone, Deserialize)]
pub struct CategoryResponse {
    pub category: Option<Category>,
}

/// `{ "categories": [...], "pagingMetadata": ... }` response.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoriesPage {
    #[serde(default)]
    pub categories: Vec<Category>,
    #[serde(default)]
    pub paging_metadata: PagingMetadata,
}
