//! Categories API methods for the Wix Stores tree.

use serde::Serialize;
use tracing::{debug, instrument};

use super::WixError;
use super::cache::{CacheKey, CacheValue};
use super::client::WixClient;
use super::paging::{Collected, collect_all};
use super::types::{
    BreadcrumbsInfo, CategoriesPage, Category, CategoryResponse, CursorQuery, STORES_APP_NAMESPACE,
    TreeReference,
};

const TREE_PARAM: (&str, &str) = ("treeReference.appNamespace", STORES_APP_NAMESPACE);

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CategoryQueryBody<'a> {
    query: &'a CursorQuery,
    tree_reference: TreeReference,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    fields: Vec<&'static str>,
}

impl WixClient {
    /// Query one page of store categories.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, query))]
    pub async fn query_categories(&self, query: &CursorQuery) -> Result<CategoriesPage, WixError> {
        self.post(
            "/categories/v1/categories/query",
            &CategoryQueryBody {
                query,
                tree_reference: TreeReference::default(),
                fields: vec!["BREADCRUMBS_INFO"],
            },
        )
        .await
    }

    /// Query every page of store categories.
    ///
    /// # Errors
    ///
    /// Returns the first page error.
    pub async fn query_all_categories(
        &self,
        query: CursorQuery,
    ) -> Result<Collected<Category>, WixError> {
        collect_all(query, |q| async move {
            let page = self.query_categories(&q).await?;
            Ok((page.categories, page.paging_metadata))
        })
        .await
    }

    /// Get a category by slug.
    ///
    /// # Errors
    ///
    /// Returns an error if the category is not found or the API request fails.
    #[instrument(skip(self), fields(slug = %slug))]
    pub async fn get_category_by_slug(&self, slug: &str) -> Result<Category, WixError> {
        let cache_key = CacheKey::CategoryBySlug(slug.to_string());

        if let Some(CacheValue::Category(category)) = self.cached(&cache_key).await {
            debug!("Cache hit for category");
            return Ok(*category);
        }

        let path = format!("/categories/v1/categories/slug/{}", urlencoding::encode(slug));
        let response: CategoryResponse = self
            .get(&path, &[TREE_PARAM, ("fields", "BREADCRUMBS_INFO")])
            .await?;
        let category = response
            .category
            .ok_or_else(|| WixError::NotFound(format!("Category not found: {slug}")))?;

        self.store(cache_key, CacheValue::Category(Box::new(category.clone())))
            .await;

        Ok(category)
    }

    /// Get a category by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the category is not found or the API request fails.
    #[instrument(skip(self), fields(id = %id))]
    pub async fn get_category(&self, id: &str) -> Result<Category, WixError> {
        let path = format!("/categories/v1/categories/{}", urlencoding::encode(id));
        let response: CategoryResponse = self.get(&path, &[TREE_PARAM]).await?;
        response
            .category
            .ok_or_else(|| WixError::NotFound(format!("Category not found: {id}")))
    }
}

impl Category {
    /// Breadcrumbs with this category appended as the last crumb.
    #[must_use]
    pub fn trail(&self) -> BreadcrumbsInfo {
        let mut breadcrumbs = self.breadcrumbs().to_vec();
        breadcrumbs.push(super::types::Breadcrumb {
            category_id: self.id.clone(),
            category_name: self.name.clone(),
            category_slug: self.slug.clone(),
        });
        BreadcrumbsInfo { breadcrumbs }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_query_body_includes_tree_reference() {
        let query = CursorQuery::with_limit(100);
        let body = CategoryQueryBody {
            query: &query,
            tree_reference: TreeReference::default(),
            fields: vec!["BREADCRUMBS_INFO"],
        };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            serde_json::json!({
                "query": { "cursorPaging": { "limit": 100 } },
                "treeReference": { "appNamespace": "@wix/stores" },
                "fields": ["BREADCRUMBS_INFO"]
            })
        );
    }

    #[test]
    fn test_trail_appends_self() {
        let category: Category = serde_json::from_value(serde_json::json!({
            "_id": "shirts",
            "name": "Shirts",
            "slug": "shirts",
            "breadcrumbsInfo": { "breadcrumbs": [
                { "categoryId": "men", "categoryName": "Men", "categorySlug": "men" }
            ] }
        }))
        .unwrap();
        let trail = category.trail();
        let names: Vec<_> = trail
            .breadcrumbs
            .iter()
            .filter_map(|b| b.category_name.as_deref())
            .collect();
        assert_eq!(names, vec!["Men", "Shirts"]);
    }
}
