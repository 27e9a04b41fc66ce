//! Category page component.

use serde::Serialize;
use wix_headless_core::CategoryId;

use super::UNNAMED;
use super::media::{MediaViewState, image_view};
use super::product_card::{ProductCardViewState, product_cards};
use super::search::ProductSort;
use crate::wix::{Category, CursorQuery, Filter, ProductsPage};

/// Products per category page.
pub const CATEGORY_PAGE_SIZE: u32 = 24;

/// One breadcrumb link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BreadcrumbView {
    pub id: String,
    pub name: String,
    pub url: Option<String>,
}

/// Static category data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategorySlowViewState {
    pub id: String,
    pub name: String,
    pub slug: String,
    pub description: String,
    pub image: Option<MediaViewState>,
    /// Ancestors followed by the category itself (which has no link).
    pub breadcrumbs: Vec<BreadcrumbView>,
    pub product_count: u32,
}

impl CategorySlowViewState {
    #[must_use]
    pub fn from_category(category: &Category) -> Self {
        let name = category
            .name
            .clone()
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| UNNAMED.to_string());

        let mut breadcrumbs: Vec<BreadcrumbView> = category
            .breadcrumbs()
            .iter()
            .map(|b| BreadcrumbView {
                id: b.category_id.to_string(),
                name: b.category_name.clone().unwrap_or_default(),
                url: b.category_slug.as_ref().map(|s| format!("/categories/{s}")),
            })
            .collect();
        breadcrumbs.push(BreadcrumbView {
            id: category.id.to_string(),
            name: name.clone(),
            url: None,
        });

        Self {
            id: category.id.to_string(),
            slug: category.slug.clone().unwrap_or_default(),
            description: category.description.clone().unwrap_or_default(),
            image: category.image.as_ref().and_then(|i| image_view(i, &name)),
            breadcrumbs,
            product_count: category.item_counter.unwrap_or(0),
            name,
        }
    }
}

/// Products of the category, one page at a time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryFastViewState {
    pub products: Vec<ProductCardViewState>,
    pub sort: ProductSort,
    pub next_cursor: Option<String>,
    pub has_more: bool,
}

impl CategoryFastViewState {
    /// State after the first page.
    #[must_use]
    pub fn from_page(sort: ProductSort, page: &ProductsPage) -> Self {
        let mut state = Self {
            products: Vec::new(),
            sort,
            next_cursor: None,
            has_more: false,
        };
        state.append(page);
        state
    }

    /// Append the next page.
    pub fn append(&mut self, page: &ProductsPage) {
        self.products.extend(product_cards(&page.products));
        self.next_cursor = page.paging_metadata.next_cursor().map(str::to_string);
        self.has_more = self.next_cursor.is_some();
    }

    /// Query for `load_more`, or `None` when everything is loaded.
    #[must_use]
    pub fn load_more(&self) -> Option<CursorQuery> {
        self.next_cursor.as_deref().map(next_products_query)
    }

    /// Change the sort key. Paging restarts from the first page.
    #[must_use]
    pub fn sort_by(&mut self, category_id: &CategoryId, sort: ProductSort) -> CursorQuery {
        self.products.clear();
        self.next_cursor = None;
        self.has_more = false;
        self.sort = sort;
        category_products_query(category_id, sort)
    }
}

/// First-page query of the visible products in a category.
#[must_use]
pub fn category_products_query(category_id: &CategoryId, sort: ProductSort) -> CursorQuery {
    let filter = Filter::new()
        .eq("visible", true)
        .match_items_with_ids("allCategoriesInfo.categories", [category_id.as_str()]);
    let query = CursorQuery::with_limit(CATEGORY_PAGE_SIZE).filter(filter);
    match sort.sorting() {
        Some(sorting) => query.sort(sorting),
        None => query,
    }
}

/// Query for the page after `cursor`.
#[must_use]
pub fn next_products_query(cursor: &str) -> CursorQuery {
    CursorQuery::with_limit(CATEGORY_PAGE_SIZE).next_page(cursor)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn page(ids: &[&str], next: Option<&str>) -> ProductsPage {
        serde_json::from_value(serde_json::json!({
            "products": ids
                .iter()
                .map(|id| serde_json::json!({ "_id": id, "name": id, "slug": id }))
                .collect::<Vec<_>>(),
            "pagingMetadata": {
                "count": ids.len(),
                "cursors": { "next": next },
                "hasNext": next.is_some()
            }
        }))
        .unwrap()
    }

    #[test]
    fn test_slow_view_breadcrumbs_end_with_category() {
        let category: Category = serde_json::from_value(serde_json::json!({
            "_id": "shirts",
            "name": "Shirts",
            "slug": "shirts",
            "itemCounter": 12,
            "breadcrumbsInfo": { "breadcrumbs": [
                { "categoryId": "men", "categoryName": "Men", "categorySlug": "men" }
            ] }
        }))
        .unwrap();

        let view = CategorySlowViewState::from_category(&category);
        assert_eq!(view.product_count, 12);
        assert_eq!(view.breadcrumbs.len(), 2);
        assert_eq!(view.breadcrumbs[0].url.as_deref(), Some("/categories/men"));
        assert_eq!(view.breadcrumbs[1].name, "Shirts");
        assert!(view.breadcrumbs[1].url.is_none());
    }

    #[test]
    fn test_products_query_filters_by_category() {
        let json = serde_json::to_value(category_products_query(
            &CategoryId::new("shirts"),
            ProductSort::NameAsc,
        ))
        .unwrap();
        assert_eq!(
            json["filter"]["allCategoriesInfo.categories"]["$matchItems"],
            serde_json::json!([{ "_id": { "$in": ["shirts"] } }])
        );
        assert_eq!(json["sort"][0]["fieldName"], "name");
        assert_eq!(json["cursorPaging"]["limit"], CATEGORY_PAGE_SIZE);
    }

    #[test]
    fn test_load_more_appends() {
        let mut state =
            CategoryFastViewState::from_page(ProductSort::Relevance, &page(&["a", "b"], Some("c2")));
        assert!(state.has_more);

        let query = state.load_more().unwrap();
        let json = serde_json::to_value(&query).unwrap();
        assert_eq!(json["cursorPaging"]["cursor"], "c2");
        assert!(json.get("filter").is_none());

        state.append(&page(&["c"], None));
        assert_eq!(state.products.len(), 3);
        assert!(!state.has_more);
        assert!(state.load_more().is_none());
    }

    #[test]
    fn test_sort_restarts_paging() {
        let mut state =
            CategoryFastViewState::from_page(ProductSort::Relevance, &page(&["a"], Some("c2")));
        let query = state.sort_by(&CategoryId::new("shirts"), ProductSort::Newest);

        assert!(state.products.is_empty());
        assert!(!state.has_more);
        assert_eq!(state.sort, ProductSort::Newest);
        assert!(query.cursor_paging.unwrap().cursor.is_none());
        assert_eq!(query.sort[0].field_name, "_createdDate");
    }
}
