//! Catalog route handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use guzel_core::commerce::ShippingMethod;
use guzel_core::types::Cents;
use guzel_core::catalog::TEXT_SEARCH_LIMIT;
use guzel_core::{Product, ProductFilter, ProductSort};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::state::AppState;

/// Listing query parameters.
///
/// List-valued filters are comma separated, e.g.
/// `?category=Dresses,Bottoms&size=S,M&sort=price-low`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductsQuery {
    #[serde(default)]
    pub new: bool,
    pub category: Option<String>,
    pub size: Option<String>,
    /// Color hex codes.
    pub color: Option<String>,
    pub min_price: Option<Cents>,
    pub max_price: Option<Cents>,
    #[serde(default)]
    pub sort: ProductSort,
}

impl ProductsQuery {
    fn filter(&self) -> ProductFilter {
        ProductFilter {
            new_only: self.new,
            categories: split_list(self.category.as_deref()),
            sizes: split_list(self.size.as_deref()),
            colors: split_list(self.color.as_deref()),
            min_price: self.min_price,
            max_price: self.max_price,
        }
    }
}

fn split_list(value: Option<&str>) -> Vec<String> {
    value
        .map(|v| {
            v.split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

#[derive(Debug, Serialize)]
pub struct ProductList {
    pub products: Vec<Product>,
    pub total: usize,
}

/// Text search query, `?q=linen`.
#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
}

#[derive(Debug, Serialize)]
pub struct SearchResults {
    pub products: Vec<Product>,
}

#[derive(Debug, Serialize)]
pub struct ProductDetail {
    pub product: Product,
    pub related: Vec<Product>,
}

#[derive(Debug, Serialize)]
pub struct CategoryList {
    pub categories: Vec<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingMethodList {
    pub shipping_methods: Vec<ShippingMethod>,
}

/// List products, filtered and sorted.
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<ProductsQuery>,
) -> Json<ProductList> {
    let products: Vec<Product> = state
        .catalog()
        .search(&query.filter(), query.sort)
        .into_iter()
        .cloned()
        .collect();

    Json(ProductList {
        total: products.len(),
        products,
    })
}

/// Quick search by product name or category.
#[instrument(skip(state))]
pub async fn search(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Json<SearchResults> {
    Json(SearchResults {
        products: state
            .catalog()
            .text_search(&query.q, TEXT_SEARCH_LIMIT)
            .into_iter()
            .cloned()
            .collect(),
    })
}

/// Show a product with related products from its category.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<ProductDetail>> {
    let catalog = state.catalog();
    let product = catalog
        .by_slug(&slug)
        .cloned()
        .ok_or_else(|| AppError::NotFound("Product not found".to_string()))?;
    let related = catalog.related(&slug).into_iter().cloned().collect();

    Ok(Json(ProductDetail { product, related }))
}

pub async fn categories(State(state): State<AppState>) -> Json<CategoryList> {
    Json(CategoryList {
        categories: state
            .catalog()
            .categories()
            .into_iter()
            .map(str::to_string)
            .collect(),
    })
}

pub async fn shipping_methods(State(state): State<AppState>) -> Json<ShippingMethodList> {
    Json(ShippingMethodList {
        shipping_methods: state.shipping_methods().to_vec(),
    })
}
