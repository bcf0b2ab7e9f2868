//! Product catalog.
//!
//! The shop's products ship with the crate as a JSON fixture and are loaded
//! once into a [`Catalog`]. Browsing (category pages, filtering, sorting,
//! related products) is a set of read-only queries over it.

use serde::{Deserialize, Serialize};

use crate::types::{Cents, ProductId};

/// Products bundled with the crate.
pub const BUILTIN_CATALOG_JSON: &str = include_str!("../data/products.json");

const NEW_ARRIVALS_LIMIT: usize = 8;
const BESTSELLERS_LIMIT: usize = 4;
const RELATED_LIMIT: usize = 4;

/// Most results returned by a text search.
pub const TEXT_SEARCH_LIMIT: usize = 5;

/// A named color swatch.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ColorOption {
    pub name: String,
    pub hex: String,
}

/// A product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub slug: String,
    pub name: String,
    pub price: Cents,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_price: Option<Cents>,
    pub category: String,
    pub description: String,
    pub details: String,
    pub images: Vec<String>,
    pub colors: Vec<ColorOption>,
    pub sizes: Vec<String>,
    pub rating: f64,
    pub review_count: u32,
    #[serde(default)]
    pub is_new: bool,
    #[serde(default)]
    pub is_bestseller: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub badge: Option<String>,
}

impl Product {
    /// First image, used as the cart and wishlist thumbnail.
    #[must_use]
    pub fn primary_image(&self) -> &str {
        self.images.first().map_or("", String::as_str)
    }

    /// Look up one of the product's colors by name.
    #[must_use]
    pub fn color(&self, name: &str) -> Option<&ColorOption> {
        self.colors.iter().find(|color| color.name == name)
    }

    #[must_use]
    pub fn has_size(&self, size: &str) -> bool {
        self.sizes.iter().any(|s| s == size)
    }

    fn matches(&self, filter: &ProductFilter) -> bool {
        if filter.new_only && !self.is_new {
            return false;
        }
        if !filter.categories.is_empty() && !filter.categories.contains(&self.category) {
            return false;
        }
        if !filter.sizes.is_empty() && !self.sizes.iter().any(|s| filter.sizes.contains(s)) {
            return false;
        }
        if !filter.colors.is_empty()
            && !self
                .colors
                .iter()
                .any(|c| filter.colors.iter().any(|hex| hex.eq_ignore_ascii_case(&c.hex)))
        {
            return false;
        }
        if filter.min_price.is_some_and(|min| self.price < min) {
            return false;
        }
        if filter.max_price.is_some_and(|max| self.price > max) {
            return false;
        }
        true
    }
}

/// Listing order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProductSort {
    /// New arrivals first.
    #[default]
    Newest,
    PriceLow,
    PriceHigh,
    /// Bestsellers first.
    Bestselling,
    /// Highest rating first.
    Rating,
}

/// Listing filter. Empty lists and `None` bounds match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductFilter {
    pub new_only: bool,
    pub categories: Vec<String>,
    pub sizes: Vec<String>,
    /// Color hex codes.
    pub colors: Vec<String>,
    pub min_price: Option<Cents>,
    pub max_price: Option<Cents>,
}

/// Error loading a catalog.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("invalid catalog JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("duplicate product slug: {0}")]
    DuplicateSlug(String),
}

/// The product catalog.
#[derive(Debug, Clone)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    /// Load a catalog from a JSON array of products.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON does not parse or two products share a
    /// slug.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let products: Vec<Product> = serde_json::from_str(json)?;
        for (index, product) in products.iter().enumerate() {
            if products
                .iter()
                .skip(index + 1)
                .any(|other| other.slug == product.slug)
            {
                return Err(CatalogError::DuplicateSlug(product.slug.clone()));
            }
        }
        Ok(Self { products })
    }

    /// The bundled catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if the bundled fixture is malformed.
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::from_json(BUILTIN_CATALOG_JSON)
    }

    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    #[must_use]
    pub fn by_id(&self, id: &ProductId) -> Option<&Product> {
        self.products.iter().find(|p| &p.id == id)
    }

    #[must_use]
    pub fn by_slug(&self, slug: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.slug == slug)
    }

    #[must_use]
    pub fn by_category(&self, category: &str) -> Vec<&Product> {
        self.products
            .iter()
            .filter(|p| p.category == category)
            .collect()
    }

    #[must_use]
    pub fn new_arrivals(&self) -> Vec<&Product> {
        self.products
            .iter()
            .filter(|p| p.is_new)
            .take(NEW_ARRIVALS_LIMIT)
            .collect()
    }

    #[must_use]
    pub fn bestsellers(&self) -> Vec<&Product> {
        self.products
            .iter()
            .filter(|p| p.is_bestseller)
            .take(BESTSELLERS_LIMIT)
            .collect()
    }

    /// Category names in catalog order, without duplicates.
    #[must_use]
    pub fn categories(&self) -> Vec<&str> {
        let mut categories: Vec<&str> = Vec::new();
        for product in &self.products {
            if !categories.contains(&product.category.as_str()) {
                categories.push(&product.category);
            }
        }
        categories
    }

    /// Filter and sort the catalog. Ties keep catalog order.
    #[must_use]
    pub fn search(&self, filter: &ProductFilter, sort: ProductSort) -> Vec<&Product> {
        let mut found: Vec<&Product> = self.products.iter().filter(|p| p.matches(filter)).collect();
        match sort {
            ProductSort::Newest => found.sort_by_key(|p| !p.is_new),
            ProductSort::PriceLow => found.sort_by_key(|p| p.price),
            ProductSort::PriceHigh => found.sort_by_key(|p| std::cmp::Reverse(p.price)),
            ProductSort::Bestselling => found.sort_by_key(|p| !p.is_bestseller),
            ProductSort::Rating => found.sort_by(|a, b| b.rating.total_cmp(&a.rating)),
        }
        found
    }

    /// Products whose name or category contains `query`, ignoring case.
    ///
    /// A blank query finds nothing. Results keep catalog order and stop at
    /// `limit`.
    #[must_use]
    pub fn text_search(&self, query: &str, limit: usize) -> Vec<&Product> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }
        self.products
            .iter()
            .filter(|p| {
                p.name.to_lowercase().contains(&needle)
                    || p.category.to_lowercase().contains(&needle)
            })
            .take(limit)
            .collect()
    }

    /// Other products in the same category as `slug`.
    #[must_use]
    pub fn related(&self, slug: &str) -> Vec<&Product> {
        let Some(product) = self.by_slug(slug) else {
            return Vec::new();
        };
        self.products
            .iter()
            .filter(|p| p.category == product.category && p.id != product.id)
            .take(RELATED_LIMIT)
            .collect()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    fn slugs(products: &[&Product]) -> Vec<String> {
        products.iter().map(|p| p.slug.clone()).collect()
    }

    fn ids<'a>(products: &[&'a Product]) -> Vec<&'a str> {
        products.iter().map(|p| p.id.as_str()).collect()
    }

    #[test]
    fn test_builtin_catalog_loads() {
        let catalog = Catalog::builtin().unwrap();
        assert_eq!(catalog.products().len(), 16);
        let dress = catalog.by_slug("sienna-wrap-dress").unwrap();
        assert_eq!(dress.price, 18_500);
        assert_eq!(dress.primary_image(), dress.images[0]);
        assert!(dress.color("Cream").is_some());
        assert!(dress.has_size("XS"));
    }

    #[test]
    fn test_categories_in_catalog_order() {
        let catalog = Catalog::builtin().unwrap();
        assert_eq!(
            catalog.categories(),
            vec!["Dresses", "Outerwear", "Tops & Blouses", "Accessories", "Bottoms"]
        );
    }

    #[test]
    fn test_collections() {
        let catalog = Catalog::builtin().unwrap();
        assert_eq!(ids(&catalog.new_arrivals()), vec!["1", "4", "8", "9", "11", "16"]);
        assert_eq!(ids(&catalog.bestsellers()), vec!["2", "3", "7", "10"]);
        assert_eq!(ids(&catalog.by_category("Dresses")), vec!["1", "4", "12"]);
    }

    #[test]
    fn test_related_excludes_self() {
        let catalog = Catalog::builtin().unwrap();
        assert_eq!(
            slugs(&catalog.related("sienna-wrap-dress")),
            vec!["alta-midi-dress", "minimalist-shift-dress"]
        );
        assert!(catalog.related("no-such-product").is_empty());
    }

    #[test]
    fn test_filter_by_category_and_price() {
        let catalog = Catalog::builtin().unwrap();
        let filter = ProductFilter {
            categories: vec!["Accessories".to_string()],
            max_price: Some(10_000),
            ..ProductFilter::default()
        };
        assert_eq!(
            ids(&catalog.search(&filter, ProductSort::PriceLow)),
            vec!["5", "9"]
        );
    }

    #[test]
    fn test_filter_by_size_and_color() {
        let catalog = Catalog::builtin().unwrap();
        let one_size = ProductFilter {
            sizes: vec!["One Size".to_string()],
            ..ProductFilter::default()
        };
        assert_eq!(catalog.search(&one_size, ProductSort::Newest).len(), 4);

        let denim = ProductFilter {
            colors: vec!["#6b99b8".to_string()],
            ..ProductFilter::default()
        };
        assert_eq!(
            slugs(&catalog.search(&denim, ProductSort::Newest)),
            vec!["high-waisted-straight-jeans"]
        );
    }

    #[test]
    fn test_sorts() {
        let catalog = Catalog::builtin().unwrap();
        let all = ProductFilter::default();

        let newest = catalog.search(&all, ProductSort::Newest);
        assert_eq!(newest.len(), 16);
        assert!(newest.iter().take(6).all(|p| p.is_new));
        assert_eq!(newest[0].id.as_str(), "1");

        let high = catalog.search(&all, ProductSort::PriceHigh);
        assert_eq!(high[0].slug, "tailored-wool-coat");
        assert!(high.windows(2).all(|w| w[0].price >= w[1].price));

        let low = catalog.search(&all, ProductSort::PriceLow);
        assert_eq!(low[0].slug, "minimalist-leather-belt");

        let best = catalog.search(&all, ProductSort::Bestselling);
        assert!(best.iter().take(5).all(|p| p.is_bestseller));

        let rated = catalog.search(&all, ProductSort::Rating);
        assert!(rated.windows(2).all(|w| w[0].rating >= w[1].rating));
        // ties keep catalog order
        assert_eq!(ids(&rated[..3]), vec!["3", "8", "14"]);
    }

    #[test]
    fn test_new_only() {
        let catalog = Catalog::builtin().unwrap();
        let filter = ProductFilter {
            new_only: true,
            ..ProductFilter::default()
        };
        assert_eq!(catalog.search(&filter, ProductSort::PriceHigh).len(), 6);
    }

    #[test]
    fn test_text_search_matches_name_or_category() {
        let catalog = Catalog::builtin().unwrap();
        assert_eq!(
            ids(&catalog.text_search("DRESS", TEXT_SEARCH_LIMIT)),
            vec!["1", "4", "12"]
        );
        // Category only
        assert_eq!(
            ids(&catalog.text_search("tops", TEXT_SEARCH_LIMIT)),
            vec!["3", "7", "13", "16"]
        );
    }

    #[test]
    fn test_text_search_limit_and_blank_query() {
        let catalog = Catalog::builtin().unwrap();
        assert_eq!(
            ids(&catalog.text_search("a", TEXT_SEARCH_LIMIT)),
            vec!["1", "2", "3", "4", "5"]
        );
        assert!(catalog.text_search("   ", TEXT_SEARCH_LIMIT).is_empty());
        assert!(catalog.text_search("velvet", TEXT_SEARCH_LIMIT).is_empty());
    }

    #[test]
    fn test_duplicate_slug_rejected() {
        let json = r#"[
            {"id":"1","slug":"a","name":"A","price":100,"category":"X","description":"","details":"",
             "images":[],"colors":[],"sizes":[],"rating":4.0,"reviewCount":0},
            {"id":"2","slug":"a","name":"B","price":100,"category":"X","description":"","details":"",
             "images":[],"colors":[],"sizes":[],"rating":4.0,"reviewCount":0}
        ]"#;
        assert!(matches!(
            Catalog::from_json(json),
            Err(CatalogError::DuplicateSlug(slug)) if slug == "a"
        ));
    }

    #[test]
    fn test_sort_wire_names() {
        let sort: ProductSort = serde_json::from_str("\"price-low\"").unwrap();
        assert_eq!(sort, ProductSort::PriceLow);
    }
}
