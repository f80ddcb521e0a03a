//! crates/greenlife_core/src/catalog.rs
//!
//! The product list held by a storefront session, plus the shop-page filters.

use rust_decimal::Decimal;
use uuid::Uuid;

use crate::domain::Product;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    /// Keep the order the backend returned.
    #[default]
    Newest,
    PriceLow,
    PriceHigh,
}

/// Filters applied on the shop page.
#[derive(Debug, Clone, Default)]
pub struct CatalogQuery {
    /// Case-insensitive substring of the product name.
    pub text: Option<String>,
    /// `None` matches every category.
    pub category: Option<String>,
    /// Inclusive upper bound on price.
    pub max_price: Option<Decimal>,
    pub sort: SortOrder,
}

#[derive(Debug, Clone, Default)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    pub fn new(products: Vec<Product>) -> Self {
        Self { products }
    }

    pub fn replace(&mut self, products: Vec<Product>) {
        self.products = products;
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn get(&self, product_id: Uuid) -> Option<&Product> {
        self.products.iter().find(|p| p.id == product_id)
    }

    pub fn new_arrivals(&self) -> Vec<&Product> {
        self.products.iter().filter(|p| p.is_new).collect()
    }

    pub fn best_sellers(&self) -> Vec<&Product> {
        self.products.iter().filter(|p| p.is_best_seller).collect()
    }

    pub fn filter(&self, query: &CatalogQuery) -> Vec<&Product> {
        let needle = query.text.as_deref().map(str::to_lowercase);
        let mut matches: Vec<&Product> = self
            .products
            .iter()
            .filter(|p| {
                needle
                    .as_deref()
                    .map_or(true, |n| p.name.to_lowercase().contains(n))
            })
            .filter(|p| query.category.as_deref().map_or(true, |c| p.category == c))
            .filter(|p| query.max_price.map_or(true, |max| p.price <= max))
            .collect();

        match query.sort {
            SortOrder::Newest => {}
            SortOrder::PriceLow => matches.sort_by(|a, b| a.price.cmp(&b.price)),
            SortOrder::PriceHigh => matches.sort_by(|a, b| b.price.cmp(&a.price)),
        }
        matches
    }
}
