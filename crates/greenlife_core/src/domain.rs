//! crates/greenlife_core/src/domain.rs
//!
//! Defines the core data structures shared by the storefront client and the API.
//! Money is kept as `Decimal` and goes over the wire as a JSON number; field
//! names are camelCase to match the storefront's JSON contract.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Products with fewer units than this are reported as low stock.
pub const LOW_STOCK_THRESHOLD: u32 = 5;

/// Category assigned to products created without one.
pub const DEFAULT_CATEGORY: &str = "General";

/// Highest accepted product price. Keeps `price × u32::MAX` and sums of such
/// lines inside `Decimal`'s range.
pub fn max_price() -> Decimal {
    Decimal::new(1_000_000, 0)
}

fn check_price(price: Decimal) -> Result<(), String> {
    if price.is_sign_negative() {
        return Err("Price must not be negative".to_string());
    }
    if price > max_price() {
        return Err(format!("Price must not exceed {}", max_price()));
    }
    Ok(())
}

//=========================================================================================
// Catalog
//=========================================================================================

/// A product as listed in the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    #[cfg_attr(feature = "openapi", schema(value_type = f64))]
    pub price: Decimal,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub stock: u32,
    #[serde(default)]
    pub is_new: bool,
    #[serde(default)]
    pub is_best_seller: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The admin payload for creating a product. `name` and `price` are required;
/// everything else falls back to a default.
#[derive(Debug, Clone, Default, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct ProductDraft {
    pub name: Option<String>,
    #[cfg_attr(feature = "openapi", schema(value_type = Option<f64>))]
    pub price: Option<Decimal>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub image: Option<String>,
    pub stock: Option<u32>,
    pub is_new: Option<bool>,
    pub is_best_seller: Option<bool>,
}

/// A validated product ready to be stored.
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    pub name: String,
    pub price: Decimal,
    pub description: String,
    pub category: String,
    pub image: String,
    pub stock: u32,
    pub is_new: bool,
    pub is_best_seller: bool,
}

impl ProductDraft {
    /// Checks the required fields and fills in defaults.
    pub fn validate(self) -> Result<NewProduct, String> {
        let name = self
            .name
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty());
        let (Some(name), Some(price)) = (name, self.price) else {
            return Err("Name and price are required".to_string());
        };
        check_price(price)?;

        Ok(NewProduct {
            name,
            price,
            description: self.description.unwrap_or_default(),
            category: self
                .category
                .filter(|c| !c.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_CATEGORY.to_string()),
            image: self.image.unwrap_or_default(),
            stock: self.stock.unwrap_or(0),
            is_new: self.is_new.unwrap_or(false),
            is_best_seller: self.is_best_seller.unwrap_or(false),
        })
    }
}

/// A partial product update. Absent fields are left untouched; an empty name
/// or category is ignored rather than stored.
#[derive(Debug, Clone, Default, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct ProductPatch {
    pub name: Option<String>,
    #[cfg_attr(feature = "openapi", schema(value_type = Option<f64>))]
    pub price: Option<Decimal>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub image: Option<String>,
    pub stock: Option<u32>,
    pub is_new: Option<bool>,
    pub is_best_seller: Option<bool>,
}

impl ProductPatch {
    /// Applies the patch to `product`, bumping `updated_at`.
    pub fn apply(self, product: &mut Product, now: DateTime<Utc>) -> Result<(), String> {
        if let Some(price) = self.price {
            check_price(price)?;
            product.price = price;
        }
        if let Some(name) = self.name.filter(|n| !n.trim().is_empty()) {
            product.name = name.trim().to_string();
        }
        if let Some(description) = self.description {
            product.description = description;
        }
        if let Some(category) = self.category.filter(|c| !c.trim().is_empty()) {
            product.category = category;
        }
        if let Some(image) = self.image {
            product.image = image;
        }
        if let Some(stock) = self.stock {
            product.stock = stock;
        }
        if let Some(is_new) = self.is_new {
            product.is_new = is_new;
        }
        if let Some(is_best_seller) = self.is_best_seller {
            product.is_best_seller = is_best_seller;
        }
        product.updated_at = now;
        Ok(())
    }
}

/// A product category managed from the admin panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub image: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The admin payload for creating or renaming a category.
#[derive(Debug, Clone, Default, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct CategoryDraft {
    pub name: Option<String>,
    pub image: Option<String>,
}

/// A validated category name and image, both trimmed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCategory {
    pub name: String,
    pub image: Option<String>,
}

impl CategoryDraft {
    pub fn validate(self) -> Result<NewCategory, String> {
        let name = self
            .name
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty())
            .ok_or_else(|| "Category name is required".to_string())?;
        Ok(NewCategory {
            name,
            image: self.image.map(|i| i.trim().to_string()),
        })
    }
}

/// Inventory figures shown on the admin dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct ProductStats {
    pub total_products: usize,
    /// Sum of price × stock, counting out-of-stock products as one unit.
    /// Saturates at `Decimal::MAX`.
    #[cfg_attr(feature = "openapi", schema(value_type = f64))]
    pub total_value: Decimal,
    pub low_stock_products: Vec<Product>,
}

impl ProductStats {
    pub fn from_products(products: &[Product]) -> Self {
        let total_value = products
            .iter()
            .map(|p| p.price.saturating_mul(Decimal::from(p.stock.max(1))))
            .fold(Decimal::ZERO, Decimal::saturating_add);
        let low_stock_products = products
            .iter()
            .filter(|p| p.stock < LOW_STOCK_THRESHOLD)
            .cloned()
            .collect();
        Self {
            total_products: products.len(),
            total_value,
            low_stock_products,
        }
    }
}

//=========================================================================================
// Cart and Orders
//=========================================================================================

/// One product in a shopper's cart. The product fields are a snapshot taken
/// when the product was first added.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    pub product_id: Uuid,
    pub name: String,
    pub price: Decimal,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub image: String,
    pub quantity: u32,
}

impl CartLine {
    /// Starts a new line for `product` with a quantity of one.
    pub fn new(product: &Product) -> Self {
        Self {
            product_id: product.id,
            name: product.name.clone(),
            price: product.price,
            description: product.description.clone(),
            category: product.category.clone(),
            image: product.image.clone(),
            quantity: 1,
        }
    }

    /// `None` when price × quantity does not fit in a `Decimal`.
    pub fn line_total(&self) -> Option<Decimal> {
        self.price.checked_mul(Decimal::from(self.quantity))
    }

    /// Copies this line into an order item.
    pub fn to_order_item(&self) -> OrderItem {
        OrderItem {
            product_id: self.product_id,
            name: self.name.clone(),
            price: self.price,
            quantity: self.quantity,
            image: self.image.clone(),
            category: self.category.clone(),
        }
    }
}

/// A line item frozen into an order at checkout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub product_id: Uuid,
    pub name: String,
    #[cfg_attr(feature = "openapi", schema(value_type = f64))]
    pub price: Decimal,
    pub quantity: u32,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub category: String,
}

impl OrderItem {
    pub fn line_total(&self) -> Option<Decimal> {
        self.price.checked_mul(Decimal::from(self.quantity))
    }
}

/// Sum of price × quantity over `items`, or `None` on overflow.
pub fn order_total(items: &[OrderItem]) -> Option<Decimal> {
    items
        .iter()
        .try_fold(Decimal::ZERO, |acc, item| acc.checked_add(item.line_total()?))
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    #[default]
    Pending,
    Shipped,
    Delivered,
    Cancelled,
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Shipped => "shipped",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
        };
        f.write_str(s)
    }
}

impl FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(OrderStatus::Pending),
            "shipped" => Ok(OrderStatus::Shipped),
            "delivered" => Ok(OrderStatus::Delivered),
            "cancelled" => Ok(OrderStatus::Cancelled),
            other => Err(format!("unknown order status '{}'", other)),
        }
    }
}

/// A placed order. Never changed after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: Uuid,
    pub user_id: Uuid,
    pub items: Vec<OrderItem>,
    #[cfg_attr(feature = "openapi", schema(value_type = f64))]
    pub total: Decimal,
    #[serde(default)]
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
}

/// The checkout payload sent to `POST /api/orders`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewOrder {
    pub user_id: Uuid,
    pub items: Vec<OrderItem>,
    pub total: Decimal,
}

impl NewOrder {
    /// Snapshots `lines` and computes the total from the captured prices.
    /// `None` when the total overflows.
    pub fn from_cart(user_id: Uuid, lines: &[CartLine]) -> Option<Self> {
        let items: Vec<OrderItem> = lines.iter().map(CartLine::to_order_item).collect();
        let total = order_total(&items)?;
        Some(Self {
            user_id,
            items,
            total,
        })
    }
}

//=========================================================================================
// Users
//=========================================================================================

/// The public view of an account. Never carries the password hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub is_admin: bool,
}

// Only used internally for login - contains sensitive data
#[derive(Debug, Clone)]
pub struct UserCredentials {
    pub user: User,
    pub hashed_password: String,
}

/// A logged-in user plus the bearer token issued at login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionUser {
    #[serde(flatten)]
    pub user: User,
    pub token: String,
}

// Represents an issued bearer token
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub token: String,
    pub user_id: Uuid,
    pub expires_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(price: &str, stock: u32) -> Product {
        let now = Utc::now();
        Product {
            id: Uuid::new_v4(),
            name: "Organic Kale Bunch".to_string(),
            price: price.parse().unwrap(),
            description: String::new(),
            category: "Vegetables".to_string(),
            image: String::new(),
            stock,
            is_new: false,
            is_best_seller: false,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn draft_requires_name_and_price() {
        let err = ProductDraft {
            name: Some("  ".to_string()),
            price: Some(Decimal::ONE),
            ..Default::default()
        }
        .validate()
        .unwrap_err();
        assert_eq!(err, "Name and price are required");

        let err = ProductDraft {
            name: Some("Milk".to_string()),
            ..Default::default()
        }
        .validate()
        .unwrap_err();
        assert_eq!(err, "Name and price are required");
    }

    #[test]
    fn draft_fills_defaults() {
        let new = ProductDraft {
            name: Some("Milk".to_string()),
            price: Some("3.50".parse().unwrap()),
            ..Default::default()
        }
        .validate()
        .unwrap();
        assert_eq!(new.category, DEFAULT_CATEGORY);
        assert_eq!(new.stock, 0);
        assert!(!new.is_new && !new.is_best_seller);
    }

    #[test]
    fn patch_ignores_empty_name_and_keeps_absent_fields() {
        let mut p = product("2.99", 10);
        let patch = ProductPatch {
            name: Some(String::new()),
            stock: Some(3),
            ..Default::default()
        };
        patch.apply(&mut p, Utc::now()).unwrap();
        assert_eq!(p.name, "Organic Kale Bunch");
        assert_eq!(p.stock, 3);
        assert_eq!(p.price, "2.99".parse::<Decimal>().unwrap());
    }

    #[test]
    fn stats_count_out_of_stock_as_one_unit() {
        let products = vec![product("2.00", 0), product("1.50", 10)];
        let stats = ProductStats::from_products(&products);
        assert_eq!(stats.total_products, 2);
        assert_eq!(stats.total_value, "17.00".parse::<Decimal>().unwrap());
        assert_eq!(stats.low_stock_products.len(), 1);
    }

    #[test]
    fn new_order_total_uses_captured_prices() {
        let mut avocado = CartLine::new(&product("4.99", 10));
        avocado.quantity = 2;
        let quinoa = CartLine::new(&product("12.99", 10));

        let order = NewOrder::from_cart(Uuid::new_v4(), &[avocado, quinoa]).unwrap();
        assert_eq!(order.items.len(), 2);
        assert_eq!(order.total, "22.97".parse::<Decimal>().unwrap());
    }

    #[test]
    fn prices_above_the_ceiling_are_rejected() {
        let err = ProductDraft {
            name: Some("Saffron".to_string()),
            price: Some(Decimal::new(1_000_001, 0)),
            ..Default::default()
        }
        .validate()
        .unwrap_err();
        assert_eq!(err, "Price must not exceed 1000000");

        let mut p = product("2.99", 10);
        let patch = ProductPatch {
            price: Some(Decimal::MAX),
            ..Default::default()
        };
        assert!(patch.apply(&mut p, Utc::now()).is_err());
        assert_eq!(p.price, "2.99".parse::<Decimal>().unwrap());
    }

    #[test]
    fn order_total_reports_overflow() {
        let items: Vec<OrderItem> = serde_json::from_value(serde_json::json!([
            { "productId": Uuid::new_v4(), "name": "x", "price": 7e28, "quantity": 2 }
        ]))
        .unwrap();
        assert_eq!(order_total(&items), None);

        let mut line = CartLine::new(&product("1.00", 1));
        line.price = Decimal::MAX;
        line.quantity = 2;
        assert_eq!(line.line_total(), None);
        assert!(NewOrder::from_cart(Uuid::new_v4(), &[line]).is_none());
    }

    #[test]
    fn max_priced_cart_line_still_fits() {
        let mut line = CartLine::new(&product("1.00", 1));
        line.price = max_price();
        line.quantity = u32::MAX;
        let order = NewOrder::from_cart(Uuid::new_v4(), &[line.clone(), line]).unwrap();
        assert_eq!(order.total, max_price() * Decimal::from(u32::MAX) * Decimal::TWO);
    }

    #[test]
    fn stats_saturate_instead_of_overflowing() {
        let mut pricey = product("1.00", 10);
        pricey.price = Decimal::MAX;
        let stats = ProductStats::from_products(&[pricey.clone(), pricey]);
        assert_eq!(stats.total_value, Decimal::MAX);
    }

    #[test]
    fn session_user_flattens_into_one_object() {
        let session = SessionUser {
            user: User {
                id: Uuid::new_v4(),
                name: "Ada".to_string(),
                email: "ada@example.com".to_string(),
                is_admin: false,
            },
            token: "abc".to_string(),
        };
        let json = serde_json::to_value(&session).unwrap();
        assert_eq!(json["token"], "abc");
        assert_eq!(json["isAdmin"], false);
    }
}
