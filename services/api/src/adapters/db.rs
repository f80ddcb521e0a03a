//! services/api/src/adapters/db.rs
//!
//! This module contains the database adapter, which is the concrete implementation
//! of the `DatabaseService` port from the `core` crate. It handles all interactions
//! with the PostgreSQL database using `sqlx`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use greenlife_core::domain::{
    Category, NewCategory, NewOrder, NewProduct, Order, OrderItem, OrderStatus, Product,
    ProductPatch, User, UserCredentials,
};
use greenlife_core::ports::{DatabaseService, PortError, PortResult};
use rust_decimal::Decimal;
use sqlx::{types::Json, FromRow, PgPool};
use tracing::warn;
use uuid::Uuid;

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// A database adapter that implements the `DatabaseService` port.
#[derive(Clone)]
pub struct DbAdapter {
    pool: PgPool,
}

impl DbAdapter {
    /// Creates a new `DbAdapter`.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// A helper function to run database migrations at startup.
    pub async fn run_migrations(&self) -> Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }
}

fn unexpected(e: sqlx::Error) -> PortError {
    PortError::Unexpected(e.to_string())
}

fn is_unique_violation(e: &sqlx::Error) -> bool {
    matches!(e, sqlx::Error::Database(db) if db.is_unique_violation())
}

fn not_found_or_unexpected(what: &str) -> impl Fn(sqlx::Error) -> PortError + '_ {
    move |e| match e {
        sqlx::Error::RowNotFound => PortError::NotFound(format!("{} not found", what)),
        _ => unexpected(e),
    }
}

//=========================================================================================
// "Impure" Database Record Structs
//=========================================================================================

#[derive(FromRow)]
struct UserRecord {
    id: Uuid,
    name: String,
    email: String,
    is_admin: bool,
}
impl UserRecord {
    fn to_domain(self) -> User {
        User {
            id: self.id,
            name: self.name,
            email: self.email,
            is_admin: self.is_admin,
        }
    }
}

#[derive(FromRow)]
struct CredentialsRecord {
    id: Uuid,
    name: String,
    email: String,
    is_admin: bool,
    hashed_password: String,
}
impl CredentialsRecord {
    fn to_domain(self) -> UserCredentials {
        UserCredentials {
            user: User {
                id: self.id,
                name: self.name,
                email: self.email,
                is_admin: self.is_admin,
            },
            hashed_password: self.hashed_password,
        }
    }
}

#[derive(FromRow)]
struct ProductRecord {
    id: Uuid,
    name: String,
    price: Decimal,
    description: String,
    category: String,
    image: String,
    stock: i64,
    is_new: bool,
    is_best_seller: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}
impl ProductRecord {
    fn to_domain(self) -> Product {
        Product {
            id: self.id,
            name: self.name,
            price: self.price,
            description: self.description,
            category: self.category,
            image: self.image,
            stock: u32::try_from(self.stock).unwrap_or(u32::MAX),
            is_new: self.is_new,
            is_best_seller: self.is_best_seller,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(FromRow)]
struct CategoryRecord {
    id: Uuid,
    name: String,
    image: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}
impl CategoryRecord {
    fn to_domain(self) -> Category {
        Category {
            id: self.id,
            name: self.name,
            image: self.image,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(FromRow)]
struct OrderRecord {
    id: Uuid,
    user_id: Uuid,
    items: Json<Vec<OrderItem>>,
    total: Decimal,
    status: String,
    created_at: DateTime<Utc>,
}
impl OrderRecord {
    fn to_domain(self) -> Order {
        let status = self.status.parse::<OrderStatus>().unwrap_or_else(|e| {
            warn!("Order {} has {}; reporting it as pending", self.id, e);
            OrderStatus::Pending
        });
        Order {
            id: self.id,
            user_id: self.user_id,
            items: self.items.0,
            total: self.total,
            status,
            created_at: self.created_at,
        }
    }
}

const PRODUCT_COLUMNS: &str = "id, name, price, description, category, image, stock, is_new, is_best_seller, created_at, updated_at";
const ORDER_COLUMNS: &str = "id, user_id, items, total, status, created_at";

//=========================================================================================
// `DatabaseService` Trait Implementation
//=========================================================================================

#[async_trait]
impl DatabaseService for DbAdapter {
    async fn create_user(
        &self,
        name: &str,
        email: &str,
        hashed_password: &str,
    ) -> PortResult<User> {
        let record = sqlx::query_as::<_, UserRecord>(
            "INSERT INTO users (id, name, email, hashed_password) VALUES ($1, $2, $3, $4) RETURNING id, name, email, is_admin",
        )
        .bind(Uuid::new_v4())
        .bind(name)
        .bind(email)
        .bind(hashed_password)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                PortError::Conflict("User already exists".to_string())
            } else {
                unexpected(e)
            }
        })?;
        Ok(record.to_domain())
    }

    async fn get_user_by_email(&self, email: &str) -> PortResult<UserCredentials> {
        let record = sqlx::query_as::<_, CredentialsRecord>(
            "SELECT id, name, email, is_admin, hashed_password FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_one(&self.pool)
        .await
        .map_err(not_found_or_unexpected("User"))?;
        Ok(record.to_domain())
    }

    async fn get_user_by_id(&self, user_id: Uuid) -> PortResult<User> {
        let record = sqlx::query_as::<_, UserRecord>(
            "SELECT id, name, email, is_admin FROM users WHERE id = $1",
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
        .map_err(not_found_or_unexpected("User"))?;
        Ok(record.to_domain())
    }

    async fn create_auth_session(
        &self,
        token: &str,
        user_id: Uuid,
        expires_at: DateTime<Utc>,
    ) -> PortResult<()> {
        sqlx::query("DELETE FROM auth_sessions WHERE expires_at <= NOW()")
            .execute(&self.pool)
            .await
            .map_err(unexpected)?;
        sqlx::query("INSERT INTO auth_sessions (token, user_id, expires_at) VALUES ($1, $2, $3)")
            .bind(token)
            .bind(user_id)
            .bind(expires_at)
            .execute(&self.pool)
            .await
            .map_err(unexpected)?;
        Ok(())
    }

    async fn validate_auth_session(&self, token: &str) -> PortResult<Uuid> {
        let user_id: Option<Uuid> = sqlx::query_scalar(
            "SELECT user_id FROM auth_sessions WHERE token = $1 AND expires_at > NOW()",
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await
        .map_err(unexpected)?;
        user_id.ok_or(PortError::Unauthorized)
    }

    async fn delete_auth_session(&self, token: &str) -> PortResult<()> {
        sqlx::query("DELETE FROM auth_sessions WHERE token = $1")
            .bind(token)
            .execute(&self.pool)
            .await
            .map_err(unexpected)?;
        Ok(())
    }

    async fn list_products(&self) -> PortResult<Vec<Product>> {
        let records = sqlx::query_as::<_, ProductRecord>(&format!(
            "SELECT {} FROM products ORDER BY created_at DESC",
            PRODUCT_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(unexpected)?;
        Ok(records.into_iter().map(|r| r.to_domain()).collect())
    }

    async fn get_product(&self, product_id: Uuid) -> PortResult<Product> {
        let record = sqlx::query_as::<_, ProductRecord>(&format!(
            "SELECT {} FROM products WHERE id = $1",
            PRODUCT_COLUMNS
        ))
        .bind(product_id)
        .fetch_one(&self.pool)
        .await
        .map_err(not_found_or_unexpected("Product"))?;
        Ok(record.to_domain())
    }

    async fn create_product(&self, product: NewProduct) -> PortResult<Product> {
        let record = sqlx::query_as::<_, ProductRecord>(&format!(
            "INSERT INTO products (id, name, price, description, category, image, stock, is_new, is_best_seller) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) RETURNING {}",
            PRODUCT_COLUMNS
        ))
        .bind(Uuid::new_v4())
        .bind(&product.name)
        .bind(product.price)
        .bind(&product.description)
        .bind(&product.category)
        .bind(&product.image)
        .bind(i64::from(product.stock))
        .bind(product.is_new)
        .bind(product.is_best_seller)
        .fetch_one(&self.pool)
        .await
        .map_err(unexpected)?;
        Ok(record.to_domain())
    }

    async fn update_product(&self, product_id: Uuid, patch: ProductPatch) -> PortResult<Product> {
        let mut product = self.get_product(product_id).await?;
        patch
            .apply(&mut product, Utc::now())
            .map_err(PortError::Validation)?;

        let record = sqlx::query_as::<_, ProductRecord>(&format!(
            "UPDATE products SET name = $2, price = $3, description = $4, category = $5, image = $6, \
             stock = $7, is_new = $8, is_best_seller = $9, updated_at = $10 WHERE id = $1 RETURNING {}",
            PRODUCT_COLUMNS
        ))
        .bind(product.id)
        .bind(&product.name)
        .bind(product.price)
        .bind(&product.description)
        .bind(&product.category)
        .bind(&product.image)
        .bind(i64::from(product.stock))
        .bind(product.is_new)
        .bind(product.is_best_seller)
        .bind(product.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(not_found_or_unexpected("Product"))?;
        Ok(record.to_domain())
    }

    async fn delete_product(&self, product_id: Uuid) -> PortResult<()> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(product_id)
            .execute(&self.pool)
            .await
            .map_err(unexpected)?;
        if result.rows_affected() == 0 {
            return Err(PortError::NotFound("Product not found".to_string()));
        }
        Ok(())
    }

    async fn list_categories(&self) -> PortResult<Vec<Category>> {
        let records = sqlx::query_as::<_, CategoryRecord>(
            "SELECT id, name, image, created_at, updated_at FROM categories ORDER BY name ASC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(unexpected)?;
        Ok(records.into_iter().map(|r| r.to_domain()).collect())
    }

    async fn create_category(&self, category: NewCategory) -> PortResult<Category> {
        let record = sqlx::query_as::<_, CategoryRecord>(
            "INSERT INTO categories (id, name, image) VALUES ($1, $2, $3) RETURNING id, name, image, created_at, updated_at",
        )
        .bind(Uuid::new_v4())
        .bind(&category.name)
        .bind(category.image.unwrap_or_default())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                PortError::Conflict("Category already exists".to_string())
            } else {
                unexpected(e)
            }
        })?;
        Ok(record.to_domain())
    }

    async fn update_category(
        &self,
        category_id: Uuid,
        category: NewCategory,
    ) -> PortResult<Category> {
        let record = sqlx::query_as::<_, CategoryRecord>(
            "UPDATE categories SET name = $2, image = COALESCE($3, image), updated_at = NOW() \
             WHERE id = $1 RETURNING id, name, image, created_at, updated_at",
        )
        .bind(category_id)
        .bind(&category.name)
        .bind(category.image)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                PortError::Conflict("Category with this name already exists".to_string())
            } else {
                not_found_or_unexpected("Category")(e)
            }
        })?;
        Ok(record.to_domain())
    }

    async fn delete_category(&self, category_id: Uuid) -> PortResult<()> {
        let result = sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(category_id)
            .execute(&self.pool)
            .await
            .map_err(unexpected)?;
        if result.rows_affected() == 0 {
            return Err(PortError::NotFound("Category not found".to_string()));
        }
        Ok(())
    }

    async fn create_order(&self, order: NewOrder) -> PortResult<Order> {
        let record = sqlx::query_as::<_, OrderRecord>(&format!(
            "INSERT INTO orders (id, user_id, items, total, status) VALUES ($1, $2, $3, $4, $5) RETURNING {}",
            ORDER_COLUMNS
        ))
        .bind(Uuid::new_v4())
        .bind(order.user_id)
        .bind(Json(order.items))
        .bind(order.total)
        .bind(OrderStatus::Pending.to_string())
        .fetch_one(&self.pool)
        .await
        .map_err(unexpected)?;
        Ok(record.to_domain())
    }

    async fn list_orders_by_user(&self, user_id: Uuid) -> PortResult<Vec<Order>> {
        let records = sqlx::query_as::<_, OrderRecord>(&format!(
            "SELECT {} FROM orders WHERE user_id = $1 ORDER BY created_at DESC",
            ORDER_COLUMNS
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(unexpected)?;
        Ok(records.into_iter().map(|r| r.to_domain()).collect())
    }

    async fn list_orders(&self) -> PortResult<Vec<Order>> {
        let records = sqlx::query_as::<_, OrderRecord>(&format!(
            "SELECT {} FROM orders ORDER BY created_at DESC",
            ORDER_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(unexpected)?;
        Ok(records.into_iter().map(|r| r.to_domain()).collect())
    }
}
