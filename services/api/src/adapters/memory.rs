//! services/api/src/adapters/memory.rs
//!
//! An in-process implementation of the `DatabaseService` port. The API falls
//! back to it when no `DATABASE_URL` is configured, and the handler tests run
//! against it.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use greenlife_core::domain::{
    AuthSession, Category, NewCategory, NewOrder, NewProduct, Order, OrderStatus, Product,
    ProductPatch, User, UserCredentials,
};
use greenlife_core::ports::{DatabaseService, PortError, PortResult};
use parking_lot::RwLock;
use std::collections::HashMap;
use uuid::Uuid;

#[derive(Default)]
struct Tables {
    users: Vec<UserCredentials>,
    sessions: HashMap<String, AuthSession>,
    products: Vec<Product>,
    categories: Vec<Category>,
    orders: Vec<Order>,
}

/// A `DatabaseService` backed by plain collections behind a lock.
#[derive(Default)]
pub struct MemoryDatabase {
    tables: RwLock<Tables>,
}

impl MemoryDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flips the admin flag on an account, the way an operator would by hand.
    pub fn set_admin(&self, user_id: Uuid, is_admin: bool) -> PortResult<()> {
        let mut tables = self.tables.write();
        let creds = tables
            .users
            .iter_mut()
            .find(|c| c.user.id == user_id)
            .ok_or_else(|| PortError::NotFound("User not found".to_string()))?;
        creds.user.is_admin = is_admin;
        Ok(())
    }
}

#[async_trait]
impl DatabaseService for MemoryDatabase {
    async fn create_user(
        &self,
        name: &str,
        email: &str,
        hashed_password: &str,
    ) -> PortResult<User> {
        let mut tables = self.tables.write();
        if tables.users.iter().any(|c| c.user.email == email) {
            return Err(PortError::Conflict("User already exists".to_string()));
        }
        let user = User {
            id: Uuid::new_v4(),
            name: name.to_string(),
            email: email.to_string(),
            is_admin: false,
        };
        tables.users.push(UserCredentials {
            user: user.clone(),
            hashed_password: hashed_password.to_string(),
        });
        Ok(user)
    }

    async fn get_user_by_email(&self, email: &str) -> PortResult<UserCredentials> {
        self.tables
            .read()
            .users
            .iter()
            .find(|c| c.user.email == email)
            .cloned()
            .ok_or_else(|| PortError::NotFound("User not found".to_string()))
    }

    async fn get_user_by_id(&self, user_id: Uuid) -> PortResult<User> {
        self.tables
            .read()
            .users
            .iter()
            .find(|c| c.user.id == user_id)
            .map(|c| c.user.clone())
            .ok_or_else(|| PortError::NotFound("User not found".to_string()))
    }

    async fn create_auth_session(
        &self,
        token: &str,
        user_id: Uuid,
        expires_at: DateTime<Utc>,
    ) -> PortResult<()> {
        let now = Utc::now();
        let mut tables = self.tables.write();
        tables.sessions.retain(|_, s| s.expires_at > now);
        tables.sessions.insert(
            token.to_string(),
            AuthSession {
                token: token.to_string(),
                user_id,
                expires_at,
            },
        );
        Ok(())
    }

    async fn validate_auth_session(&self, token: &str) -> PortResult<Uuid> {
        let tables = self.tables.read();
        match tables.sessions.get(token) {
            Some(session) if session.expires_at > Utc::now() => Ok(session.user_id),
            _ => Err(PortError::Unauthorized),
        }
    }

    async fn delete_auth_session(&self, token: &str) -> PortResult<()> {
        self.tables.write().sessions.remove(token);
        Ok(())
    }

    async fn list_products(&self) -> PortResult<Vec<Product>> {
        let mut products = self.tables.read().products.clone();
        products.reverse();
        Ok(products)
    }

    async fn get_product(&self, product_id: Uuid) -> PortResult<Product> {
        self.tables
            .read()
            .products
            .iter()
            .find(|p| p.id == product_id)
            .cloned()
            .ok_or_else(|| PortError::NotFound("Product not found".to_string()))
    }

    async fn create_product(&self, product: NewProduct) -> PortResult<Product> {
        let now = Utc::now();
        let product = Product {
            id: Uuid::new_v4(),
            name: product.name,
            price: product.price,
            description: product.description,
            category: product.category,
            image: product.image,
            stock: product.stock,
            is_new: product.is_new,
            is_best_seller: product.is_best_seller,
            created_at: now,
            updated_at: now,
        };
        self.tables.write().products.push(product.clone());
        Ok(product)
    }

    async fn update_product(&self, product_id: Uuid, patch: ProductPatch) -> PortResult<Product> {
        let mut tables = self.tables.write();
        let product = tables
            .products
            .iter_mut()
            .find(|p| p.id == product_id)
            .ok_or_else(|| PortError::NotFound("Product not found".to_string()))?;
        // Patch a copy so a rejected patch leaves the stored product alone.
        let mut updated = product.clone();
        patch
            .apply(&mut updated, Utc::now())
            .map_err(PortError::Validation)?;
        *product = updated.clone();
        Ok(updated)
    }

    async fn delete_product(&self, product_id: Uuid) -> PortResult<()> {
        let mut tables = self.tables.write();
        let before = tables.products.len();
        tables.products.retain(|p| p.id != product_id);
        if tables.products.len() == before {
            return Err(PortError::NotFound("Product not found".to_string()));
        }
        Ok(())
    }

    async fn list_categories(&self) -> PortResult<Vec<Category>> {
        let mut categories = self.tables.read().categories.clone();
        categories.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(categories)
    }

    async fn create_category(&self, category: NewCategory) -> PortResult<Category> {
        let mut tables = self.tables.write();
        if tables.categories.iter().any(|c| c.name == category.name) {
            return Err(PortError::Conflict("Category already exists".to_string()));
        }
        let now = Utc::now();
        let category = Category {
            id: Uuid::new_v4(),
            name: category.name,
            image: category.image.unwrap_or_default(),
            created_at: now,
            updated_at: now,
        };
        tables.categories.push(category.clone());
        Ok(category)
    }

    async fn update_category(
        &self,
        category_id: Uuid,
        category: NewCategory,
    ) -> PortResult<Category> {
        let mut tables = self.tables.write();
        if !tables.categories.iter().any(|c| c.id == category_id) {
            return Err(PortError::NotFound("Category not found".to_string()));
        }
        if tables
            .categories
            .iter()
            .any(|c| c.name == category.name && c.id != category_id)
        {
            return Err(PortError::Conflict(
                "Category with this name already exists".to_string(),
            ));
        }
        let existing = tables
            .categories
            .iter_mut()
            .find(|c| c.id == category_id)
            .ok_or_else(|| PortError::NotFound("Category not found".to_string()))?;
        existing.name = category.name;
        if let Some(image) = category.image {
            existing.image = image;
        }
        existing.updated_at = Utc::now();
        Ok(existing.clone())
    }

    async fn delete_category(&self, category_id: Uuid) -> PortResult<()> {
        let mut tables = self.tables.write();
        let before = tables.categories.len();
        tables.categories.retain(|c| c.id != category_id);
        if tables.categories.len() == before {
            return Err(PortError::NotFound("Category not found".to_string()));
        }
        Ok(())
    }

    async fn create_order(&self, order: NewOrder) -> PortResult<Order> {
        let order = Order {
            id: Uuid::new_v4(),
            user_id: order.user_id,
            items: order.items,
            total: order.total,
            status: OrderStatus::Pending,
            created_at: Utc::now(),
        };
        self.tables.write().orders.push(order.clone());
        Ok(order)
    }

    async fn list_orders_by_user(&self, user_id: Uuid) -> PortResult<Vec<Order>> {
        Ok(self
            .tables
            .read()
            .orders
            .iter()
            .rev()
            .filter(|o| o.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn list_orders(&self) -> PortResult<Vec<Order>> {
        Ok(self.tables.read().orders.iter().rev().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use rust_decimal::Decimal;

    fn draft(name: &str) -> NewProduct {
        NewProduct {
            name: name.to_string(),
            price: Decimal::new(299, 2),
            description: String::new(),
            category: "Vegetables".to_string(),
            image: String::new(),
            stock: 3,
            is_new: false,
            is_best_seller: false,
        }
    }

    #[tokio::test]
    async fn duplicate_email_is_a_conflict() {
        let db = MemoryDatabase::new();
        db.create_user("Ada", "ada@example.com", "hash").await.unwrap();
        let err = db
            .create_user("Ada again", "ada@example.com", "hash")
            .await
            .unwrap_err();
        assert_eq!(err, PortError::Conflict("User already exists".to_string()));
    }

    #[tokio::test]
    async fn expired_sessions_are_rejected() {
        let db = MemoryDatabase::new();
        let user = db.create_user("Ada", "ada@example.com", "hash").await.unwrap();
        db.create_auth_session("old", user.id, Utc::now() - Duration::minutes(1))
            .await
            .unwrap();
        db.create_auth_session("new", user.id, Utc::now() + Duration::days(1))
            .await
            .unwrap();

        assert_eq!(
            db.validate_auth_session("old").await.unwrap_err(),
            PortError::Unauthorized
        );
        assert_eq!(db.validate_auth_session("new").await.unwrap(), user.id);
    }

    #[tokio::test]
    async fn new_sessions_sweep_out_expired_ones() {
        let db = MemoryDatabase::new();
        let user = db.create_user("Ada", "ada@example.com", "hash").await.unwrap();
        for token in ["a", "b", "c"] {
            db.create_auth_session(token, user.id, Utc::now() - Duration::minutes(1))
                .await
                .unwrap();
        }
        db.create_auth_session("live", user.id, Utc::now() + Duration::days(1))
            .await
            .unwrap();

        let tables = db.tables.read();
        assert_eq!(tables.sessions.len(), 1);
        assert!(tables.sessions.contains_key("live"));
    }

    #[tokio::test]
    async fn rejected_patch_leaves_product_untouched() {
        let db = MemoryDatabase::new();
        let product = db.create_product(draft("Kale")).await.unwrap();
        let patch = ProductPatch {
            name: Some("Curly Kale".to_string()),
            price: Some(Decimal::new(-1, 0)),
            ..Default::default()
        };

        assert!(matches!(
            db.update_product(product.id, patch).await,
            Err(PortError::Validation(_))
        ));
        assert_eq!(db.get_product(product.id).await.unwrap().name, "Kale");
    }

    #[tokio::test]
    async fn renaming_onto_another_category_conflicts() {
        let db = MemoryDatabase::new();
        let fruits = db
            .create_category(NewCategory {
                name: "Fruits".to_string(),
                image: None,
            })
            .await
            .unwrap();
        db.create_category(NewCategory {
            name: "Dairy".to_string(),
            image: None,
        })
        .await
        .unwrap();

        let err = db
            .update_category(
                fruits.id,
                NewCategory {
                    name: "Dairy".to_string(),
                    image: None,
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, PortError::Conflict(_)));

        let renamed = db
            .update_category(
                fruits.id,
                NewCategory {
                    name: "Fruits".to_string(),
                    image: Some("fruit.png".to_string()),
                },
            )
            .await
            .unwrap();
        assert_eq!(renamed.image, "fruit.png");
    }
}
