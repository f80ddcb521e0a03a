//! crates/greenlife_client/src/http.rs
//!
//! `StorefrontBackend` over the REST API.

use async_trait::async_trait;
use greenlife_core::domain::{NewOrder, Order, Product, SessionUser, User};
use greenlife_core::ports::{PortResult, StorefrontBackend};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::config::ClientConfig;
use crate::error::ClientError;

//=========================================================================================
// Wire Envelopes
//=========================================================================================

#[derive(Serialize)]
struct Credentials<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct Registration<'a> {
    name: &'a str,
    email: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
struct LoginEnvelope {
    user: User,
    token: String,
}

#[derive(Deserialize)]
struct UserEnvelope {
    user: User,
}

#[derive(Deserialize)]
struct ProductsEnvelope {
    products: Vec<Product>,
}

#[derive(Deserialize)]
struct OrderEnvelope {
    order: Order,
}

#[derive(Deserialize)]
struct OrdersEnvelope {
    orders: Vec<Order>,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: String,
}

//=========================================================================================
// Client
//=========================================================================================

/// Talks to the storefront API with a shared `reqwest::Client`.
#[derive(Clone)]
pub struct HttpBackend {
    client: reqwest::Client,
    base_url: String,
}

impl HttpBackend {
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(config: &ClientConfig) -> Result<Self, ClientError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        let response = self.client.get(self.url(path)).send().await?;
        Self::handle_response(response).await
    }

    async fn post<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ClientError> {
        let response = self.client.post(self.url(path)).json(body).send().await?;
        Self::handle_response(response).await
    }

    async fn handle_response<T: DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, ClientError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response.json().await?);
        }

        // Error bodies are `{ "error": ... }`; fall back to the reason phrase.
        let text = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorEnvelope>(&text)
            .map(|e| e.error)
            .unwrap_or_else(|_| status.canonical_reason().unwrap_or("Request failed").to_string());
        debug!("API answered {}: {}", status, message);
        Err(ClientError::Status {
            status: status.as_u16(),
            message,
        })
    }
}

#[async_trait]
impl StorefrontBackend for HttpBackend {
    async fn login(&self, email: &str, password: &str) -> PortResult<SessionUser> {
        let envelope: LoginEnvelope = self
            .post("/auth/login", &Credentials { email, password })
            .await?;
        Ok(SessionUser {
            user: envelope.user,
            token: envelope.token,
        })
    }

    async fn register(&self, name: &str, email: &str, password: &str) -> PortResult<User> {
        let envelope: UserEnvelope = self
            .post(
                "/auth/register",
                &Registration {
                    name,
                    email,
                    password,
                },
            )
            .await?;
        Ok(envelope.user)
    }

    async fn fetch_products(&self) -> PortResult<Vec<Product>> {
        let envelope: ProductsEnvelope = self.get("/products").await?;
        Ok(envelope.products)
    }

    async fn fetch_orders(&self, user_id: Uuid) -> PortResult<Vec<Order>> {
        let envelope: OrdersEnvelope = self.get(&format!("/orders/user/{}", user_id)).await?;
        Ok(envelope.orders)
    }

    async fn create_order(&self, order: &NewOrder) -> PortResult<Order> {
        let envelope: OrderEnvelope = self.post("/orders", order).await?;
        Ok(envelope.order)
    }
}
