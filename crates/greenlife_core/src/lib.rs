pub mod cart;
pub mod catalog;
pub mod domain;
pub mod ports;
pub mod storage;
pub mod storefront;

pub use cart::{CartStore, CartSummary, CART_KEY};
pub use catalog::{Catalog, CatalogQuery, SortOrder};
pub use domain::{
    AuthSession, CartLine, Category, CategoryDraft, NewCategory, NewOrder, NewProduct, Order,
    OrderItem, OrderStatus, Product, ProductDraft, ProductPatch, ProductStats, SessionUser, User,
    UserCredentials,
};
pub use ports::{DatabaseService, Persistence, PortError, PortResult, StorefrontBackend};
pub use storage::MemoryStore;
pub use storefront::{CheckoutError, Storefront, USER_KEY};
