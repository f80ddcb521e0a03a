//! The storefront's side of the wire: an HTTP implementation of
//! `StorefrontBackend` and a file-backed `Persistence`, ready to plug into
//! `greenlife_core::Storefront`.

pub mod config;
pub mod error;
pub mod file_store;
pub mod http;

pub use config::ClientConfig;
pub use error::ClientError;
pub use file_store::FileStore;
pub use http::HttpBackend;
