//! Autoplaza - vehicle marketplace backend
//!
//! # Modules
//!
//! - [`store`] - Document store abstraction and in-memory engine
//! - [`models`] - Vehicle, user, publication and favorite records
//! - [`search`] - Query parameters to store filter
//! - [`guard`] - Referential checks across collections
//! - [`repository`] - Per-collection CRUD with marketplace rules
//! - [`auth`] - Password hashing, bearer tokens, login
//! - [`images`] - Uploaded listing pictures on disk
//! - [`gateway`] - HTTP routing, handlers and OpenAPI

pub mod auth;
pub mod config;
pub mod error;
pub mod gateway;
pub mod guard;
pub mod images;
pub mod logging;
pub mod models;
pub mod repository;
pub mod search;
pub mod store;

pub use error::{MarketError, MarketResult};
pub use repository::Marketplace;
pub use store::{DocumentStore, MemoryStore};
