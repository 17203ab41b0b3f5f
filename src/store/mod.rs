//! Persistence boundary for guest records.
//!
//! The store writes each record as a whole. Two messages from the same
//! number processed at the same time race on read-modify-write and the last
//! write wins; nothing here serializes per guest.

use crate::guest::{Guest, NewGuest};
use async_trait::async_trait;
use std::sync::Arc;

mod memory;
pub mod mysql;

pub use memory::MemoryStore;

pub type Result<T> = std::result::Result<T, StoreError>;

/// Store handle shared by the routes.
pub type SharedStore = Arc<dyn GuestStore>;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("The requested guest could not be found")]
    NotFound,
    #[error("Database error: `{0}`")]
    Database(String),
    #[error("The connection pool returned an error: `{0}`")]
    Pool(String),
}

impl From<diesel::result::Error> for StoreError {
    fn from(err: diesel::result::Error) -> Self {
        match err {
            diesel::result::Error::NotFound => StoreError::NotFound,
            err => StoreError::Database(err.to_string()),
        }
    }
}

#[async_trait]
pub trait GuestStore: Send + Sync {
    /// Exact match on the stored phone number; the earliest created guest wins.
    async fn find_by_phone(&self, phone_number: &str) -> Result<Option<Guest>>;

    async fn get(&self, id: &str) -> Result<Option<Guest>>;

    /// Every guest, in creation order.
    async fn all(&self) -> Result<Vec<Guest>>;

    /// Assigns an id and timestamps and stores the new guest.
    async fn insert(&self, new: NewGuest) -> Result<Guest>;

    /// Overwrites every field of an existing guest and bumps `date_modified`.
    async fn save(&self, guest: &Guest) -> Result<()>;

    /// Returns whether a guest was removed.
    async fn delete(&self, id: &str) -> Result<bool>;
}
