//! `stockroom-core`: resource records and mutation rules for the dashboard.
//!
//! This crate contains **pure** client-side domain code (no HTTP, no caching,
//! no clocks). Everything here can be called before any network round trip.

pub mod category;
pub mod error;
pub mod id;
pub mod item;
pub mod resource;
pub mod validate;
pub mod warehouse;

pub use category::{Category, CategoryDraft, CategoryPayload};
pub use error::{DomainError, ValidationError};
pub use id::RecordId;
pub use item::{Item, ItemDraft, ItemPayload};
pub use resource::{Resource, ResourceKind};
pub use warehouse::{Warehouse, WarehouseDraft, WarehousePayload};
