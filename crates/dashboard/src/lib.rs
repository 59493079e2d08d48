//! `stockroom-dashboard`
//!
//! **Responsibility:** client-side resource management for the inventory
//! dashboard.
//!
//! This crate provides:
//! - An explicitly passed auth session (bearer credential holder)
//! - An HTTP gateway that attaches the credential to every call
//! - A per-kind collection cache, revalidated after every mutation
//! - A row edit controller and the per-kind view that drives it
//!
//! The API remains the authority: nothing is patched locally.

pub mod app;
pub mod auth;
pub mod cache;
pub mod config;
pub mod editor;
pub mod gateway;
pub mod session;
pub mod view;

pub use app::{Dashboard, Summary};
pub use auth::{AuthClient, AuthError};
pub use cache::{CacheSnapshot, ResourceCache};
pub use config::DashboardConfig;
pub use editor::{EditError, RowEditor, RowState};
pub use gateway::{Gateway, GatewayError};
pub use session::{Credential, Session, SessionError};
pub use view::{ActionError, Confirm, DeleteOutcome, ListStatus, ResourceView, Row, ViewModel};
