//! HTTP client for the platino backend.
//!
//! This crate is the only place the portal talks HTTP. It wraps every call
//! with a 15-second timeout, attaches the bearer token from the shared
//! [`session::SessionStore`], normalizes failures into [`ApiError`], and
//! applies the one cross-cutting auth rule: an authenticated call answered
//! with 401 clears the session.
//!
//! On top of the call path it exposes the typed endpoint surface (auth and
//! recovery, materials, checkouts, sales, movements, admin, CSV exports)
//! and implements [`chat_engine::ChatTransport`] so the polling engine can
//! run against the real backend.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use api_client::{ApiClient, ApiConfig};
//! use session::SessionStore;
//! use storage::Storage;
//!
//! # async fn example() -> Result<(), api_client::ApiError> {
//! let session = Arc::new(SessionStore::new(Storage::in_memory()));
//! let client = ApiClient::new(ApiConfig::from_env(), session.clone())?;
//!
//! client.login("ana", "hunter2").await?;
//! assert!(session.snapshot().is_authenticated());
//!
//! let page = client.materiales_list(&Default::default()).await?;
//! println!("{} materiales", page.materiales.len());
//! # Ok(())
//! # }
//! ```

pub mod admin;
pub mod auth;
pub mod chat;
pub mod client;
pub mod config;
pub mod error;
pub mod export;
pub mod materials;
pub mod movimientos;
pub mod types;
pub mod usos;
pub mod ventas;

pub use admin::{AdminListFilter, AdminUser, AdminUsersPage, AuditPage};
pub use auth::{ForgotStep, LoginResponse, SecurityUpdate, UserProfile};
pub use client::ApiClient;
pub use config::ApiConfig;
pub use error::ApiError;
pub use materials::{MaterialsPage, Suggestions};
pub use movimientos::{Movimiento, MovimientosPage};
pub use types::PageInfo;
pub use usos::{UsoSummary, UsosPage};
pub use ventas::{Venta, VentasPage, VentasSummary};
