//! Client-side inventory workflow logic.
//!
//! Everything here is pure: payload assembly, validation and preview math
//! for the usage (checkout), return-reconciliation and sale flows, plus the
//! list-filter and CSV-export query builders. Nothing in this crate touches
//! the network; the API client runs these builders before submitting and
//! refuses to send anything they reject.

pub mod error;
pub mod export;
pub mod filter;
pub mod material;
pub mod sale;
pub mod usage;

pub use error::WorkflowError;
pub use export::ExportScope;
pub use filter::{FilterLogic, MaterialFilter, MovimientosFilter, SortOrder, UsosFilter, VentasFilter};
pub use material::{Material, MaterialDraft};
pub use sale::{SaleDraft, SaleLine, SalePayload, SaleTotals};
pub use usage::{
    Bucket, ReturnPayload, ReturnRow, UsageDraft, UsagePayload, Uso, UsoEstado, UsoItem,
};
