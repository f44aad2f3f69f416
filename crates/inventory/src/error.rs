//! Workflow validation errors.
//!
//! These surface inline next to the form that produced them, so the display
//! text is the user-facing Spanish the portal speaks.

use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum WorkflowError {
    /// No line survived filtering; nothing to submit.
    #[error("Agrega al menos un item con cantidad válida.")]
    NoValidItems,

    /// A return row accounts for more than it has pending.
    #[error("El material {material_id} supera la cantidad pendiente.")]
    ExceedsPending { material_id: i64 },
}
