//! Engine errors.

use thiserror::Error;

use crate::transport::TransportError;

/// Errors surfaced to the chat panel. The non-transport variants carry the
/// inline text the portal shows next to the window.
#[derive(Debug, Error)]
pub enum ChatError {
    /// A non-admin tried to open the admins channel.
    #[error("Canal disponible solo para administradores.")]
    AdminOnly,

    /// A send is already in flight; duplicate submission refused.
    #[error("Hay un envío en curso.")]
    Busy,

    /// An admin support operation was attempted with no mailbox selected.
    #[error("Selecciona un buzón primero.")]
    NoTicketSelected,

    /// The backend call failed.
    #[error(transparent)]
    Transport(#[from] TransportError),
}
