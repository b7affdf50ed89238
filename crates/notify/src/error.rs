//! Failure taxonomy at the email delivery boundary.
//!
//! The delivery service answers a failed send with an optional HTTP status and
//! an optional diagnostic text ([`DeliveryFailure`]). [`DeliveryFailure::classify`]
//! folds that into a [`NotificationError`] with a fixed priority:
//!
//! | Signal | Error |
//! |--------|-------|
//! | status 400 | [`InvalidConfiguration`](NotificationError::InvalidConfiguration) |
//! | status 402 | [`QuotaExceeded`](NotificationError::QuotaExceeded) |
//! | status 403 | [`AccessDenied`](NotificationError::AccessDenied) |
//! | status 404 | [`NotFound`](NotificationError::NotFound) |
//! | non-empty text | [`Transport`](NotificationError::Transport) |
//! | nothing usable | [`Network`](NotificationError::Network) |
//!
//! A known status code always wins over the text. The `Display` output is the
//! message shown to the end user, never the raw service answer.

use serde::Serialize;
use thiserror::Error;

/// Classified reason a notification could not be delivered.
#[derive(Debug, Error, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum NotificationError {
    /// Bad service id, template id or key.
    #[error("Configuration EmailJS invalide. Vérifiez vos clés.")]
    InvalidConfiguration,
    /// Monthly sending quota used up.
    #[error("Limite d'emails atteinte. Vérifiez votre plan EmailJS.")]
    QuotaExceeded,
    #[error("Accès refusé. Vérifiez votre Public Key.")]
    AccessDenied,
    /// Missing service or template.
    #[error("Service ou template introuvable.")]
    NotFound,
    /// The service replied with a textual diagnostic.
    #[error("Erreur: {0}")]
    Transport(String),
    #[error("Erreur réseau. Vérifiez votre connexion.")]
    Network,
}

/// Raw failure reported by a [`DeliveryService`](crate::DeliveryService).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeliveryFailure {
    pub status: Option<u16>,
    pub text: Option<String>,
}

impl DeliveryFailure {
    pub fn new(status: Option<u16>, text: Option<String>) -> Self {
        Self { status, text }
    }

    /// Transport-level failure with no status and no diagnostic.
    pub fn network() -> Self {
        Self::default()
    }

    /// Failure built from an HTTP answer; a blank body carries no text.
    pub fn from_response(status: u16, body: &str) -> Self {
        let body = body.trim();
        Self {
            status: Some(status),
            text: (!body.is_empty()).then(|| body.to_string()),
        }
    }

    pub fn classify(&self) -> NotificationError {
        match self.status {
            Some(400) => NotificationError::InvalidConfiguration,
            Some(402) => NotificationError::QuotaExceeded,
            Some(403) => NotificationError::AccessDenied,
            Some(404) => NotificationError::NotFound,
            _ => match self.text.as_deref().map(str::trim) {
                Some(text) if !text.is_empty() => NotificationError::Transport(text.to_string()),
                _ => NotificationError::Network,
            },
        }
    }
}

impl From<&DeliveryFailure> for NotificationError {
    fn from(failure: &DeliveryFailure) -> Self {
        failure.classify()
    }
}
