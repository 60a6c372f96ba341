//! Notify Module
//!
//! Violation notices sent to users whose content was rejected by moderation.
//! Delivery is best-effort: [`dispatch_violation_notice`] runs the send on a
//! detached task and only logs the outcome, so a slow or failing mail relay
//! never affects the request that triggered it.
//!
//! - **`smtp`** - `SmtpNotifier`, lettre-based SMTP delivery (or no-op)
//! - **`template`** - subject and bodies of the notice

use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;
use tokio::task::JoinHandle;

/// SMTP delivery
pub mod smtp;

/// Notice templates
pub mod template;

pub use smtp::SmtpNotifier;

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("Invalid email address: {0}")]
    Address(#[from] lettre::address::AddressError),

    #[error("Failed to build email message: {0}")]
    Message(#[from] lettre::error::Error),

    #[error("Failed to configure SMTP transport: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),
}

#[async_trait]
pub trait Notifier: Send + Sync {
    /// Send the fixed violation notice to `recipient`
    async fn send_violation_notice(&self, recipient: &str) -> Result<(), NotifyError>;
}

/// Send a violation notice on a detached task
///
/// The handle is returned for tests; callers in the request path drop it.
pub fn dispatch_violation_notice(notifier: Arc<dyn Notifier>, recipient: String) -> JoinHandle<()> {
    tokio::spawn(async move {
        match notifier.send_violation_notice(&recipient).await {
            Ok(()) => tracing::info!(%recipient, "Violation notice sent"),
            Err(e) => tracing::error!(%recipient, error = %e, "Failed to send violation notice"),
        }
    })
}
