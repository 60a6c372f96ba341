/**
 * SMTP Notifier
 *
 * Sends violation notices through an async lettre transport. When
 * `SMTP_HOST` is empty the notifier runs in no-op mode and only logs, which
 * is the default for local development.
 */

use async_trait::async_trait;
use lettre::message::{Mailbox, MultiPart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Address, AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use std::sync::Arc;

use crate::backend::notify::template::{violation_html, violation_text, VIOLATION_SUBJECT};
use crate::backend::notify::{Notifier, NotifyError};
use crate::backend::server::config::EmailSettings;

const SENDER_NAME: &str = "SocialHub";

#[derive(Clone)]
pub struct SmtpNotifier {
    transport: Option<Arc<AsyncSmtpTransport<Tokio1Executor>>>,
    from: Mailbox,
    client_url: String,
}

impl SmtpNotifier {
    pub fn new(settings: &EmailSettings, client_url: &str) -> Result<Self, NotifyError> {
        let address: Address = settings.from_address.parse()?;
        let from = Mailbox::new(Some(SENDER_NAME.to_string()), address);

        let transport = if settings.smtp_host.trim().is_empty() {
            tracing::warn!("SMTP host not configured; violation notices will only be logged");
            None
        } else {
            let builder = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&settings.smtp_host)?
                .port(settings.smtp_port)
                .timeout(Some(settings.timeout));

            let builder = match (&settings.username, &settings.password) {
                (Some(username), Some(password)) => {
                    builder.credentials(Credentials::new(username.clone(), password.clone()))
                }
                _ => builder,
            };

            Some(Arc::new(builder.build()))
        };

        Ok(Self {
            transport,
            from,
            client_url: client_url.to_string(),
        })
    }

    pub fn is_enabled(&self) -> bool {
        self.transport.is_some()
    }

    fn build_notice(&self, recipient: &str) -> Result<Message, NotifyError> {
        let to: Mailbox = recipient.parse()?;

        let message = Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(VIOLATION_SUBJECT)
            .multipart(MultiPart::alternative_plain_html(
                violation_text(&self.client_url),
                violation_html(&self.client_url),
            ))?;

        Ok(message)
    }
}

#[async_trait]
impl Notifier for SmtpNotifier {
    async fn send_violation_notice(&self, recipient: &str) -> Result<(), NotifyError> {
        let message = self.build_notice(recipient)?;

        match &self.transport {
            Some(transport) => {
                transport.send(message).await?;
            }
            None => {
                tracing::info!(recipient, "Email in no-op mode; skipping violation notice");
            }
        }

        Ok(())
    }
}
