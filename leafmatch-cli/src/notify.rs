//! Notification transports.

use crate::config::NotifyConfigJson;
use leafmatch::{Notification, Notifier, NotifyError};
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};

/// SMTP status returned when the server rejects the credentials.
const AUTH_FAILED_CODE: &str = "535";

/// Sends notifications as plain-text mail over STARTTLS.
pub struct MailNotifier {
    transport: SmtpTransport,
    sender: Mailbox,
    recipient: Mailbox,
}

impl MailNotifier {
    pub fn from_config(cfg: &NotifyConfigJson) -> Result<Self, NotifyError> {
        let sender = parse_mailbox("sender", &cfg.sender)?;
        let recipient = parse_mailbox("recipient", &cfg.recipient)?;
        let password = std::env::var(&cfg.password_env).map_err(|_| NotifyError::Configuration {
            reason: format!("environment variable {} is not set", cfg.password_env),
        })?;
        let username = cfg.username.clone().unwrap_or_else(|| cfg.sender.clone());

        let transport = SmtpTransport::starttls_relay(&cfg.smtp_host)
            .map_err(|err| NotifyError::Transport {
                reason: err.to_string(),
            })?
            .port(cfg.smtp_port)
            .credentials(Credentials::new(username, password))
            .build();

        Ok(Self {
            transport,
            sender,
            recipient,
        })
    }
}

fn parse_mailbox(role: &str, value: &str) -> Result<Mailbox, NotifyError> {
    value.parse().map_err(|err| NotifyError::Address {
        reason: format!("{role} {value:?}: {err}"),
    })
}

impl Notifier for MailNotifier {
    fn send(&self, notification: &Notification) -> Result<(), NotifyError> {
        let message = Message::builder()
            .from(self.sender.clone())
            .to(self.recipient.clone())
            .subject(notification.subject.clone())
            .header(ContentType::TEXT_PLAIN)
            .body(notification.body.clone())
            .map_err(|err| NotifyError::Configuration {
                reason: err.to_string(),
            })?;

        self.transport.send(&message).map_err(|err| {
            let reason = err.to_string();
            if err
                .status()
                .is_some_and(|code| code.to_string() == AUTH_FAILED_CODE)
            {
                NotifyError::Authentication { reason }
            } else {
                NotifyError::Transport { reason }
            }
        })?;
        tracing::info!(subject = notification.subject.as_str(), "notification sent");
        Ok(())
    }
}

/// Logs notifications instead of delivering them.
pub struct DryRunNotifier;

impl Notifier for DryRunNotifier {
    fn send(&self, notification: &Notification) -> Result<(), NotifyError> {
        tracing::info!(
            subject = notification.subject.as_str(),
            body = notification.body.as_str(),
            "notification not delivered (dry run)"
        );
        println!("Notification (not sent): {}", notification.subject);
        Ok(())
    }
}
