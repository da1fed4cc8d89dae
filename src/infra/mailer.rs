//! Outgoing email transports.
//!
//! The backend is picked once from [`EmailConfig`]. SMTP goes through lettre;
//! the console and memory transports never leave the process.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use lettre::{
    message::{header::ContentType, Mailbox},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};

use crate::config::{EmailBackend, EmailConfig, TransportSecurity};
use crate::errors::{AppError, AppResult};

#[cfg(test)]
use mockall::automock;

/// A plain-text message ready to send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingEmail {
    pub from: String,
    pub to: Vec<String>,
    pub reply_to: Option<String>,
    pub subject: String,
    pub body: String,
}

impl OutgoingEmail {
    pub fn new(
        from: impl Into<String>,
        to: impl Into<String>,
        subject: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            from: from.into(),
            to: vec![to.into()],
            reply_to: None,
            subject: subject.into(),
            body: body.into(),
        }
    }

    pub fn with_reply_to(mut self, reply_to: impl Into<String>) -> Self {
        self.reply_to = Some(reply_to.into());
        self
    }
}

/// Mail transport abstraction.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, email: OutgoingEmail) -> AppResult<()>;

    fn backend(&self) -> EmailBackend;
}

/// Build the transport selected by the configuration.
pub fn build_mailer(config: &EmailConfig) -> AppResult<Arc<dyn Mailer>> {
    let mailer: Arc<dyn Mailer> = match config.backend {
        EmailBackend::Console => Arc::new(ConsoleMailer),
        EmailBackend::Memory => Arc::new(MemoryMailer::default()),
        EmailBackend::Smtp => Arc::new(SmtpMailer::new(config)?),
    };
    tracing::debug!(backend = ?config.backend, "Mail transport ready");
    Ok(mailer)
}

/// Writes messages to the log instead of sending them.
pub struct ConsoleMailer;

#[async_trait]
impl Mailer for ConsoleMailer {
    async fn send(&self, email: OutgoingEmail) -> AppResult<()> {
        tracing::info!(
            "=== EMAIL (not sent) ===\n\
             From: {}\n\
             To: {}\n\
             Reply-To: {}\n\
             Subject: {}\n\
             Body:\n{}\n\
             ========================",
            email.from,
            email.to.join(", "),
            email.reply_to.as_deref().unwrap_or("-"),
            email.subject,
            email.body
        );
        Ok(())
    }

    fn backend(&self) -> EmailBackend {
        EmailBackend::Console
    }
}

/// Keeps messages in memory.
#[derive(Default)]
pub struct MemoryMailer {
    outbox: Mutex<Vec<OutgoingEmail>>,
}

impl MemoryMailer {
    pub fn outbox(&self) -> Vec<OutgoingEmail> {
        self.outbox
            .lock()
            .map(|outbox| outbox.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl Mailer for MemoryMailer {
    async fn send(&self, email: OutgoingEmail) -> AppResult<()> {
        self.outbox
            .lock()
            .map_err(|_| AppError::mail("outbox lock poisoned"))?
            .push(email);
        Ok(())
    }

    fn backend(&self) -> EmailBackend {
        EmailBackend::Memory
    }
}

/// SMTP relay over STARTTLS, implicit TLS or plain text.
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpMailer {
    pub fn new(config: &EmailConfig) -> AppResult<Self> {
        let builder = match config.security {
            TransportSecurity::StartTls => {
                AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
                    .map_err(|e| AppError::mail(e.to_string()))?
            }
            TransportSecurity::ImplicitTls => {
                AsyncSmtpTransport::<Tokio1Executor>::relay(&config.host)
                    .map_err(|e| AppError::mail(e.to_string()))?
            }
            TransportSecurity::Plain => {
                AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.host)
            }
        };

        let mut builder = builder.port(config.port).timeout(Some(config.timeout));
        if config.has_credentials() {
            builder = builder.credentials(Credentials::new(
                config.username.clone(),
                config.password().to_string(),
            ));
        }

        Ok(Self {
            transport: builder.build(),
        })
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, email: OutgoingEmail) -> AppResult<()> {
        let message = build_message(&email)?;
        self.transport
            .send(message)
            .await
            .map_err(|e| AppError::mail(e.to_string()))?;
        tracing::info!(to = %email.to.join(", "), subject = %email.subject, "Email sent");
        Ok(())
    }

    fn backend(&self) -> EmailBackend {
        EmailBackend::Smtp
    }
}

fn parse_mailbox(address: &str) -> AppResult<Mailbox> {
    address
        .parse()
        .map_err(|e| AppError::mail(format!("invalid address {:?}: {}", address, e)))
}

fn build_message(email: &OutgoingEmail) -> AppResult<Message> {
    let mut builder = Message::builder()
        .from(parse_mailbox(&email.from)?)
        .subject(email.subject.clone())
        .header(ContentType::TEXT_PLAIN);
    for to in &email.to {
        builder = builder.to(parse_mailbox(to)?);
    }
    if let Some(reply_to) = &email.reply_to {
        builder = builder.reply_to(parse_mailbox(reply_to)?);
    }

    builder
        .body(email.body.clone())
        .map_err(|e| AppError::mail(e.to_string()))
}
