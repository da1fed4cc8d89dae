//! Infrastructure layer - External systems integration
//!
//! - Database connection (engine chosen at startup)
//! - Mail transports (console, memory, SMTP)

pub mod db;
pub mod mailer;

pub use db::Database;
pub use mailer::{build_mailer, ConsoleMailer, Mailer, MemoryMailer, OutgoingEmail, SmtpMailer};
