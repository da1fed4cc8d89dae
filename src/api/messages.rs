//! One-shot flash messages carried in a signed cookie.

use axum_extra::extract::cookie::{Cookie, SameSite, SignedCookieJar};

use crate::config::FLASH_COOKIE;

/// Message severity, mapped to the CSS tag the templates use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Debug,
    Info,
    Success,
    Warning,
    Error,
}

impl Level {
    pub fn tag(self) -> &'static str {
        match self {
            Level::Debug => "secondary",
            Level::Info => "info",
            Level::Success => "success",
            Level::Warning => "warning",
            Level::Error => "danger",
        }
    }

    fn code(self) -> &'static str {
        match self {
            Level::Debug => "debug",
            Level::Info => "info",
            Level::Success => "success",
            Level::Warning => "warning",
            Level::Error => "error",
        }
    }

    fn from_code(code: &str) -> Option<Self> {
        match code {
            "debug" => Some(Level::Debug),
            "info" => Some(Level::Info),
            "success" => Some(Level::Success),
            "warning" => Some(Level::Warning),
            "error" => Some(Level::Error),
            _ => None,
        }
    }
}

/// Known notices. Only their codes travel in the cookie.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    ContactSent,
    ContactFailed,
    LoggedOut,
}

impl Notice {
    fn code(self) -> &'static str {
        match self {
            Notice::ContactSent => "contact_sent",
            Notice::ContactFailed => "contact_failed",
            Notice::LoggedOut => "logged_out",
        }
    }

    fn from_code(code: &str) -> Option<Self> {
        match code {
            "contact_sent" => Some(Notice::ContactSent),
            "contact_failed" => Some(Notice::ContactFailed),
            "logged_out" => Some(Notice::LoggedOut),
            _ => None,
        }
    }

    pub fn text(self) -> &'static str {
        match self {
            Notice::ContactSent => "Thank you! Your message has been sent.",
            Notice::ContactFailed => "Sorry, your message could not be sent. Please try again later.",
            Notice::LoggedOut => "You have been signed out.",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlashMessage {
    pub level: Level,
    pub notice: Notice,
}

impl FlashMessage {
    pub fn new(level: Level, notice: Notice) -> Self {
        Self { level, notice }
    }

    pub fn text(&self) -> &'static str {
        self.notice.text()
    }

    fn encode(&self) -> String {
        format!("{}.{}", self.level.code(), self.notice.code())
    }

    fn decode(value: &str) -> Option<Self> {
        let (level, notice) = value.split_once('.')?;
        Some(Self {
            level: Level::from_code(level)?,
            notice: Notice::from_code(notice)?,
        })
    }
}

/// Queue a message for the next page view.
pub fn push(jar: SignedCookieJar, message: FlashMessage, secure: bool) -> SignedCookieJar {
    let cookie = Cookie::build((FLASH_COOKIE, message.encode()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .build();
    jar.add(cookie)
}

/// Read and clear the pending message.
pub fn take(jar: SignedCookieJar) -> (SignedCookieJar, Option<FlashMessage>) {
    let message = jar
        .get(FLASH_COOKIE)
        .and_then(|cookie| FlashMessage::decode(cookie.value()));
    if message.is_none() {
        return (jar, None);
    }
    (jar.remove(Cookie::build(FLASH_COOKIE).path("/")), message)
}
