//! Contact form.

use axum::{
    extract::State,
    http::Uri,
    response::{IntoResponse, Response},
    routing::get,
};
use axum_extra::extract::cookie::SignedCookieJar;
use serde::Deserialize;
use validator::Validate;

use crate::api::extractors::{CurrentLanguage, ValidatedForm};
use crate::api::locale::found;
use crate::api::messages::{self, FlashMessage, Level, Notice};
use crate::api::pages::{escape, Page};
use crate::api::table::AppRoute;
use crate::api::AppState;
use crate::infra::OutgoingEmail;

pub fn routes() -> Vec<AppRoute> {
    vec![AppRoute::new("contact", "", get(show).post(submit))]
}

/// Contact form submission
#[derive(Debug, Deserialize, Validate)]
pub struct ContactForm {
    #[validate(length(min = 1, max = 100, message = "Please enter your name"))]
    pub name: String,
    #[validate(email(message = "Please enter a valid email address"))]
    pub email: String,
    #[serde(default)]
    #[validate(length(max = 30, message = "Phone number is too long"))]
    pub phone: String,
    #[validate(length(min = 1, max = 5000, message = "Please enter a message"))]
    pub message: String,
}

impl ContactForm {
    fn into_email(self, from: &str, to: &str) -> OutgoingEmail {
        let phone = if self.phone.trim().is_empty() {
            "-"
        } else {
            self.phone.trim()
        };
        let body = format!(
            "Name: {}\nEmail: {}\nPhone: {}\n\n{}",
            self.name.trim(),
            self.email,
            phone,
            self.message
        );
        OutgoingEmail::new(from, to, format!("New enquiry from {}", self.name.trim()), body)
            .with_reply_to(self.email)
    }
}

pub async fn show(
    State(state): State<AppState>,
    CurrentLanguage(language): CurrentLanguage,
    jar: SignedCookieJar,
    uri: Uri,
) -> Response {
    let (jar, flash) = messages::take(jar);
    let maps_key = &state.settings.integrations.google_maps_api_key;

    let body = format!(
        r#"<form method="post" action="{action}">
<label>Name <input name="name" required maxlength="100"></label>
<label>Email <input name="email" type="email" required></label>
<label>Phone <input name="phone" maxlength="30"></label>
<label>Message <textarea name="message" required maxlength="5000"></textarea></label>
<button type="submit">Send</button>
</form>
<div id="map" data-api-key="{maps_key}"></div>"#,
        action = escape(uri.path()),
        maps_key = escape(maps_key),
    );

    let page = Page::new(&language, "Contact us", uri.path())
        .flash(flash)
        .body(body)
        .render();
    (jar, page).into_response()
}

/// Mail the enquiry to the school, then redirect back with a notice.
pub async fn submit(
    State(state): State<AppState>,
    CurrentLanguage(language): CurrentLanguage,
    jar: SignedCookieJar,
    ValidatedForm(form): ValidatedForm<ContactForm>,
) -> Response {
    let email_settings = &state.settings.email;
    let email = form.into_email(&email_settings.default_from, &email_settings.contact_to);

    let notice = match state.mailer.send(email).await {
        Ok(()) => FlashMessage::new(Level::Success, Notice::ContactSent),
        Err(e) => {
            tracing::error!(error = %e, "Contact email failed");
            FlashMessage::new(Level::Error, Notice::ContactFailed)
        }
    };

    let jar = messages::push(jar, notice, state.settings.security.secure_cookies);
    let target = state
        .routes
        .reverse("contact", &language)
        .unwrap_or_else(|| "/".to_string());
    (jar, found(&target)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Env, Settings};
    use axum::extract::FromRef;
    use axum::http::HeaderMap;
    use axum_extra::extract::cookie::Key;
    use crate::errors::AppError;
    use crate::infra::mailer::MockMailer;
    use std::path::Path;
    use std::sync::Arc;

    fn form() -> ContactForm {
        ContactForm {
            name: " Maria ".to_string(),
            email: "maria@example.com".to_string(),
            phone: String::new(),
            message: "Do you run evening classes?".to_string(),
        }
    }

    fn state(mailer: MockMailer) -> AppState {
        let env = Env::from_pairs([("DEBUG", "true"), ("CONTACT_TO_EMAIL", "office@example.com")]);
        let settings = Settings::from_source(&env, Path::new(".")).unwrap();
        AppState::new(settings, Arc::new(mailer), None)
    }

    fn flash_cookie(response: &Response) -> bool {
        response
            .headers()
            .get_all(axum::http::header::SET_COOKIE)
            .iter()
            .any(|v| v.to_str().unwrap_or_default().starts_with("flash="))
    }

    #[test]
    fn test_into_email_sets_reply_to() {
        let email = form().into_email("school@example.com", "office@example.com");
        assert_eq!(email.to, vec!["office@example.com"]);
        assert_eq!(email.reply_to.as_deref(), Some("maria@example.com"));
        assert_eq!(email.subject, "New enquiry from Maria");
        assert!(email.body.contains("Phone: -"));
    }

    #[test]
    fn test_validation() {
        assert!(form().validate().is_ok());
        let mut bad = form();
        bad.email = "maria".to_string();
        assert!(bad.validate().is_err());
    }

    #[tokio::test]
    async fn test_submit_sends_and_redirects() {
        let mut mailer = MockMailer::new();
        mailer
            .expect_send()
            .withf(|email| email.to == vec!["office@example.com".to_string()])
            .times(1)
            .returning(|_| Ok(()));

        let state = state(mailer);
        let jar = SignedCookieJar::from_headers(&HeaderMap::new(), Key::from_ref(&state));
        let response = submit(
            State(state),
            CurrentLanguage("it".to_string()),
            jar,
            ValidatedForm(form()),
        )
        .await;

        assert_eq!(response.status(), axum::http::StatusCode::FOUND);
        assert_eq!(response.headers()["location"], "/it/contact/");
        assert!(flash_cookie(&response));
    }

    #[tokio::test]
    async fn test_submit_survives_mail_failure() {
        let mut mailer = MockMailer::new();
        mailer
            .expect_send()
            .returning(|_| Err(AppError::mail("connection refused")));

        let state = state(mailer);
        let jar = SignedCookieJar::from_headers(&HeaderMap::new(), Key::from_ref(&state));
        let response = submit(
            State(state),
            CurrentLanguage("en".to_string()),
            jar,
            ValidatedForm(form()),
        )
        .await;

        assert_eq!(response.status(), axum::http::StatusCode::FOUND);
        assert!(flash_cookie(&response));
    }
}
