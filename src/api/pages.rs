//! Minimal HTML page shell shared by every app.

use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};

use crate::api::messages::FlashMessage;
use crate::config::LANGUAGES;

/// Everything needed to render one page.
pub struct Page<'a> {
    pub language: &'a str,
    pub title: &'a str,
    pub body: String,
    /// Current path, used as the language switch target
    pub path: &'a str,
    pub flash: Option<FlashMessage>,
}

impl<'a> Page<'a> {
    pub fn new(language: &'a str, title: &'a str, path: &'a str) -> Self {
        Self {
            language,
            title,
            body: String::new(),
            path,
            flash: None,
        }
    }

    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }

    pub fn flash(mut self, flash: Option<FlashMessage>) -> Self {
        self.flash = flash;
        self
    }

    pub fn render(self) -> Html<String> {
        let flash = self
            .flash
            .map(|m| {
                format!(
                    r#"<div class="alert alert-{}">{}</div>"#,
                    m.level.tag(),
                    escape(m.text())
                )
            })
            .unwrap_or_default();

        Html(format!(
            r#"<!DOCTYPE html>
<html lang="{lang}">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title} | The English Studio</title>
</head>
<body>
<header>{switcher}</header>
<main>
{flash}
<h1>{title}</h1>
{body}
</main>
</body>
</html>
"#,
            lang = escape(self.language),
            title = escape(self.title),
            switcher = language_switcher(self.language, self.path),
            flash = flash,
            body = self.body,
        ))
    }
}

/// Form posting to the unprefixed language switch endpoint.
fn language_switcher(current: &str, path: &str) -> String {
    let options: String = LANGUAGES
        .iter()
        .map(|(code, name)| {
            let selected = if *code == current { " selected" } else { "" };
            format!(r#"<option value="{code}"{selected}>{name}</option>"#)
        })
        .collect();
    format!(
        r#"<form action="/i18n/setlang/" method="post"><input type="hidden" name="next" value="{}"><select name="language">{}</select><button type="submit">Go</button></form>"#,
        escape(path),
        options
    )
}

/// Bare page for error responses, rendered without request context.
pub fn error_page(status: StatusCode, title: &str, message: &str) -> Response {
    let body = format!("<p>{}</p>", escape(message));
    let html = Page::new(crate::config::DEFAULT_LANGUAGE, title, "/")
        .body(body)
        .render();
    (status, html).into_response()
}

/// Escape text for HTML element and attribute content.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape() {
        assert_eq!(escape(r#"<a href="x">&'"#), "&lt;a href=&quot;x&quot;&gt;&amp;&#x27;");
    }

    #[test]
    fn test_render_marks_language_and_switch_target() {
        let Html(html) = Page::new("it", "Blog", "/it/blog/").render();
        assert!(html.contains(r#"<html lang="it">"#));
        assert!(html.contains(r#"name="next" value="/it/blog/""#));
        assert!(html.contains(r#"<option value="it" selected>"#));
    }
}
