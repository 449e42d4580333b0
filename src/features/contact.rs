//! Contact form: validate, then hand off to the mail client.
//!
//! Submission never reaches a server. A valid form becomes a `mailto:` URL
//! and the browser navigates to it; the success status only means the
//! hand-off was attempted.

#[cfg(test)]
#[path = "contact_test.rs"]
mod contact_test;

use std::sync::LazyLock;

use regex::Regex;

use crate::config::{ContactConfig, SiteConfig};
use crate::dom::{DomEvent, DomNode, EventKind, Page, Subscription};
use crate::error::WireError;

static EMAIL_PATTERN: LazyLock<Result<Regex, regex::Error>> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$"));

/// `local@domain.tld`, no whitespace and a single `@`.
#[must_use]
pub fn is_valid_email(candidate: &str) -> bool {
    match &*EMAIL_PATTERN {
        Ok(pattern) => pattern.is_match(candidate),
        Err(err) => {
            log::warn!("contact: email pattern unavailable: {err}");
            false
        }
    }
}

/// Trimmed field values read at submit time.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ContactSubmission {
    pub name: String,
    pub email: String,
    pub message: String,
}

impl ContactSubmission {
    pub fn new(name: &str, email: &str, message: &str) -> Self {
        Self { name: name.trim().to_owned(), email: email.trim().to_owned(), message: message.trim().to_owned() }
    }

    pub fn validate(&self) -> FieldReport {
        FieldReport {
            name: !self.name.is_empty(),
            email: is_valid_email(&self.email),
            message: !self.message.is_empty(),
        }
    }

    /// Build the compose URL for `recipient`.
    pub fn mailto_url(&self, recipient: &str) -> String {
        let subject = format!("Portfolio contact from {}", self.name);
        let body = format!("{}\n\nReply to: {}", self.message, self.email);
        format!("mailto:{recipient}?subject={}&body={}", urlencoding::encode(&subject), urlencoding::encode(&body))
    }
}

/// Per-field validity.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FieldReport {
    pub name: bool,
    pub email: bool,
    pub message: bool,
}

impl FieldReport {
    pub fn is_valid(self) -> bool {
        self.name && self.email && self.message
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SubmitOutcome {
    Rejected(FieldReport),
    HandedOff { url: String },
}

/// The form controls and status line.
pub struct ContactForm<N: DomNode> {
    name: N,
    email: N,
    message: N,
    status: Option<N>,
    config: ContactConfig,
}

impl<N: DomNode> ContactForm<N> {
    pub fn new(name: N, email: N, message: N, status: Option<N>, config: &ContactConfig) -> Self {
        Self { name, email, message, status, config: config.clone() }
    }

    pub fn snapshot(&self) -> ContactSubmission {
        ContactSubmission::new(&self.name.value(), &self.email.value(), &self.message.value())
    }

    /// Validate and, when valid, navigate via `navigate`.
    pub fn submit(&self, navigate: impl FnOnce(&str) -> Result<(), WireError>) -> Result<SubmitOutcome, WireError> {
        let submission = self.snapshot();
        let report = submission.validate();
        let error_class = &self.config.field_error_class;
        self.name.set_class(error_class, !report.name)?;
        self.email.set_class(error_class, !report.email)?;
        self.message.set_class(error_class, !report.message)?;

        if !report.is_valid() {
            self.show_status(&self.config.error_message, false)?;
            return Ok(SubmitOutcome::Rejected(report));
        }

        let url = submission.mailto_url(&self.config.recipient);
        navigate(&url)?;
        self.show_status(&self.config.success_message, true)?;
        for field in [&self.name, &self.email, &self.message] {
            field.set_value("");
        }
        Ok(SubmitOutcome::HandedOff { url })
    }

    fn show_status(&self, text: &str, success: bool) -> Result<(), WireError> {
        let Some(status) = &self.status else {
            return Ok(());
        };
        status.set_text(text);
        status.set_class(&self.config.status_success_class, success)?;
        status.set_class(&self.config.status_error_class, !success)
    }
}

pub fn mount<P: Page>(page: &P, config: &SiteConfig) -> Result<Option<Subscription>, WireError> {
    let contact = &config.contact;
    let fields = (
        page.element_by_id(&contact.form_id),
        page.element_by_id(&contact.name_field_id),
        page.element_by_id(&contact.email_field_id),
        page.element_by_id(&contact.message_field_id),
    );
    let (Some(form_node), Some(name), Some(email), Some(message)) = fields else {
        log::debug!("contact: form or fields missing");
        return Ok(None);
    };
    let form = ContactForm::new(name, email, message, page.element_by_id(&contact.status_id), contact);
    let nav_page = page.clone();
    let sub = form_node.listen(
        EventKind::Submit,
        Box::new(move |event: &DomEvent| {
            event.prevent_default();
            match form.submit(|url| nav_page.navigate(url)) {
                Ok(SubmitOutcome::Rejected(report)) => log::debug!("contact: rejected {report:?}"),
                Ok(SubmitOutcome::HandedOff { .. }) => log::info!("contact: handed off to mail client"),
                Err(err) => log::warn!("contact: submit failed: {err}"),
            }
        }),
    )?;
    log::debug!("contact: form wired");
    Ok(Some(sub))
}
