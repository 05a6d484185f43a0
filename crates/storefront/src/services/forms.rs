//! Newsletter and contact form submission.
//!
//! Both forms post a flat set of fields to one external form endpoint. The
//! outcome never touches catalog, cart or session state; it only moves the
//! form's own status between idle, submitting, success and error.

use std::fmt;
use std::str::FromStr;

use cannabiabuds_core::{Email, EmailError};
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::instrument;
use url::Url;

/// `message` field sent with every newsletter signup.
pub const NEWSLETTER_MESSAGE: &str = "Newsletter Subscription Request";

/// Which form a submission came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormKind {
    Newsletter,
    Contact,
}

impl FormKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Newsletter => "newsletter",
            Self::Contact => "contact",
        }
    }
}

impl fmt::Display for FormKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FormKind {
    type Err = FormError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "newsletter" => Ok(Self::Newsletter),
            "contact" => Ok(Self::Contact),
            other => Err(FormError::UnknownForm(other.to_owned())),
        }
    }
}

/// Where a form's last submission stands.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormStatus {
    #[default]
    Idle,
    Submitting,
    Success,
    Error,
}

/// Input rejected before any request was made.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("unknown form: {0}")]
    UnknownForm(String),
}

/// A validated newsletter signup.
#[derive(Debug, Clone)]
pub struct NewsletterSignup {
    pub email: Email,
}

impl NewsletterSignup {
    /// # Errors
    ///
    /// Returns [`FormError::InvalidEmail`] if `email` is not an address.
    pub fn new(email: &str) -> Result<Self, FormError> {
        Ok(Self {
            email: Email::parse(email)?,
        })
    }

    fn fields(&self) -> Vec<(&'static str, &str)> {
        vec![("email", self.email.as_str()), ("message", NEWSLETTER_MESSAGE)]
    }
}

/// Raw contact form input.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContactForm {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub message: String,
}

/// A validated contact message. Every field is required.
#[derive(Debug, Clone)]
pub struct ContactMessage {
    first_name: String,
    last_name: String,
    email: Email,
    message: String,
}

impl TryFrom<ContactForm> for ContactMessage {
    type Error = FormError;

    fn try_from(form: ContactForm) -> Result<Self, Self::Error> {
        fn required(value: String, field: &'static str) -> Result<String, FormError> {
            let trimmed = value.trim();
            if trimmed.is_empty() {
                Err(FormError::MissingField(field))
            } else {
                Ok(trimmed.to_owned())
            }
        }

        Ok(Self {
            first_name: required(form.first_name, "first_name")?,
            last_name: required(form.last_name, "last_name")?,
            email: Email::parse(&form.email)?,
            message: required(form.message, "message")?,
        })
    }
}

impl ContactMessage {
    fn fields(&self) -> Vec<(&'static str, &str)> {
        vec![
            ("firstName", self.first_name.as_str()),
            ("lastName", self.last_name.as_str()),
            ("email", self.email.as_str()),
            ("message", self.message.as_str()),
        ]
    }
}

/// Posts form fields to the external form endpoint.
#[derive(Debug, Clone)]
pub struct FormClient {
    client: reqwest::Client,
    endpoint: Url,
}

impl FormClient {
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(endpoint: Url) -> Result<Self, reqwest::Error> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(Self { client, endpoint })
    }

    #[must_use]
    pub const fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// POST `fields` form-encoded. Any 2xx is success; everything else,
    /// transport failures included, is an error.
    #[instrument(skip(self, fields), fields(endpoint = %self.endpoint))]
    pub async fn submit(&self, fields: &[(&str, &str)]) -> FormStatus {
        match self
            .client
            .post(self.endpoint.clone())
            .form(fields)
            .send()
            .await
        {
            Ok(response) if response.status().is_success() => FormStatus::Success,
            Ok(response) => {
                tracing::warn!(status = %response.status(), "form endpoint rejected submission");
                FormStatus::Error
            }
            Err(e) => {
                tracing::warn!(error = %e, "form submission failed");
                FormStatus::Error
            }
        }
    }
}

/// Last known status per form.
#[derive(Debug, Default)]
pub struct FormTracker {
    newsletter: RwLock<FormStatus>,
    contact: RwLock<FormStatus>,
}

impl FormTracker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    const fn slot(&self, kind: FormKind) -> &RwLock<FormStatus> {
        match kind {
            FormKind::Newsletter => &self.newsletter,
            FormKind::Contact => &self.contact,
        }
    }

    pub async fn status(&self, kind: FormKind) -> FormStatus {
        *self.slot(kind).read().await
    }

    pub async fn set(&self, kind: FormKind, status: FormStatus) {
        *self.slot(kind).write().await = status;
    }
}

/// Form client plus status tracking, one instance per server.
#[derive(Debug)]
pub struct FormService {
    client: FormClient,
    tracker: FormTracker,
}

impl FormService {
    #[must_use]
    pub fn new(client: FormClient) -> Self {
        Self {
            client,
            tracker: FormTracker::new(),
        }
    }

    #[must_use]
    pub const fn endpoint(&self) -> &Url {
        self.client.endpoint()
    }

    pub async fn status(&self, kind: FormKind) -> FormStatus {
        self.tracker.status(kind).await
    }

    /// Validate and submit a newsletter signup.
    ///
    /// # Errors
    ///
    /// Returns [`FormError`] for bad input; no request is made and the
    /// form status is left as it was.
    pub async fn subscribe_newsletter(&self, email: &str) -> Result<FormStatus, FormError> {
        let signup = NewsletterSignup::new(email)?;
        Ok(self.run(FormKind::Newsletter, &signup.fields()).await)
    }

    /// Validate and submit a contact message.
    ///
    /// # Errors
    ///
    /// Returns [`FormError`] for missing or malformed fields; no request is
    /// made and the form status is left as it was.
    pub async fn send_contact(&self, form: ContactForm) -> Result<FormStatus, FormError> {
        let message = ContactMessage::try_from(form)?;
        Ok(self.run(FormKind::Contact, &message.fields()).await)
    }

    async fn run(&self, kind: FormKind, fields: &[(&str, &str)]) -> FormStatus {
        self.tracker.set(kind, FormStatus::Submitting).await;
        let outcome = self.client.submit(fields).await;
        self.tracker.set(kind, outcome).await;
        tracing::info!(form = %kind, status = ?outcome, "form submitted");
        outcome
    }
}
