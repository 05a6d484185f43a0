//! Newsletter and contact form handlers.
//!
//! Bad input is a 400 and makes no outbound request. Once submitted, the
//! endpoint's verdict comes back as a status rather than an HTTP error, so
//! the client can show a retry prompt.

use axum::{
    Json,
    extract::{Path, State},
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::error::Result;
use crate::services::forms::{ContactForm, FormKind, FormStatus};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct NewsletterRequest {
    pub email: String,
}

#[derive(Debug, Serialize)]
pub struct FormStatusView {
    pub form: FormKind,
    pub status: FormStatus,
}

/// Subscribe an address to the newsletter.
#[instrument(skip(state, body))]
pub async fn newsletter(
    State(state): State<AppState>,
    Json(body): Json<NewsletterRequest>,
) -> Result<Json<FormStatusView>> {
    let status = state.forms().subscribe_newsletter(&body.email).await?;
    Ok(Json(FormStatusView {
        form: FormKind::Newsletter,
        status,
    }))
}

/// Send a contact message.
#[instrument(skip(state, form))]
pub async fn contact(
    State(state): State<AppState>,
    Json(form): Json<ContactForm>,
) -> Result<Json<FormStatusView>> {
    let status = state.forms().send_contact(form).await?;
    Ok(Json(FormStatusView {
        form: FormKind::Contact,
        status,
    }))
}

/// Last submission status for a form.
#[instrument(skip(state))]
pub async fn status(
    State(state): State<AppState>,
    Path(kind): Path<String>,
) -> Result<Json<FormStatusView>> {
    let form: FormKind = kind.parse()?;
    Ok(Json(FormStatusView {
        form,
        status: state.forms().status(form).await,
    }))
}
