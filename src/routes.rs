use std::{path::Path, sync::Arc};

use axum::{
    Json,
    extract::{Multipart, State},
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{
    auth::{self, AdminIdentity},
    database::{Registration, Stats, Status},
    error::AppError,
    events::{CATALOG, EventInfo},
    state::AppState,
    ticket,
    validate::{self, SubmissionFields},
};

#[derive(Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Serialize)]
pub struct LoginResponse {
    pub token: String,
}

pub async fn login_handler(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let stored = state.db.admin_password_hash(&payload.username)?;

    // An unknown username still pays for a verification, and both failure
    // modes collapse into the same response.
    let ok = match &stored {
        Some(hash) => auth::verify_password(&payload.password, hash),
        None => {
            let _ = auth::verify_password(&payload.password, &state.decoy_hash);
            false
        }
    };

    if !ok {
        return Err(AppError::InvalidCredentials);
    }

    let token = auth::issue_token(&payload.username, &state.config.jwt_secret)?;

    Ok(Json(LoginResponse { token }))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterResponse {
    pub success: bool,
    pub registration_id: String,
    pub qr_code_data: String,
}

pub async fn register_handler(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<RegisterResponse>, AppError> {
    let mut fields = SubmissionFields::default();
    let mut screenshot: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|_| AppError::MalformedPayload)?
    {
        let name = field.name().unwrap_or_default().to_string();

        if name == "screenshot" {
            let file_name = field.file_name().map(str::to_string);
            let data = field
                .bytes()
                .await
                .map_err(|_| AppError::MalformedPayload)?;

            if let Some(file_name) = file_name {
                if !data.is_empty() {
                    screenshot = Some((file_name, data.to_vec()));
                }
            }
            continue;
        }

        let value = field
            .text()
            .await
            .map_err(|_| AppError::MalformedPayload)?;

        match name.as_str() {
            "fullName" => fields.full_name = value,
            "collegeName" => fields.college_name = value,
            "department" => fields.department = value,
            "year" => fields.year = value,
            "email" => fields.email = value,
            "phone" => fields.phone = value,
            "selectedEvents" => fields.selected_events = value,
            "transactionId" => fields.transaction_id = value,
            _ => {}
        }
    }

    validate::validate(&fields)?;

    // The file must be durable before a row points at it.
    let screenshot_path = match &screenshot {
        Some((original_name, data)) => {
            store_screenshot(&state.config.uploads_dir, original_name, data).await?
        }
        None => String::new(),
    };

    let registration = Registration {
        id: ticket::new_registration_id(),
        full_name: fields.full_name,
        college_name: fields.college_name,
        department: fields.department,
        year: fields.year,
        email: fields.email,
        phone: fields.phone,
        selected_events: fields.selected_events,
        transaction_id: fields.transaction_id,
        screenshot_path,
        status: Status::Pending,
        timestamp: Utc::now(),
    };

    state.db.insert_registration(&registration)?;

    let qr_code_data = ticket::qr_data_uri(&registration.id)?;

    if let Some(mailer) = &state.mailer {
        mailer.send_confirmation(&registration, &qr_code_data);
        mailer.send_admin_alert(&registration);
    }

    info!("Registered {}", registration.id);

    Ok(Json(RegisterResponse {
        success: true,
        registration_id: registration.id,
        qr_code_data,
    }))
}

async fn store_screenshot(
    uploads_dir: &str,
    original_name: &str,
    data: &[u8],
) -> Result<String, AppError> {
    let file_name = format!(
        "{}-{}",
        Utc::now().timestamp_millis(),
        sanitize_file_name(original_name)
    );

    tokio::fs::write(Path::new(uploads_dir).join(&file_name), data).await?;

    Ok(format!("/uploads/{file_name}"))
}

/// Keeps the stored name flat; anything path-like becomes an underscore.
fn sanitize_file_name(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect()
}

pub async fn registrations_handler(
    State(state): State<Arc<AppState>>,
    _admin: AdminIdentity,
) -> Result<Json<Vec<Registration>>, AppError> {
    Ok(Json(state.db.list_registrations()?))
}

#[derive(Deserialize)]
pub struct UpdateStatusRequest {
    pub id: String,
    pub status: String,
}

#[derive(Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

pub async fn update_status_handler(
    State(state): State<Arc<AppState>>,
    _admin: AdminIdentity,
    Json(payload): Json<UpdateStatusRequest>,
) -> Result<Json<SuccessResponse>, AppError> {
    let status: Status = payload.status.parse()?;

    if state.db.update_status(&payload.id, status)? == 0 {
        return Err(AppError::NotFound);
    }

    Ok(Json(SuccessResponse { success: true }))
}

pub async fn stats_handler(
    State(state): State<Arc<AppState>>,
    _admin: AdminIdentity,
) -> Result<Json<Stats>, AppError> {
    Ok(Json(state.db.stats()?))
}

#[derive(Deserialize)]
pub struct ContactRequest {
    pub name: String,
    pub email: String,
    pub message: String,
}

/// Always reports success; delivery is best effort and skipped entirely
/// when no mailer is configured.
pub async fn contact_handler(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<ContactRequest>,
) -> Json<SuccessResponse> {
    if let Some(mailer) = &state.mailer {
        mailer.send_contact_message(&payload.name, &payload.email, &payload.message);
    }

    Json(SuccessResponse { success: true })
}

pub async fn events_handler() -> Json<&'static [EventInfo]> {
    Json(CATALOG)
}
