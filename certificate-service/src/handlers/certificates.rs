use crate::dtos::{
    CertificateResponse, ListCertificatesParams, LoadCertificateParams, SaveCertificateRequest,
};
use crate::error::AppError;
use crate::models::Certificate;
use crate::startup::AppState;
use axum::{
    extract::{rejection::JsonRejection, Query, State},
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use mongodb::bson::{doc, oid::ObjectId, to_bson};

pub async fn list_certificates(
    State(state): State<AppState>,
    Query(params): Query<ListCertificatesParams>,
) -> Result<impl IntoResponse, AppError> {
    let mut filter = doc! {};
    if let Some(name) = params.name.filter(|name| !name.is_empty()) {
        // Case-insensitive substring match on the indexed name field
        filter.insert("name", doc! { "$regex": name, "$options": "i" });
    }

    let certificates = state.db.list_certificates(filter).await?;
    let response: Vec<CertificateResponse> = certificates
        .into_iter()
        .map(CertificateResponse::from)
        .collect();

    Ok(Json(response))
}

pub async fn default_certificate() -> impl IntoResponse {
    Json(CertificateResponse::from(Certificate::default_template()))
}

pub async fn save_certificate(
    State(state): State<AppState>,
    payload: Result<Json<SaveCertificateRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(request) = payload
        .map_err(|e| AppError::BadRequest(anyhow::anyhow!("Invalid request body: {}", e)))?;

    if request.name.is_empty() {
        return Err(AppError::BadRequest(anyhow::anyhow!(
            "Certificate name is required"
        )));
    }

    // An absent or empty id means create; anything else must be a valid hex id.
    let existing_id = request
        .id
        .as_deref()
        .filter(|id| !id.is_empty())
        .map(|id| {
            ObjectId::parse_str(id)
                .map_err(|e| AppError::BadRequest(anyhow::anyhow!("Invalid ID format: {}", e)))
        })
        .transpose()?;

    let saved = match existing_id {
        None => {
            let mut certificate =
                Certificate::new(request.name, request.bg_image, request.elements);
            let id = state.db.insert_certificate(&certificate).await?;
            certificate.id = Some(id);
            tracing::info!(certificate_id = %id, "Certificate created");
            certificate
        }
        Some(id) => {
            let elements = to_bson(&request.elements).map_err(|e| {
                AppError::InternalError(anyhow::anyhow!("Failed to serialize elements: {}", e))
            })?;
            // createdAt is deliberately not part of the update set
            let update = doc! {
                "$set": {
                    "name": request.name.as_str(),
                    "bgImage": request.bg_image.as_str(),
                    "elements": elements,
                    "updatedAt": mongodb::bson::DateTime::from_chrono(Utc::now()),
                }
            };

            let updated = state
                .db
                .update_certificate(id, update)
                .await?
                .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Certificate not found")))?;
            tracing::info!(certificate_id = %id, "Certificate updated");
            updated
        }
    };

    Ok(Json(CertificateResponse::from(saved)))
}

pub async fn load_certificate(
    State(state): State<AppState>,
    Query(params): Query<LoadCertificateParams>,
) -> Result<impl IntoResponse, AppError> {
    let id = params
        .id
        .filter(|id| !id.is_empty())
        .ok_or_else(|| AppError::BadRequest(anyhow::anyhow!("ID parameter is required")))?;

    // Reject malformed ids before touching the store
    let object_id = ObjectId::parse_str(&id)
        .map_err(|e| AppError::BadRequest(anyhow::anyhow!("Invalid ID format: {}", e)))?;

    let certificate = state
        .db
        .find_certificate(object_id)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Certificate not found")))?;

    Ok(Json(CertificateResponse::from(certificate)))
}
