//! # REST API for Patient Records
//!
//! Endpoints under `/patient` for creating, retrieving, updating and
//! deleting patient records. Handlers only translate between HTTP and
//! [`PatientService`]; status codes come from [`PatientError`].

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use shared::PatientRecord;
use tracing::{error, info};

use crate::domain::{PatientError, PatientService};

/// Application state shared by every handler
#[derive(Clone)]
pub struct AppState {
    pub patient_service: PatientService,
}

impl AppState {
    pub fn new(patient_service: PatientService) -> Self {
        Self { patient_service }
    }
}

impl IntoResponse for PatientError {
    fn into_response(self) -> Response {
        let status = match &self {
            PatientError::Validation(_) => StatusCode::BAD_REQUEST,
            PatientError::NotFound(_) => StatusCode::NOT_FOUND,
            PatientError::Storage(e) => {
                error!("Storage failure: {:#}", e);
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        (status, self.to_string()).into_response()
    }
}

/// Routes for the patient API, relative to the `/patient` prefix
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_patients).post(create_patient).put(update_patient))
        .route("/:patient_id", get(get_patient).delete(delete_patient))
}

fn json_body(payload: Result<Json<PatientRecord>, JsonRejection>) -> Result<PatientRecord, PatientError> {
    payload
        .map(|Json(record)| record)
        .map_err(|rejection| PatientError::Validation(rejection.body_text()))
}

/// GET /patient
pub async fn list_patients(State(state): State<AppState>) -> Result<Json<Vec<PatientRecord>>, PatientError> {
    info!("GET /patient");

    let records = state.patient_service.list_patients().await?;
    Ok(Json(records))
}

/// GET /patient/:patient_id
pub async fn get_patient(
    State(state): State<AppState>,
    Path(patient_id): Path<i64>,
) -> Result<Json<PatientRecord>, PatientError> {
    info!("GET /patient/{}", patient_id);

    let record = state.patient_service.get_patient(patient_id).await?;
    Ok(Json(record))
}

/// POST /patient
pub async fn create_patient(
    State(state): State<AppState>,
    payload: Result<Json<PatientRecord>, JsonRejection>,
) -> Result<Json<PatientRecord>, PatientError> {
    let record = json_body(payload)?;
    info!("POST /patient - request: {:?}", record);

    let created = state.patient_service.create_patient(record).await?;
    Ok(Json(created))
}

/// PUT /patient
pub async fn update_patient(
    State(state): State<AppState>,
    payload: Result<Json<PatientRecord>, JsonRejection>,
) -> Result<Json<PatientRecord>, PatientError> {
    let record = json_body(payload)?;
    info!("PUT /patient - request: {:?}", record);

    let updated = state.patient_service.update_patient(record).await?;
    Ok(Json(updated))
}

/// DELETE /patient/:patient_id
pub async fn delete_patient(
    State(state): State<AppState>,
    Path(patient_id): Path<i64>,
) -> Result<StatusCode, PatientError> {
    info!("DELETE /patient/{}", patient_id);

    state.patient_service.delete_patient(patient_id).await?;
    Ok(StatusCode::OK)
}
