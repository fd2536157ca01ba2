use actix_web::{HttpResponse, Responder, web};
use serde_json::json;
use tracing::{debug, instrument};
use uuid::Uuid;

use crate::{
    engine::{Outcome, RecordEngine},
    error::AppError,
    models::{
        ActionRequest, DateRequest, EmailQuery, FeedbackResponse, MessageResponse, NewEmployee,
        PerformanceRequest, RegisteredResponse,
    },
};

impl From<Outcome> for HttpResponse {
    fn from(outcome: Outcome) -> Self {
        let body = MessageResponse {
            message: outcome.message().to_string(),
        };
        match outcome {
            Outcome::Created(_) => HttpResponse::Created().json(body),
            Outcome::Done(_) => HttpResponse::Ok().json(body),
        }
    }
}

/// Record ids are v4 UUIDs, anything else cannot name a record.
fn record_id(path: web::Path<String>) -> Result<String, AppError> {
    let id = path.into_inner();
    Uuid::parse_str(&id)
        .map(|_| id)
        .map_err(|_| AppError::BadRequest("Invalid user id"))
}

/// Lookup by email, or list every user
#[utoipa::path(
    get,
    path = "/users",
    params(EmailQuery),
    responses(
        (status = 200, description = "A single user when `email` is given, otherwise all users", body = Object),
        (status = 404, description = "User not found", body = MessageResponse, example = json!({
            "message": "User not found"
        }))
    ),
    tag = "Users"
)]
pub async fn get_users(
    engine: web::Data<RecordEngine>,
    query: web::Query<EmailQuery>,
) -> Result<HttpResponse, AppError> {
    // A blank email means no filter.
    let email = query.into_inner().email.filter(|e| !e.trim().is_empty());
    match email {
        Some(email) => {
            let record = engine.find_by_email(&email).await?;
            Ok(HttpResponse::Ok().json(record))
        }
        None => {
            let records = engine.list().await?;
            debug!(count = records.len(), "Listing users");
            Ok(HttpResponse::Ok().json(records))
        }
    }
}

/// Register a user
#[utoipa::path(
    post,
    path = "/users",
    request_body(content = Object, description = "Profile fields, `email` is required", example = json!({
        "email": "karim@example.com",
        "name": "Karim",
        "role": "employee",
        "designation": "Engineer"
    })),
    responses(
        (status = 201, description = "User created", body = RegisteredResponse),
        (status = 400, description = "Email is required", body = MessageResponse),
        (status = 409, description = "User already exists", body = MessageResponse)
    ),
    tag = "Users"
)]
#[instrument(name = "users_register", skip(engine, payload))]
pub async fn register(
    engine: web::Data<RecordEngine>,
    payload: web::Json<NewEmployee>,
) -> Result<HttpResponse, AppError> {
    let registered = engine.register(payload.into_inner()).await?;

    Ok(HttpResponse::Created().json(RegisteredResponse {
        message: "User created".to_string(),
        inserted_id: registered.inserted_id,
        employee_id: registered.employee_id,
    }))
}

/// Apply an attendance or role action
#[utoipa::path(
    patch,
    path = "/users/{id}",
    params(
        ("id", Path, description = "User record id")
    ),
    request_body = ActionRequest,
    responses(
        (status = 200, description = "Updated", body = MessageResponse, example = json!({
            "message": "Payroll updated successfully."
        })),
        (status = 201, description = "New attendance entry created", body = MessageResponse, example = json!({
            "message": "Clock-in recorded."
        })),
        (status = 400, description = "Invalid action or missing field", body = MessageResponse),
        (status = 404, description = "User not found", body = MessageResponse),
        (status = 409, description = "Already clocked in today", body = MessageResponse)
    ),
    tag = "Users"
)]
pub async fn apply_action(
    engine: web::Data<RecordEngine>,
    path: web::Path<String>,
    body: web::Json<ActionRequest>,
) -> Result<HttpResponse, AppError> {
    let id = record_id(path)?;
    let outcome = engine.apply_action(&id, body.into_inner()).await?;
    Ok(outcome.into())
}

/// Add or update a performance score
#[utoipa::path(
    patch,
    path = "/users/{id}/performance",
    params(
        ("id", Path, description = "User record id")
    ),
    request_body = PerformanceRequest,
    responses(
        (status = 200, description = "Performance updated", body = MessageResponse),
        (status = 201, description = "Performance added", body = MessageResponse),
        (status = 400, description = "Date and numeric score required", body = MessageResponse),
        (status = 404, description = "User not found", body = MessageResponse)
    ),
    tag = "Users"
)]
pub async fn set_performance(
    engine: web::Data<RecordEngine>,
    path: web::Path<String>,
    body: web::Json<PerformanceRequest>,
) -> Result<HttpResponse, AppError> {
    let id = record_id(path)?;
    let outcome = engine.set_performance(&id, body.into_inner()).await?;
    Ok(outcome.into())
}

/// Reset the communication rating of a day
#[utoipa::path(
    patch,
    path = "/users/{id}/communication/reset",
    params(
        ("id", Path, description = "User record id")
    ),
    request_body = DateRequest,
    responses(
        (status = 200, description = "Communication reset", body = MessageResponse),
        (status = 404, description = "User not found", body = MessageResponse)
    ),
    tag = "Users"
)]
pub async fn reset_communication(
    engine: web::Data<RecordEngine>,
    path: web::Path<String>,
    body: web::Json<DateRequest>,
) -> Result<HttpResponse, AppError> {
    let id = record_id(path)?;
    Ok(engine.reset_communication(&id, body.into_inner()).await?.into())
}

/// Clear the payroll label of a day
#[utoipa::path(
    patch,
    path = "/users/{id}/payroll/reset",
    params(
        ("id", Path, description = "User record id")
    ),
    request_body = DateRequest,
    responses(
        (status = 200, description = "Payroll reset", body = MessageResponse),
        (status = 404, description = "User not found", body = MessageResponse)
    ),
    tag = "Users"
)]
pub async fn reset_payroll(
    engine: web::Data<RecordEngine>,
    path: web::Path<String>,
    body: web::Json<DateRequest>,
) -> Result<HttpResponse, AppError> {
    let id = record_id(path)?;
    Ok(engine.reset_payroll(&id, body.into_inner()).await?.into())
}

/// Remove the performance score of a day
#[utoipa::path(
    patch,
    path = "/users/{id}/performance/reset",
    params(
        ("id", Path, description = "User record id")
    ),
    request_body = DateRequest,
    responses(
        (status = 200, description = "Performance reset", body = MessageResponse),
        (status = 404, description = "User not found", body = MessageResponse)
    ),
    tag = "Users"
)]
pub async fn reset_performance(
    engine: web::Data<RecordEngine>,
    path: web::Path<String>,
    body: web::Json<DateRequest>,
) -> Result<HttpResponse, AppError> {
    let id = record_id(path)?;
    Ok(engine.reset_performance(&id, body.into_inner()).await?.into())
}

/// Delete the attendance and performance entries of a day
#[utoipa::path(
    patch,
    path = "/users/{id}/attendance/delete",
    params(
        ("id", Path, description = "User record id")
    ),
    request_body = DateRequest,
    responses(
        (status = 200, description = "Attendance & performance deleted", body = MessageResponse),
        (status = 404, description = "User not found", body = MessageResponse)
    ),
    tag = "Users"
)]
pub async fn delete_attendance(
    engine: web::Data<RecordEngine>,
    path: web::Path<String>,
    body: web::Json<DateRequest>,
) -> Result<HttpResponse, AppError> {
    let id = record_id(path)?;
    Ok(engine.delete_attendance(&id, body.into_inner()).await?.into())
}

/// Daily feedback view of a user's attendance
#[utoipa::path(
    get,
    path = "/feedback",
    params(EmailQuery),
    responses(
        (status = 200, description = "Per-day feedback with display defaults", body = FeedbackResponse),
        (status = 400, description = "Email required", body = MessageResponse),
        (status = 404, description = "User not found", body = MessageResponse)
    ),
    tag = "Feedback"
)]
pub async fn feedback(
    engine: web::Data<RecordEngine>,
    query: web::Query<EmailQuery>,
) -> Result<HttpResponse, AppError> {
    let daily_feedback = engine.feedback(query.into_inner().email).await?;
    Ok(HttpResponse::Ok().json(FeedbackResponse { daily_feedback }))
}

pub async fn index() -> impl Responder {
    HttpResponse::Ok().json(json!({ "message": "EMS backend is running" }))
}
