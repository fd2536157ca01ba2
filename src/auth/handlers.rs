use crate::{
    auth::{auth::AuthUser, jwt::TokenSigner},
    engine::RecordEngine,
    error::AppError,
    models::{AdminStatus, TokenResponse},
};
use actix_web::{HttpResponse, web};
use serde_json::{Map, Value};
use tracing::{error, info, instrument};

/// Issue a bearer token for the presented identity
#[utoipa::path(
    post,
    path = "/jwt",
    request_body(content = Object, description = "Identity claims to sign", example = json!({
        "email": "karim@example.com"
    })),
    responses(
        (status = 200, description = "Signed token, valid for 7 days", body = TokenResponse),
        (status = 400, description = "Body is not a JSON object")
    ),
    tag = "Auth"
)]
#[instrument(name = "auth_issue_token", skip(signer, payload))]
pub async fn issue_token(
    signer: web::Data<TokenSigner>,
    payload: web::Json<Map<String, Value>>,
) -> Result<HttpResponse, AppError> {
    let token = signer.issue(payload.into_inner()).map_err(|e| {
        error!(error = %e, "Failed to sign token");
        AppError::Internal
    })?;

    info!("Token issued");
    Ok(HttpResponse::Ok().json(TokenResponse { token }))
}

/// Check whether the caller is an admin
#[utoipa::path(
    get,
    path = "/users/admin/{email}",
    params(
        ("email", Path, description = "Email to check, must match the token identity")
    ),
    responses(
        (status = 200, description = "Role read from the stored record", body = AdminStatus, example = json!({
            "isAdmin": true
        })),
        (status = 401, description = "Missing token"),
        (status = 403, description = "Invalid token or identity mismatch", body = AdminStatus, example = json!({
            "isAdmin": false
        }))
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Auth"
)]
pub async fn admin_status(
    auth: AuthUser,
    engine: web::Data<RecordEngine>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let email = path.into_inner();

    if !auth.is_same_identity(&email) {
        info!(requested = %email, "Admin check for another identity refused");
        return Ok(HttpResponse::Forbidden().json(AdminStatus { is_admin: false }));
    }

    let is_admin = engine.is_admin(&email).await?;
    Ok(HttpResponse::Ok().json(AdminStatus { is_admin }))
}
