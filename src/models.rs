use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use utoipa::{IntoParams, ToSchema};

use crate::model::employee::FeedbackDay;

/// Body of `PATCH /users/{id}`. Which fields matter depends on `action`.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ActionRequest {
    #[schema(example = "clockIn")]
    pub action: Option<String>,
    #[schema(example = "2025-07-01")]
    pub date: Option<String>,
    #[schema(example = "Tuesday")]
    pub week_day: Option<String>,
    #[schema(example = "09:02 AM")]
    pub clock_in: Option<String>,
    pub clock_out: Option<String>,
    pub payroll: Option<String>,
    pub communication_rating: Option<i64>,
    pub role: Option<String>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct PerformanceRequest {
    #[schema(example = "2025-07-01")]
    pub date: Option<String>,
    /// Must be a JSON number, anything else is rejected.
    #[schema(value_type = Option<f64>, example = 90)]
    pub score: Option<Value>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct DateRequest {
    #[schema(example = "2025-07-01")]
    pub date: Option<String>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct EmailQuery {
    /// Exact email to look up
    pub email: Option<String>,
}

/// Registration payload: `email` and `role` are typed, the rest is kept as profile.
#[derive(Debug, Default, Deserialize)]
pub struct NewEmployee {
    pub email: Option<String>,
    pub role: Option<String>,
    #[serde(flatten)]
    pub profile: Map<String, Value>,
}

/// Claims carried by a bearer token. Anything besides `email` rides along in `extra`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentityClaims {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub exp: usize,
    pub iat: usize,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    #[schema(example = "Payroll updated successfully.")]
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TokenResponse {
    pub token: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AdminStatus {
    pub is_admin: bool,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisteredResponse {
    #[schema(example = "User created")]
    pub message: String,
    pub inserted_id: String,
    #[schema(example = "20250001")]
    pub employee_id: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackResponse {
    pub daily_feedback: Vec<FeedbackDay>,
}
