use crate::{auth::jwt::{TokenError, TokenSigner}, error::AppError};
use actix_web::{FromRequest, HttpRequest, dev::Payload, http::header::AUTHORIZATION, web::Data};
use futures::future::{Ready, ready};
use tracing::{debug, error};

/// Identity proven by a valid bearer token.
pub struct AuthUser {
    pub email: Option<String>,
}

impl FromRequest for AuthUser {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let signer = match req.app_data::<Data<TokenSigner>>() {
            Some(s) => s,
            None => {
                error!("Token signer missing from app data");
                return ready(Err(AppError::Internal));
            }
        };

        // A header that is not valid text still counts as presented.
        let header = req
            .headers()
            .get(AUTHORIZATION)
            .map(|h| h.to_str().unwrap_or_default());

        match signer.verify_header(header) {
            Ok(claims) => ready(Ok(AuthUser {
                email: claims.email,
            })),
            Err(TokenError::Missing) => ready(Err(AppError::Unauthorized)),
            Err(e) => {
                debug!(error = %e, "Rejected bearer token");
                ready(Err(AppError::Forbidden))
            }
        }
    }
}

impl AuthUser {
    /// True if the token was issued for exactly this email.
    pub fn is_same_identity(&self, email: &str) -> bool {
        self.email.as_deref() == Some(email)
    }
}
