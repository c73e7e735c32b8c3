use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};

use crate::config::Mode;
use crate::error::ApiError;
use crate::state::AppState;

/// Identity of the requester as presented to the downstream store: either
/// the bearer token taken verbatim from the Authorization header, or the
/// local-mode default identity.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CallerIdentity {
    Bearer(String),
    LocalDefault,
}

impl CallerIdentity {
    /// Token to hand to the downstream store on behalf of this caller.
    pub fn token(&self) -> &str {
        match self {
            CallerIdentity::Bearer(token) => token,
            CallerIdentity::LocalDefault => crate::context::LOCAL_ID_TOKEN,
        }
    }
}

/// Extract the bearer token from an Authorization header.
///
/// The prefix match is literal: `"Bearer "`, case-sensitive, single space.
/// Everything after it is the token, used verbatim - no trimming, decoding,
/// or structural validation. Whether the token is acceptable is the
/// downstream store's decision.
pub fn bearer_token(headers: &HeaderMap) -> Option<String> {
    let value = headers.get("authorization")?.to_str().ok()?;
    value.strip_prefix("Bearer ").map(|token| token.to_string())
}

/// Middleware guarding the data routes. In Server mode a missing or
/// malformed header fails the request with 401 before any store operation
/// runs; in Local mode the default identity is substituted instead. On
/// success the identity is attached as a request extension.
pub async fn identity_middleware(
    State(state): State<AppState>,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let identity = match bearer_token(&headers) {
        Some(token) => CallerIdentity::Bearer(token),
        None => match state.mode {
            Mode::Local => CallerIdentity::LocalDefault,
            Mode::Server => {
                return Err(ApiError::unauthorized(
                    "Missing or invalid Authorization header",
                ))
            }
        },
    };

    request.extensions_mut().insert(identity);
    Ok(next.run(request).await)
}
