use crate::error::{AppError, Result};
use crate::model::{ShortenRequest, ShortenResponse};
use crate::state::AppState;
use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::{HeaderValue, StatusCode};
use axum::response::Redirect;
use axum::Json;
use snip_core::ShortCode;
use tracing::{debug, info};

/// The body is read raw so a missing or odd `Content-Type` does not matter,
/// only whether it decodes.
pub async fn shorten_handler(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<(StatusCode, Json<ShortenResponse>)> {
    let request: ShortenRequest =
        serde_json::from_slice(&body).map_err(|_| AppError::InvalidBody)?;
    let long_url = request.long_url.unwrap_or_default();
    // Whatever is stored must later fit in a `Location` header.
    if HeaderValue::from_str(&long_url).is_err() {
        return Err(AppError::Validation(
            "URL is not a valid redirect target".to_string(),
        ));
    }

    let shortened = state.shortener().shorten(&long_url).await?;
    info!(code = %shortened.code, long_url = %shortened.long_url, "Created short URL");

    Ok((
        StatusCode::CREATED,
        Json(ShortenResponse {
            long_url: shortened.long_url,
            short_url: shortened.short_url,
            code: shortened.code.to_string(),
        }),
    ))
}

pub async fn redirect_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
) -> Result<Redirect> {
    // A string that can never be a code is just an unknown code.
    let code = ShortCode::new(&code).map_err(|_| AppError::NotFound)?;

    let long_url = state.redirector().resolve(&code).await?;
    debug!(code = %code, long_url = %long_url, "Redirecting");

    Ok(Redirect::temporary(&long_url))
}

pub async fn method_not_allowed() -> AppError {
    AppError::MethodNotAllowed
}
