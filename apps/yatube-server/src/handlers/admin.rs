//! Operator actions.

use actix_web::{HttpResponse, web};

use super::redirect;
use crate::middleware::auth::Identity;
use crate::middleware::error::{AppError, AppResult};
use crate::observability::RequestId;
use crate::state::AppState;

/// POST /admin/cache/clear/ - staff only.
pub async fn cache_clear(
    state: web::Data<AppState>,
    identity: Identity,
    request_id: RequestId,
) -> AppResult<HttpResponse> {
    if !identity.is_staff {
        tracing::warn!(
            username = %identity.username,
            request_id = %request_id.as_str(),
            "Non-staff cache clear refused"
        );
        return Err(AppError::Forbidden);
    }

    state.cache.clear().await?;
    tracing::info!(
        username = %identity.username,
        request_id = %request_id.as_str(),
        "Cache cleared"
    );

    Ok(redirect("/"))
}
