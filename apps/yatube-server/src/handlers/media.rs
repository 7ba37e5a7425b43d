//! Serving stored post images.

use actix_web::{HttpResponse, http::header, web};

use crate::middleware::error::AppResult;
use crate::state::AppState;

/// GET /media/{path}
pub async fn serve(state: web::Data<AppState>, path: web::Path<String>) -> AppResult<HttpResponse> {
    let bytes = state.media.open(&path).await?;
    let mime = mime_guess::from_path(path.as_str()).first_or_octet_stream();

    Ok(HttpResponse::Ok()
        .content_type(mime.as_ref())
        .insert_header((header::CACHE_CONTROL, "public, max-age=86400"))
        .body(bytes))
}
