//! Reading the post form from either a urlencoded or a multipart body.

use actix_multipart::Multipart;
use actix_web::{FromRequest, HttpRequest, dev::Payload, http::header, web};
use futures::StreamExt;

use yatube_core::forms::{PostSubmission, Upload};
use yatube_shared::PostForm;

use crate::middleware::error::AppError;

/// Largest accepted multipart field.
const MAX_FIELD_BYTES: usize = 10 * 1024 * 1024;

pub async fn read_post_submission(
    req: &HttpRequest,
    mut payload: Payload,
) -> Result<PostSubmission, AppError> {
    let is_multipart = req
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.starts_with("multipart/form-data"));

    if is_multipart {
        return read_multipart(Multipart::new(req.headers(), payload)).await;
    }

    let form = web::Form::<PostForm>::from_request(req, &mut payload)
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
        .into_inner();

    Ok(PostSubmission {
        text: form.text,
        group: form.group,
        image: None,
    })
}

async fn read_multipart(mut multipart: Multipart) -> Result<PostSubmission, AppError> {
    let mut submission = PostSubmission::default();

    while let Some(field) = multipart.next().await {
        let mut field = field.map_err(|e| AppError::BadRequest(e.to_string()))?;
        let name = field.name().unwrap_or_default().to_string();
        let filename = field
            .content_disposition()
            .and_then(|cd| cd.get_filename())
            .map(str::to_string);

        let mut content = Vec::new();
        while let Some(chunk) = field.next().await {
            let chunk = chunk.map_err(|e| AppError::BadRequest(e.to_string()))?;
            if content.len() + chunk.len() > MAX_FIELD_BYTES {
                return Err(AppError::PayloadTooLarge);
            }
            content.extend_from_slice(&chunk);
        }

        match name.as_str() {
            "text" => submission.text = String::from_utf8_lossy(&content).into_owned(),
            "group" => submission.group = Some(String::from_utf8_lossy(&content).into_owned()),
            "image" => {
                submission.image = Some(Upload {
                    filename: filename.unwrap_or_default(),
                    content,
                })
            }
            other => tracing::debug!(field = %other, "Ignoring unknown form field"),
        }
    }

    Ok(submission)
}
