//! Image upload and metadata.
//!
//! Files land at `<upload_dir>/<kind>/<uuid>.<ext>` and are recorded as
//! `uploads/<kind>/<uuid>.<ext>`, which the router serves under `/uploads`.

use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::Json;
use tracing::{info, warn};
use uuid::Uuid;

use ridewatch_core::{CreateImageRequest, Image, ImageKind, ImageRepository};

use crate::auth::RequireAuth;
use crate::{ApiError, ApiResult, AppState};

/// URL prefix stored in image paths.
pub const UPLOAD_URL_PREFIX: &str = "uploads";

/// Accepted file extension for an upload, from its name or content type.
pub fn image_extension(file_name: Option<&str>, content_type: Option<&str>) -> ApiResult<&'static str> {
    let from_name = file_name
        .and_then(|n| std::path::Path::new(n).extension())
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    let ext = match (from_name.as_deref(), content_type) {
        (Some("jpg" | "jpeg"), _) | (_, Some("image/jpeg")) => "jpg",
        (Some("png"), _) | (_, Some("image/png")) => "png",
        (Some("webp"), _) | (_, Some("image/webp")) => "webp",
        _ => {
            return Err(ApiError::BadRequest(
                "only jpeg, png, and webp images are accepted".to_string(),
            ))
        }
    };
    Ok(ext)
}

/// Relative path recorded for a new upload.
pub fn stored_path(kind: ImageKind, ext: &str) -> String {
    format!("{}/{}/{}.{}", UPLOAD_URL_PREFIX, kind, Uuid::now_v7(), ext)
}

/// Multipart form accepted by [`upload_image`]. Documentation only.
#[derive(utoipa::ToSchema)]
#[allow(dead_code)]
pub struct UploadImageForm {
    #[schema(value_type = String, format = Binary)]
    file: Vec<u8>,
    /// Defaults to `evidence`.
    kind: Option<ImageKind>,
}

struct Upload {
    kind: ImageKind,
    ext: &'static str,
    data: Vec<u8>,
}

async fn read_upload(mut multipart: Multipart) -> ApiResult<Upload> {
    let mut kind = ImageKind::Evidence;
    let mut file: Option<(&'static str, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Failed to read upload: {}", e)))?
    {
        match field.name() {
            Some("kind") => {
                let raw = field
                    .text()
                    .await
                    .map_err(|e| ApiError::BadRequest(format!("Failed to read kind: {}", e)))?;
                kind = ImageKind::parse(raw.trim())
                    .ok_or_else(|| ApiError::BadRequest(format!("unknown image kind '{}'", raw)))?;
            }
            Some("file") | Some("image") => {
                let ext = image_extension(field.file_name(), field.content_type())?;
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::BadRequest(format!("Failed to read file data: {}", e)))?;
                file = Some((ext, data.to_vec()));
            }
            _ => {}
        }
    }

    let (ext, data) = file.ok_or_else(|| {
        ApiError::BadRequest("No file uploaded. Use field name 'file'.".to_string())
    })?;
    if data.is_empty() {
        return Err(ApiError::BadRequest("uploaded file is empty".to_string()));
    }
    Ok(Upload { kind, ext, data })
}

#[utoipa::path(
    post,
    path = "/api/images",
    tag = "Images",
    security(("bearer" = [])),
    request_body(content = UploadImageForm, content_type = "multipart/form-data"),
    responses(
        (status = 201, body = Image),
        (status = 400),
        (status = 403, description = "Only admins upload camera images")
    )
)]
pub async fn upload_image(
    State(state): State<AppState>,
    RequireAuth(claims): RequireAuth,
    multipart: Multipart,
) -> ApiResult<(StatusCode, Json<Image>)> {
    let upload = read_upload(multipart).await?;
    if upload.kind != ImageKind::Evidence && !claims.is_admin {
        return Err(ApiError::Forbidden(
            "only admins upload camera images".to_string(),
        ));
    }

    let path = stored_path(upload.kind, upload.ext);
    let relative = path
        .strip_prefix(UPLOAD_URL_PREFIX)
        .unwrap_or(&path)
        .trim_start_matches('/');
    let disk_path = state.upload_dir.join(relative);

    if let Some(parent) = disk_path.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(ridewatch_core::Error::from)?;
    }
    tokio::fs::write(&disk_path, &upload.data)
        .await
        .map_err(ridewatch_core::Error::from)?;

    let image = match state
        .db
        .images
        .create(CreateImageRequest {
            path,
            kind: upload.kind,
        })
        .await
    {
        Ok(image) => image,
        Err(e) => {
            if let Err(rm) = tokio::fs::remove_file(&disk_path).await {
                warn!(subsystem = "api", op = "upload_image", error = %rm, "Orphaned upload not removed");
            }
            return Err(e.into());
        }
    };

    info!(
        subsystem = "api",
        op = "upload_image",
        user_id = claims.user_id,
        image_id = image.id,
        kind = %image.kind,
        bytes = upload.data.len(),
        "Image stored"
    );
    Ok((StatusCode::CREATED, Json(image)))
}

#[utoipa::path(
    get,
    path = "/api/images/{id}",
    tag = "Images",
    security(("bearer" = [])),
    params(("id" = i64, Path, description = "Image id")),
    responses((status = 200, body = Image), (status = 404))
)]
pub async fn get_image(
    State(state): State<AppState>,
    RequireAuth(_claims): RequireAuth,
    Path(id): Path<i64>,
) -> ApiResult<Json<Image>> {
    Ok(Json(state.db.images.get(id).await?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_from_name_or_type() {
        assert_eq!(image_extension(Some("plate.JPG"), None).unwrap(), "jpg");
        assert_eq!(image_extension(Some("a.jpeg"), None).unwrap(), "jpg");
        assert_eq!(image_extension(None, Some("image/png")).unwrap(), "png");
        assert_eq!(image_extension(Some("blob"), Some("image/webp")).unwrap(), "webp");
        assert!(image_extension(Some("script.sh"), Some("text/plain")).is_err());
        assert!(image_extension(None, None).is_err());
    }

    #[test]
    fn test_stored_path_layout() {
        let path = stored_path(ImageKind::Motorcycle, "jpg");
        assert!(path.starts_with("uploads/motorcycle/"));
        assert!(path.ends_with(".jpg"));
        assert!(!path.contains(".."));
    }
}
