use axum::Json;
use axum::extract::{DefaultBodyLimit, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use common::storage::valid_name;
use common::{NotificationPayload, Task};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};
use tracing::{debug, error, info, instrument, warn};

use crate::entity::{automobile, part, part_file};
use crate::error::{AppError, ErrorBody};
use crate::extractors::json::AppJson;
use crate::extractors::origin::RequestOrigin;
use crate::extractors::path::AppPath;
use crate::handlers::automobile::file_urls;
use crate::models::upload::{UploadFileRequest, UploadFileResponse, UploadFormResponse};
use crate::state::AppState;
use crate::utils::payload::build_payload;

/// Room for JSON escaping on top of the raw content limit.
pub fn upload_body_limit(max_file_size: u64) -> DefaultBodyLimit {
    let limit = usize::try_from(max_file_size.saturating_mul(2))
        .unwrap_or(usize::MAX)
        .saturating_add(64 * 1024);
    DefaultBodyLimit::max(limit)
}

#[utoipa::path(
    get,
    path = "/automobiles/{automobile_id}/parts/{part_id}/upload/",
    tag = "Part Files",
    operation_id = "uploadForm",
    summary = "Upload form shape",
    description = "Returns the empty body shape the upload endpoint expects.",
    params(
        ("automobile_id" = i32, Path, description = "Automobile ID"),
        ("part_id" = i32, Path, description = "Part ID"),
    ),
    responses(
        (status = 200, description = "Empty upload form", body = UploadFormResponse),
    ),
)]
pub async fn upload_form(
    AppPath((_automobile_id, _part_id)): AppPath<(i32, i32)>,
) -> Json<UploadFormResponse> {
    Json(UploadFormResponse {
        file_name: String::new(),
        content: String::new(),
    })
}

#[utoipa::path(
    post,
    path = "/automobiles/{automobile_id}/parts/{part_id}/upload/",
    tag = "Part Files",
    operation_id = "uploadFile",
    summary = "Upload a text file to a part",
    description = "Stores `content` as a file named after `file_name` under the part and \
        notifies the mail worker. The part must belong to the automobile. The name is cleaned \
        to alphanumerics, `-`, `_` and `.`; a taken name gets a random suffix. \
        Notification is best-effort and never fails the upload.",
    params(
        ("automobile_id" = i32, Path, description = "Automobile ID"),
        ("part_id" = i32, Path, description = "Part ID"),
    ),
    request_body = UploadFileRequest,
    responses(
        (status = 201, description = "File stored", body = UploadFileResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 404, description = "Part not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, origin, body), fields(file_id))]
pub async fn upload_file(
    State(state): State<AppState>,
    origin: RequestOrigin,
    AppPath((automobile_id, part_id)): AppPath<(i32, i32)>,
    AppJson(body): AppJson<UploadFileRequest>,
) -> Result<impl IntoResponse, AppError> {
    let part = part::Entity::find_by_id(part_id)
        .filter(part::Column::AutomobileId.eq(automobile_id))
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Part not found".into()))?;

    let upload = body.validate()?;
    let name = valid_name(&upload.file_name).map_err(|_| {
        AppError::field(
            "file_name",
            "File name must contain at least one letter, digit, '-', '_' or '.'.",
        )
    })?;

    let stored_path = state
        .files
        .save(
            &state.config.storage.upload_prefix,
            &name,
            upload.content.as_bytes(),
        )
        .await?;

    let inserted = part_file::ActiveModel {
        file: Set(stored_path.clone()),
        part_id: Set(part.id),
        ..Default::default()
    }
    .insert(&state.db)
    .await;

    let part_file = match inserted {
        Ok(model) => model,
        Err(e) => {
            if let Err(cleanup) = state.files.delete(&stored_path).await {
                warn!(path = %stored_path, error = %cleanup, "Failed to remove orphaned upload");
            }
            return Err(e.into());
        }
    };
    tracing::Span::current().record("file_id", part_file.id);
    info!(path = %part_file.file, "File uploaded");

    let automobile = automobile::Entity::find_by_id(part.automobile_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::Internal(format!("Automobile {automobile_id} vanished")))?;

    let payload = build_payload(&file_urls(&state, origin), &automobile, &part, &part_file);
    enqueue_notification(&state, payload).await;

    Ok((
        StatusCode::CREATED,
        Json(UploadFileResponse {
            message: "File uploaded successfully.".into(),
            file_id: part_file.id,
        }),
    ))
}

/// Publish a `send_email` task. Failures are logged and swallowed.
async fn enqueue_notification(state: &AppState, payload: NotificationPayload) {
    let Some(ref queue) = state.queue else {
        debug!("MQ disabled, skipping notification");
        return;
    };

    let task = match Task::from_message(&payload) {
        Ok(task) => task,
        Err(e) => {
            error!(error = %e, "Failed to build notification task");
            return;
        }
    };

    match queue
        .publish_task(&state.config.mq.queue_name, &task)
        .await
    {
        Ok(()) => {
            info!(task_id = %task.id, "Notification enqueued");
        }
        Err(e) => {
            warn!(error = %e, task_id = %task.id, "Failed to enqueue notification");
        }
    }
}

