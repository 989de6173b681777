use axum::body::Body;
use axum::extract::State;
use axum::http::{StatusCode, header};
use axum::response::Response;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};
use tokio_util::io::ReaderStream;
use tracing::{info, instrument};

use crate::entity::part_file;
use crate::error::{AppError, ErrorBody};
use crate::extractors::path::AppPath;
use crate::handlers::lookup::{files_of, find_automobile, find_part, parts_of};
use crate::state::AppState;
use crate::utils::archive::create_zip;
use crate::utils::filename::content_disposition_value;

#[utoipa::path(
    get,
    path = "/parts/{part_id}/files/{file_id}/download/",
    tag = "Part Files",
    operation_id = "downloadFile",
    summary = "Download one file",
    description = "Streams the stored bytes of a file that belongs to the part, as an attachment \
        named after the stored file.",
    params(
        ("part_id" = i32, Path, description = "Part ID"),
        ("file_id" = i32, Path, description = "File ID"),
    ),
    responses(
        (status = 200, description = "File content (application/octet-stream)"),
        (status = 404, description = "Part, file or stored content not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state))]
pub async fn download_file(
    State(state): State<AppState>,
    AppPath((part_id, file_id)): AppPath<(i32, i32)>,
) -> Result<Response, AppError> {
    let part = find_part(&state.db, part_id).await?;
    let file = part_file::Entity::find_by_id(file_id)
        .filter(part_file::Column::PartId.eq(part.id))
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("File not found".into()))?;

    let size = state.files.size(&file.file).await?;
    let reader = state.files.open(&file.file).await?;
    let body = Body::from_stream(ReaderStream::new(reader));

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "application/octet-stream")
        .header(header::CONTENT_LENGTH, size.to_string())
        .header(
            header::CONTENT_DISPOSITION,
            content_disposition_value(file.file_name()),
        )
        .body(body)
        .map_err(|e| AppError::Internal(format!("Failed to build response: {e}")))
}

#[utoipa::path(
    get,
    path = "/parts/{part_id}/download_all/",
    tag = "Part Files",
    operation_id = "downloadPartFiles",
    summary = "Download all files of a part as ZIP",
    description = "Returns a ZIP archive named `{part}_{manufacturer} {model}_files.zip` holding \
        every file of the part under its stored name. A part without files is a 404, \
        never an empty archive.",
    params(("part_id" = i32, Path, description = "Part ID")),
    responses(
        (status = 200, description = "ZIP archive (application/zip)"),
        (status = 404, description = "Part not found (NOT_FOUND) or no files (NO_FILES)", body = ErrorBody),
    ),
)]
#[instrument(skip(state))]
pub async fn download_part_files(
    State(state): State<AppState>,
    AppPath(part_id): AppPath<i32>,
) -> Result<Response, AppError> {
    let part = find_part(&state.db, part_id).await?;
    let files = files_of(&state.db, &[part.id]).await?;
    if files.is_empty() {
        return Err(AppError::EmptyResult("No files found for this part.".into()));
    }
    let automobile = find_automobile(&state.db, part.automobile_id).await?;

    let filename = format!("{}_{}_files.zip", part.name, automobile.display_name());
    zip_response(&state, files, &filename).await
}

#[utoipa::path(
    get,
    path = "/automobiles/{automobile_id}/download_all/",
    tag = "Automobiles",
    operation_id = "downloadAutomobileFiles",
    summary = "Download all files of an automobile as ZIP",
    description = "Returns a ZIP archive named `{manufacturer}_{model}_files.zip` holding every \
        file of every part of the automobile. Files are stored flat under their stored names; \
        equal names from different parts appear as separate entries.",
    params(("automobile_id" = i32, Path, description = "Automobile ID")),
    responses(
        (status = 200, description = "ZIP archive (application/zip)"),
        (status = 404, description = "Automobile not found (NOT_FOUND) or no files (NO_FILES)", body = ErrorBody),
    ),
)]
#[instrument(skip(state))]
pub async fn download_automobile_files(
    State(state): State<AppState>,
    AppPath(automobile_id): AppPath<i32>,
) -> Result<Response, AppError> {
    let automobile = find_automobile(&state.db, automobile_id).await?;
    let part_ids: Vec<i32> = parts_of(&state.db, &[automobile.id])
        .await?
        .iter()
        .map(|p| p.id)
        .collect();
    let files = files_of(&state.db, &part_ids).await?;
    if files.is_empty() {
        return Err(AppError::EmptyResult(
            "No files found for this automobile.".into(),
        ));
    }

    let filename = format!("{}_{}_files.zip", automobile.manufacturer, automobile.model);
    zip_response(&state, files, &filename).await
}

async fn zip_response(
    state: &AppState,
    files: Vec<part_file::Model>,
    filename: &str,
) -> Result<Response, AppError> {
    let paths: Vec<String> = files.into_iter().map(|f| f.file).collect();
    let archive = create_zip(state.files.as_ref(), &paths).await?;
    info!(entries = paths.len(), bytes = archive.len(), "Archive built");

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "application/zip")
        .header(header::CONTENT_LENGTH, archive.len().to_string())
        .header(header::CONTENT_DISPOSITION, content_disposition_value(filename))
        .body(Body::from(archive))
        .map_err(|e| AppError::Internal(format!("Failed to build response: {e}")))
}
