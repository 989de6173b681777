use std::collections::HashMap;

use axum::Json;
use axum::extract::State;
use sea_orm::{ConnectionTrait, EntityTrait, QueryOrder};
use tracing::instrument;

use crate::entity::automobile;
use crate::error::{AppError, ErrorBody};
use crate::extractors::origin::RequestOrigin;
use crate::extractors::path::AppPath;
use crate::handlers::lookup::{files_by_part, find_automobile, parts_of};
use crate::models::automobile::{AutomobileResponse, PartResponse};
use crate::state::AppState;
use crate::utils::urls::FileUrls;

#[utoipa::path(
    get,
    path = "/automobiles/",
    tag = "Automobiles",
    operation_id = "listAutomobiles",
    summary = "List automobiles",
    description = "Returns every automobile ordered by id, each with its parts and their files. \
        File entries carry absolute URLs.",
    responses(
        (status = 200, description = "All automobiles", body = Vec<AutomobileResponse>),
    ),
)]
#[instrument(skip(state, origin))]
pub async fn list_automobiles(
    State(state): State<AppState>,
    origin: RequestOrigin,
) -> Result<Json<Vec<AutomobileResponse>>, AppError> {
    let urls = file_urls(&state, origin);
    let automobiles = automobile::Entity::find()
        .order_by_asc(automobile::Column::Id)
        .all(&state.db)
        .await?;

    let ids: Vec<i32> = automobiles.iter().map(|a| a.id).collect();
    let mut parts_by_automobile = nested_parts(&state.db, &ids, &urls).await?;

    let body = automobiles
        .into_iter()
        .map(|a| {
            let parts = parts_by_automobile.remove(&a.id).unwrap_or_default();
            AutomobileResponse::from_model(a, parts)
        })
        .collect();

    Ok(Json(body))
}

#[utoipa::path(
    get,
    path = "/automobiles/{automobile_id}",
    tag = "Automobiles",
    operation_id = "getAutomobile",
    summary = "Get an automobile",
    description = "Returns one automobile with its parts and their files.",
    params(("automobile_id" = i32, Path, description = "Automobile ID")),
    responses(
        (status = 200, description = "Automobile", body = AutomobileResponse),
        (status = 404, description = "Automobile not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, origin))]
pub async fn get_automobile(
    State(state): State<AppState>,
    origin: RequestOrigin,
    AppPath(automobile_id): AppPath<i32>,
) -> Result<Json<AutomobileResponse>, AppError> {
    let urls = file_urls(&state, origin);
    let automobile = find_automobile(&state.db, automobile_id).await?;
    let parts = nested_parts(&state.db, &[automobile.id], &urls)
        .await?
        .remove(&automobile.id)
        .unwrap_or_default();

    Ok(Json(AutomobileResponse::from_model(automobile, parts)))
}

#[utoipa::path(
    get,
    path = "/automobiles/{automobile_id}/parts/",
    tag = "Automobiles",
    operation_id = "listParts",
    summary = "List the parts of an automobile",
    description = "Returns the parts that belong to the automobile, ordered by id, each with its files. \
        An automobile without parts yields an empty list.",
    params(("automobile_id" = i32, Path, description = "Automobile ID")),
    responses(
        (status = 200, description = "Parts of the automobile", body = Vec<PartResponse>),
        (status = 404, description = "Automobile not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, origin))]
pub async fn list_parts(
    State(state): State<AppState>,
    origin: RequestOrigin,
    AppPath(automobile_id): AppPath<i32>,
) -> Result<Json<Vec<PartResponse>>, AppError> {
    let urls = file_urls(&state, origin);
    let automobile = find_automobile(&state.db, automobile_id).await?;
    let parts = nested_parts(&state.db, &[automobile.id], &urls)
        .await?
        .remove(&automobile.id)
        .unwrap_or_default();

    Ok(Json(parts))
}

pub(crate) fn file_urls(state: &AppState, origin: RequestOrigin) -> FileUrls {
    FileUrls::new(origin.0, state.config.storage.media_prefix())
}

/// Parts with their files for each of the given automobiles, keyed by automobile id.
async fn nested_parts<C: ConnectionTrait>(
    db: &C,
    automobile_ids: &[i32],
    urls: &FileUrls,
) -> Result<HashMap<i32, Vec<PartResponse>>, AppError> {
    let parts = parts_of(db, automobile_ids).await?;
    let part_ids: Vec<i32> = parts.iter().map(|p| p.id).collect();
    let mut files = files_by_part(db, &part_ids).await?;

    let mut grouped: HashMap<i32, Vec<PartResponse>> = HashMap::new();
    for part in parts {
        let automobile_id = part.automobile_id;
        grouped
            .entry(automobile_id)
            .or_default()
            .push(PartResponse::from_model(part, &mut files, urls));
    }
    Ok(grouped)
}
