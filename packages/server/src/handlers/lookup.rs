use std::collections::HashMap;

use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder};

use crate::entity::{automobile, part, part_file};
use crate::error::AppError;

pub(crate) async fn find_automobile<C: ConnectionTrait>(
    db: &C,
    id: i32,
) -> Result<automobile::Model, AppError> {
    automobile::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Automobile not found".into()))
}

pub(crate) async fn find_part<C: ConnectionTrait>(db: &C, id: i32) -> Result<part::Model, AppError> {
    part::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Part not found".into()))
}

/// Parts of the given automobiles, ordered by id.
pub(crate) async fn parts_of<C: ConnectionTrait>(
    db: &C,
    automobile_ids: &[i32],
) -> Result<Vec<part::Model>, AppError> {
    if automobile_ids.is_empty() {
        return Ok(Vec::new());
    }
    Ok(part::Entity::find()
        .filter(part::Column::AutomobileId.is_in(automobile_ids.iter().copied()))
        .order_by_asc(part::Column::Id)
        .all(db)
        .await?)
}

/// Files of the given parts, ordered by id.
pub(crate) async fn files_of<C: ConnectionTrait>(
    db: &C,
    part_ids: &[i32],
) -> Result<Vec<part_file::Model>, AppError> {
    if part_ids.is_empty() {
        return Ok(Vec::new());
    }
    Ok(part_file::Entity::find()
        .filter(part_file::Column::PartId.is_in(part_ids.iter().copied()))
        .order_by_asc(part_file::Column::Id)
        .all(db)
        .await?)
}

/// Files of the given parts, grouped by part id. Each group keeps id order.
pub(crate) async fn files_by_part<C: ConnectionTrait>(
    db: &C,
    part_ids: &[i32],
) -> Result<HashMap<i32, Vec<part_file::Model>>, AppError> {
    let mut grouped: HashMap<i32, Vec<part_file::Model>> = HashMap::new();
    for file in files_of(db, part_ids).await? {
        grouped.entry(file.part_id).or_default().push(file);
    }
    Ok(grouped)
}
