use std::collections::HashMap;

use serde::Serialize;

use crate::entity::{automobile, part, part_file};
use crate::utils::urls::FileUrls;

/// A stored file attached to a part.
#[derive(Serialize, utoipa::ToSchema)]
pub struct PartFileResponse {
    #[schema(example = 1)]
    pub id: i32,
    /// Absolute URL the file is served from.
    #[schema(example = "http://localhost:3000/media/part_files/brake.txt")]
    pub file: String,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct PartResponse {
    #[schema(example = 1)]
    pub id: i32,
    #[schema(example = "Brakes")]
    pub name: String,
    pub files: Vec<PartFileResponse>,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct AutomobileResponse {
    #[schema(example = 1)]
    pub id: i32,
    #[schema(example = "Toyota")]
    pub manufacturer: String,
    /// Body type.
    #[serde(rename = "type")]
    #[schema(example = "Sedan")]
    pub automobile_type: String,
    #[schema(example = "Corolla")]
    pub model: String,
    pub parts: Vec<PartResponse>,
}

impl PartFileResponse {
    pub fn from_model(model: part_file::Model, urls: &FileUrls) -> Self {
        Self {
            id: model.id,
            file: urls.file_url(&model.file),
        }
    }
}

impl PartResponse {
    /// `files_by_part` is drained of this part's files.
    pub fn from_model(
        model: part::Model,
        files_by_part: &mut HashMap<i32, Vec<part_file::Model>>,
        urls: &FileUrls,
    ) -> Self {
        let files = files_by_part
            .remove(&model.id)
            .unwrap_or_default()
            .into_iter()
            .map(|f| PartFileResponse::from_model(f, urls))
            .collect();

        Self {
            id: model.id,
            name: model.name,
            files,
        }
    }
}

impl AutomobileResponse {
    pub fn from_model(model: automobile::Model, parts: Vec<PartResponse>) -> Self {
        Self {
            id: model.id,
            manufacturer: model.manufacturer,
            automobile_type: model.kind,
            model: model.model,
            parts,
        }
    }
}
