use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "part_file")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    /// Relative storage path, e.g. `part_files/manual.txt`.
    pub file: String,

    pub part_id: i32,
    #[sea_orm(belongs_to, from = "part_id", to = "id", on_delete = "Cascade")]
    pub part: HasOne<super::part::Entity>,
}

impl Model {
    /// Base name of the stored file, used as the download filename.
    pub fn file_name(&self) -> &str {
        common::storage::base_name(&self.file)
    }
}

impl ActiveModelBehavior for ActiveModel {}
