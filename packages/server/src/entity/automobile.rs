use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "automobile")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub manufacturer: String,
    /// Body type, e.g. "Sedan". Stored in the `type` column.
    #[sea_orm(column_name = "type")]
    pub kind: String,
    pub model: String,

    #[sea_orm(has_many)]
    pub parts: HasMany<super::part::Entity>,
}

impl Model {
    /// Human-readable form, `"{manufacturer} {model}"`.
    pub fn display_name(&self) -> String {
        format!("{} {}", self.manufacturer, self.model)
    }
}

impl ActiveModelBehavior for ActiveModel {}
