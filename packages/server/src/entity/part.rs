use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "part")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub name: String,

    pub automobile_id: i32,
    #[sea_orm(belongs_to, from = "automobile_id", to = "id", on_delete = "Cascade")]
    pub automobile: HasOne<super::automobile::Entity>,

    #[sea_orm(has_many)]
    pub files: HasMany<super::part_file::Entity>,
}

impl ActiveModelBehavior for ActiveModel {}
