//! Food consumption entries for SeaORM.

use sea_orm::entity::prelude::*;

use moodlog_core::domain::UserId;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "food_entries")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub user_id: i64,
    pub food_id: i64,
    pub quantity: i32,
    pub consumed_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::food::Entity",
        from = "Column::FoodId",
        to = "super::food::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Food,
}

impl Related<super::food::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Food.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for moodlog_core::domain::FoodEntry {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            user_id: UserId::new(model.user_id),
            food_id: model.food_id,
            quantity: model.quantity,
            consumed_at: model.consumed_at.into(),
        }
    }
}
