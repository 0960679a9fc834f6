//! Food entity for SeaORM.

use sea_orm::entity::prelude::*;

use moodlog_core::domain::UserId;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "foods")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub name: String,
    pub calories: i32,
    pub user_id: i64,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    User,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for moodlog_core::domain::Food {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            calories: model.calories,
            user_id: UserId::new(model.user_id),
            created_at: model.created_at.into(),
            updated_at: model.updated_at.into(),
        }
    }
}
