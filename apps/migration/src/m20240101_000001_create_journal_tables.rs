use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
    Username,
    PasswordHash,
    AppPasswordHash,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Categories {
    Table,
    Id,
    Name,
    UserId,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Tags {
    Table,
    Id,
    Name,
    UserId,
    IsPublic,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Moods {
    Table,
    Id,
    UserId,
    Title,
    Description,
    Emoji,
    CreatedAt,
    UpdatedAt,
    DeletedAt,
}

#[derive(DeriveIden)]
enum Foods {
    Table,
    Id,
    Name,
    Calories,
    UserId,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum FoodEntries {
    Table,
    Id,
    UserId,
    FoodId,
    Quantity,
    ConsumedAt,
}

#[derive(DeriveIden)]
enum MoodTags {
    Table,
    MoodId,
    TagId,
}

#[derive(DeriveIden)]
enum MoodCategories {
    Table,
    MoodId,
    CategoryId,
}

#[derive(DeriveIden)]
enum FoodCategories {
    Table,
    FoodId,
    CategoryId,
}

fn id(col: impl IntoIden) -> ColumnDef {
    ColumnDef::new(col)
        .big_integer()
        .not_null()
        .auto_increment()
        .primary_key()
        .to_owned()
}

fn reference(col: impl IntoIden) -> ColumnDef {
    ColumnDef::new(col).big_integer().not_null().to_owned()
}

fn timestamp(col: impl IntoIden) -> ColumnDef {
    ColumnDef::new(col)
        .timestamp_with_time_zone()
        .not_null()
        .default(Expr::current_timestamp())
        .to_owned()
}

/// Cascading foreign key from `from_table.from_col` to `to_table.id`.
fn cascade(
    name: &str,
    from_table: impl IntoIden + 'static,
    from_col: impl IntoIden,
    to_table: impl IntoIden + 'static,
    to_col: impl IntoIden,
) -> ForeignKeyCreateStatement {
    ForeignKey::create()
        .name(name)
        .from(from_table, from_col)
        .to(to_table, to_col)
        .on_delete(ForeignKeyAction::Cascade)
        .on_update(ForeignKeyAction::Cascade)
        .to_owned()
}

/// Unique `(name, user_id)` index on a user-owned table.
fn unique_name_per_user(
    name: &str,
    table: impl IntoIden + 'static,
    name_col: impl IntoIden,
    user_col: impl IntoIden,
) -> IndexCreateStatement {
    Index::create()
        .name(name)
        .table(table)
        .col(name_col)
        .col(user_col)
        .unique()
        .to_owned()
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(id(Users::Id))
                    .col(ColumnDef::new(Users::Username).string().not_null().unique_key())
                    .col(ColumnDef::new(Users::PasswordHash).string().not_null())
                    .col(ColumnDef::new(Users::AppPasswordHash).string().null())
                    .col(timestamp(Users::CreatedAt))
                    .col(timestamp(Users::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Categories::Table)
                    .if_not_exists()
                    .col(id(Categories::Id))
                    .col(ColumnDef::new(Categories::Name).string().not_null())
                    .col(reference(Categories::UserId))
                    .col(timestamp(Categories::CreatedAt))
                    .col(timestamp(Categories::UpdatedAt))
                    .foreign_key(&mut cascade(
                        "fk_categories_user",
                        Categories::Table,
                        Categories::UserId,
                        Users::Table,
                        Users::Id,
                    ))
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(unique_name_per_user(
                "idx_categories_name_user",
                Categories::Table,
                Categories::Name,
                Categories::UserId,
            ))
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Tags::Table)
                    .if_not_exists()
                    .col(id(Tags::Id))
                    .col(ColumnDef::new(Tags::Name).string().not_null())
                    .col(reference(Tags::UserId))
                    .col(
                        ColumnDef::new(Tags::IsPublic)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(timestamp(Tags::CreatedAt))
                    .col(timestamp(Tags::UpdatedAt))
                    .foreign_key(&mut cascade(
                        "fk_tags_user",
                        Tags::Table,
                        Tags::UserId,
                        Users::Table,
                        Users::Id,
                    ))
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(unique_name_per_user(
                "idx_tags_name_user",
                Tags::Table,
                Tags::Name,
                Tags::UserId,
            ))
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Moods::Table)
                    .if_not_exists()
                    .col(id(Moods::Id))
                    .col(reference(Moods::UserId))
                    .col(ColumnDef::new(Moods::Title).string().not_null())
                    .col(ColumnDef::new(Moods::Description).text().not_null())
                    .col(ColumnDef::new(Moods::Emoji).string().not_null())
                    .col(timestamp(Moods::CreatedAt))
                    .col(timestamp(Moods::UpdatedAt))
                    .col(
                        ColumnDef::new(Moods::DeletedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .foreign_key(&mut cascade(
                        "fk_moods_user",
                        Moods::Table,
                        Moods::UserId,
                        Users::Table,
                        Users::Id,
                    ))
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_moods_user_created")
                    .table(Moods::Table)
                    .col(Moods::UserId)
                    .col(Moods::CreatedAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Foods::Table)
                    .if_not_exists()
                    .col(id(Foods::Id))
                    .col(ColumnDef::new(Foods::Name).string().not_null())
                    .col(
                        ColumnDef::new(Foods::Calories)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(reference(Foods::UserId))
                    .col(timestamp(Foods::CreatedAt))
                    .col(timestamp(Foods::UpdatedAt))
                    .foreign_key(&mut cascade(
                        "fk_foods_user",
                        Foods::Table,
                        Foods::UserId,
                        Users::Table,
                        Users::Id,
                    ))
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(unique_name_per_user(
                "idx_foods_name_user",
                Foods::Table,
                Foods::Name,
                Foods::UserId,
            ))
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(FoodEntries::Table)
                    .if_not_exists()
                    .col(id(FoodEntries::Id))
                    .col(reference(FoodEntries::UserId))
                    .col(reference(FoodEntries::FoodId))
                    .col(ColumnDef::new(FoodEntries::Quantity).integer().not_null())
                    .col(timestamp(FoodEntries::ConsumedAt))
                    .foreign_key(&mut cascade(
                        "fk_food_entries_user",
                        FoodEntries::Table,
                        FoodEntries::UserId,
                        Users::Table,
                        Users::Id,
                    ))
                    .foreign_key(&mut cascade(
                        "fk_food_entries_food",
                        FoodEntries::Table,
                        FoodEntries::FoodId,
                        Foods::Table,
                        Foods::Id,
                    ))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(MoodTags::Table)
                    .if_not_exists()
                    .col(reference(MoodTags::MoodId))
                    .col(reference(MoodTags::TagId))
                    .primary_key(Index::create().col(MoodTags::MoodId).col(MoodTags::TagId))
                    .foreign_key(&mut cascade(
                        "fk_mood_tags_mood",
                        MoodTags::Table,
                        MoodTags::MoodId,
                        Moods::Table,
                        Moods::Id,
                    ))
                    .foreign_key(&mut cascade(
                        "fk_mood_tags_tag",
                        MoodTags::Table,
                        MoodTags::TagId,
                        Tags::Table,
                        Tags::Id,
                    ))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(MoodCategories::Table)
                    .if_not_exists()
                    .col(reference(MoodCategories::MoodId))
                    .col(reference(MoodCategories::CategoryId))
                    .primary_key(
                        Index::create()
                            .col(MoodCategories::MoodId)
                            .col(MoodCategories::CategoryId),
                    )
                    .foreign_key(&mut cascade(
                        "fk_mood_categories_mood",
                        MoodCategories::Table,
                        MoodCategories::MoodId,
                        Moods::Table,
                        Moods::Id,
                    ))
                    .foreign_key(&mut cascade(
                        "fk_mood_categories_category",
                        MoodCategories::Table,
                        MoodCategories::CategoryId,
                        Categories::Table,
                        Categories::Id,
                    ))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(FoodCategories::Table)
                    .if_not_exists()
                    .col(reference(FoodCategories::FoodId))
                    .col(reference(FoodCategories::CategoryId))
                    .primary_key(
                        Index::create()
                            .col(FoodCategories::FoodId)
                            .col(FoodCategories::CategoryId),
                    )
                    .foreign_key(&mut cascade(
                        "fk_food_categories_food",
                        FoodCategories::Table,
                        FoodCategories::FoodId,
                        Foods::Table,
                        Foods::Id,
                    ))
                    .foreign_key(&mut cascade(
                        "fk_food_categories_category",
                        FoodCategories::Table,
                        FoodCategories::CategoryId,
                        Categories::Table,
                        Categories::Id,
                    ))
                    .to_owned(),
            )
            .await?;

        tracing::info!("Journal tables created");
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(FoodCategories::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(MoodCategories::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(MoodTags::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(FoodEntries::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Foods::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Moods::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Tags::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Categories::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await
    }
}
