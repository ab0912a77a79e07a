// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use sea_orm_migration::prelude::*;

/// 人员档案及其子表的初始模式迁移
#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 1. Create persons table (No dependencies)
        manager
            .create_table(
                Table::create()
                    .table(Persons::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Persons::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Persons::FullName).string().not_null())
                    .col(ColumnDef::new(Persons::Age).string())
                    .col(ColumnDef::new(Persons::City).string())
                    .col(ColumnDef::new(Persons::Address).string())
                    .col(ColumnDef::new(Persons::PhoneNumber).string())
                    .col(ColumnDef::new(Persons::Birthday).string())
                    .col(ColumnDef::new(Persons::NationalId).string())
                    .col(ColumnDef::new(Persons::MaritalStatus).string())
                    .col(
                        ColumnDef::new(Persons::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        // Unique natural key: one stored profile per full name
        manager
            .create_index(
                Index::create()
                    .name("idx_persons_full_name")
                    .table(Persons::Table)
                    .col(Persons::FullName)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // 2. Create cohabitants table (Depends on Persons)
        manager
            .create_table(
                Table::create()
                    .table(Cohabitants::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Cohabitants::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Cohabitants::PersonId).uuid().not_null())
                    .col(ColumnDef::new(Cohabitants::Name).string().not_null())
                    .col(ColumnDef::new(Cohabitants::Age).string())
                    .col(
                        ColumnDef::new(Cohabitants::Position)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_cohabitants_person")
                            .from(Cohabitants::Table, Cohabitants::PersonId)
                            .to(Persons::Table, Persons::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_cohabitants_person")
                    .table(Cohabitants::Table)
                    .col(Cohabitants::PersonId)
                    .to_owned(),
            )
            .await?;

        // 3. Create vehicles table (Depends on Persons)
        manager
            .create_table(
                Table::create()
                    .table(Vehicles::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Vehicles::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Vehicles::PersonId).uuid().not_null())
                    .col(ColumnDef::new(Vehicles::MakeModel).string().not_null())
                    .col(ColumnDef::new(Vehicles::ModelYear).string())
                    .col(ColumnDef::new(Vehicles::Owner).string())
                    .col(ColumnDef::new(Vehicles::Registration).string())
                    .col(
                        ColumnDef::new(Vehicles::Position)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_vehicles_person")
                            .from(Vehicles::Table, Vehicles::PersonId)
                            .to(Persons::Table, Persons::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_vehicles_person")
                    .table(Vehicles::Table)
                    .col(Vehicles::PersonId)
                    .to_owned(),
            )
            .await?;

        // 4. Create company_engagements table (Depends on Persons)
        manager
            .create_table(
                Table::create()
                    .table(CompanyEngagements::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CompanyEngagements::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(CompanyEngagements::PersonId).uuid().not_null())
                    .col(
                        ColumnDef::new(CompanyEngagements::CompanyName)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(CompanyEngagements::PositionTitle).string())
                    .col(ColumnDef::new(CompanyEngagements::CompanyUrl).string())
                    .col(
                        ColumnDef::new(CompanyEngagements::Position)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_company_engagements_person")
                            .from(CompanyEngagements::Table, CompanyEngagements::PersonId)
                            .to(Persons::Table, Persons::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_company_engagements_person")
                    .table(CompanyEngagements::Table)
                    .col(CompanyEngagements::PersonId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(CompanyEngagements::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Vehicles::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Cohabitants::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Persons::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Persons {
    Table,
    Id,
    FullName,
    Age,
    City,
    Address,
    PhoneNumber,
    Birthday,
    NationalId,
    MaritalStatus,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Cohabitants {
    Table,
    Id,
    PersonId,
    Name,
    Age,
    Position,
}

#[derive(DeriveIden)]
enum Vehicles {
    Table,
    Id,
    PersonId,
    MakeModel,
    ModelYear,
    Owner,
    Registration,
    Position,
}

#[derive(DeriveIden)]
enum CompanyEngagements {
    Table,
    Id,
    PersonId,
    CompanyName,
    PositionTitle,
    CompanyUrl,
    Position,
}
