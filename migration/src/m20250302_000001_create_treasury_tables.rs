use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // ==================== 资金账户表 ====================
        manager
            .create_table(
                Table::create()
                    .table(TreasuryAccounts::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(TreasuryAccounts::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(TreasuryAccounts::Kind)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(TreasuryAccounts::Balance)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(TreasuryAccounts::UpdatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // ==================== 缴费表 ====================
        manager
            .create_table(
                Table::create()
                    .table(Payments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Payments::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Payments::EnrollmentId).big_integer().not_null())
                    .col(
                        ColumnDef::new(Payments::ReceiptNumber)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Payments::Amount).big_integer().not_null())
                    .col(ColumnDef::new(Payments::Method).string().not_null())
                    .col(ColumnDef::new(Payments::Account).string().not_null())
                    .col(ColumnDef::new(Payments::Status).string().not_null())
                    .col(ColumnDef::new(Payments::Note).string().null())
                    .col(ColumnDef::new(Payments::CancelReason).string().null())
                    .col(ColumnDef::new(Payments::PaidAt).big_integer().not_null())
                    .col(ColumnDef::new(Payments::RecordedBy).big_integer().not_null())
                    .col(ColumnDef::new(Payments::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Payments::CancelledAt).big_integer().null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Payments::Table, Payments::EnrollmentId)
                            .to(Enrollments::Table, Enrollments::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        // ==================== 资金流水表 ====================
        manager
            .create_table(
                Table::create()
                    .table(TreasuryMovements::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(TreasuryMovements::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(TreasuryMovements::Kind).string().not_null())
                    .col(
                        ColumnDef::new(TreasuryMovements::FromAccount)
                            .string()
                            .null(),
                    )
                    .col(ColumnDef::new(TreasuryMovements::ToAccount).string().null())
                    .col(
                        ColumnDef::new(TreasuryMovements::Amount)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(TreasuryMovements::PaymentId)
                            .big_integer()
                            .null(),
                    )
                    .col(ColumnDef::new(TreasuryMovements::Category).string().null())
                    .col(
                        ColumnDef::new(TreasuryMovements::Description)
                            .string()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(TreasuryMovements::CreatedBy)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(TreasuryMovements::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(TreasuryMovements::Table, TreasuryMovements::PaymentId)
                            .to(Payments::Table, Payments::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_payments_enrollment_id")
                    .table(Payments::Table)
                    .col(Payments::EnrollmentId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_payments_paid_at")
                    .table(Payments::Table)
                    .col(Payments::PaidAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_treasury_movements_created_at")
                    .table(TreasuryMovements::Table)
                    .col(TreasuryMovements::CreatedAt)
                    .to_owned(),
            )
            .await?;

        // ==================== 初始化三个账户 ====================
        let now = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_secs() as i64;

        for kind in ["safe", "registry", "bank"] {
            let insert = Query::insert()
                .into_table(TreasuryAccounts::Table)
                .columns([
                    TreasuryAccounts::Kind,
                    TreasuryAccounts::Balance,
                    TreasuryAccounts::UpdatedAt,
                ])
                .values_panic([kind.into(), 0i64.into(), now.into()])
                .to_owned();

            manager.exec_stmt(insert).await?;
        }

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(TreasuryMovements::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Payments::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(TreasuryAccounts::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Enrollments {
    #[sea_orm(iden = "enrollments")]
    Table,
    Id,
}

#[derive(DeriveIden)]
enum TreasuryAccounts {
    #[sea_orm(iden = "treasury_accounts")]
    Table,
    Id,
    Kind,
    Balance,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Payments {
    #[sea_orm(iden = "payments")]
    Table,
    Id,
    EnrollmentId,
    ReceiptNumber,
    Amount,
    Method,
    Account,
    Status,
    Note,
    CancelReason,
    PaidAt,
    RecordedBy,
    CreatedAt,
    CancelledAt,
}

#[derive(DeriveIden)]
enum TreasuryMovements {
    #[sea_orm(iden = "treasury_movements")]
    Table,
    Id,
    Kind,
    FromAccount,
    ToAccount,
    Amount,
    PaymentId,
    Category,
    Description,
    CreatedBy,
    CreatedAt,
}
