//! 资金账户与流水存储操作
//!
//! 余额更新均为带条件的单条 UPDATE（balance + Δ >= 0），与流水写入处于同一事务。

use super::{SeaOrmStorage, day_end_exclusive, day_start, db_err};
use crate::entity::treasury_accounts::{
    ActiveModel as AccountActiveModel, Column as AccountColumn, Entity as TreasuryAccounts,
};
use crate::entity::treasury_movements::{ActiveModel, Column, Entity as TreasuryMovements};
use crate::errors::{Result, SchoolSysError};
use crate::models::{
    PaginatedResponse, PaginationInfo,
    common::pagination::normalize_page,
    treasury::{
        entities::{AccountKind, Movement, NewMovement},
        ledger::{self, LedgerBalances},
        requests::MovementListQuery,
    },
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
    sea_query::{Expr, ExprTrait},
};

/// 按 delta 更新单个账户余额，借记时要求余额足够
pub(super) async fn change_balance<C: ConnectionTrait>(
    conn: &C,
    account: AccountKind,
    delta: i64,
    now: i64,
) -> Result<()> {
    let mut update = TreasuryAccounts::update_many()
        .col_expr(AccountColumn::Balance, Expr::col(AccountColumn::Balance).add(delta))
        .col_expr(AccountColumn::UpdatedAt, Expr::value(now))
        .filter(AccountColumn::Kind.eq(account.as_str()));

    if delta < 0 {
        update = update.filter(AccountColumn::Balance.gte(-delta));
    }

    let result = update
        .exec(conn)
        .await
        .map_err(db_err("更新账户余额失败"))?;

    if result.rows_affected == 0 {
        return Err(if delta < 0 {
            SchoolSysError::insufficient_funds(format!(
                "Account '{account}' cannot cover {}",
                -delta
            ))
        } else {
            SchoolSysError::not_found(format!("Treasury account '{account}' is missing"))
        });
    }

    Ok(())
}

/// 在给定连接（通常是事务）上执行一条流水：先借记，再贷记，最后写流水
pub(super) async fn apply_movement_on<C: ConnectionTrait>(
    conn: &C,
    movement: NewMovement,
) -> Result<Movement> {
    ledger::validate_movement(&movement).map_err(SchoolSysError::validation)?;

    let now = chrono::Utc::now().timestamp();
    let mut changes = ledger::deltas(movement.from_account, movement.to_account, movement.amount);
    changes.sort_by_key(|(_, delta)| *delta);
    for (account, delta) in changes {
        change_balance(conn, account, delta, now).await?;
    }

    let model = ActiveModel {
        kind: Set(movement.kind.to_string()),
        from_account: Set(movement.from_account.map(|a| a.to_string())),
        to_account: Set(movement.to_account.map(|a| a.to_string())),
        amount: Set(movement.amount),
        payment_id: Set(movement.payment_id),
        category: Set(movement.category),
        description: Set(movement.description),
        created_by: Set(movement.created_by),
        created_at: Set(now),
        ..Default::default()
    };

    let result = model
        .insert(conn)
        .await
        .map_err(db_err("写入资金流水失败"))?;

    Ok(result.into_movement())
}

impl SeaOrmStorage {
    /// 读取三个账户余额
    pub async fn get_treasury_balances_impl(&self) -> Result<LedgerBalances> {
        let accounts = TreasuryAccounts::find()
            .all(&self.db)
            .await
            .map_err(db_err("查询账户余额失败"))?;

        let pairs: Vec<(AccountKind, i64)> = accounts
            .into_iter()
            .filter_map(|a| a.kind.parse::<AccountKind>().ok().map(|k| (k, a.balance)))
            .collect();

        Ok(LedgerBalances::from_pairs(&pairs))
    }

    /// 补齐缺失的账户
    pub async fn ensure_treasury_accounts_impl(&self) -> Result<()> {
        let now = chrono::Utc::now().timestamp();

        for kind in AccountKind::ALL {
            let existing = TreasuryAccounts::find()
                .filter(AccountColumn::Kind.eq(kind.as_str()))
                .one(&self.db)
                .await
                .map_err(db_err("查询账户失败"))?;

            if existing.is_none() {
                AccountActiveModel {
                    kind: Set(kind.to_string()),
                    balance: Set(0),
                    updated_at: Set(now),
                    ..Default::default()
                }
                .insert(&self.db)
                .await
                .map_err(db_err("创建账户失败"))?;
                tracing::info!("Treasury account '{}' created", kind);
            }
        }

        Ok(())
    }

    /// 在独立事务中执行一条流水
    pub async fn apply_movement_impl(&self, movement: NewMovement) -> Result<Movement> {
        let txn = self.db.begin().await.map_err(db_err("开启事务失败"))?;
        let result = apply_movement_on(&txn, movement).await?;
        txn.commit().await.map_err(db_err("提交事务失败"))?;
        Ok(result)
    }

    /// 分页列出流水
    pub async fn list_movements_with_pagination_impl(
        &self,
        query: MovementListQuery,
    ) -> Result<PaginatedResponse<Movement>> {
        let (page, size) = normalize_page(query.page, query.size);

        let mut select = TreasuryMovements::find();

        if let Some(account) = query.account {
            select = select.filter(
                Condition::any()
                    .add(Column::FromAccount.eq(account.as_str()))
                    .add(Column::ToAccount.eq(account.as_str())),
            );
        }
        if let Some(kind) = query.kind {
            select = select.filter(Column::Kind.eq(kind.as_str()));
        }
        if let Some(from) = query.from {
            select = select.filter(Column::CreatedAt.gte(day_start(from)));
        }
        if let Some(to) = query.to {
            select = select.filter(Column::CreatedAt.lt(day_end_exclusive(to)));
        }

        select = select.order_by_desc(Column::Id);

        let paginator = select.paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(db_err("查询流水总数失败"))?;

        let movements = paginator
            .fetch_page(page - 1)
            .await
            .map_err(db_err("查询流水列表失败"))?;

        Ok(PaginatedResponse {
            items: movements.into_iter().map(|m| m.into_movement()).collect(),
            pagination: PaginationInfo::new(page, size, total),
        })
    }

    /// 全部流水，按写入顺序
    pub async fn list_all_movements_impl(&self) -> Result<Vec<Movement>> {
        let movements = TreasuryMovements::find()
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(db_err("查询流水失败"))?;

        Ok(movements.into_iter().map(|m| m.into_movement()).collect())
    }
}
