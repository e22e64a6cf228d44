//! 资金账本计算
//!
//! 账户余额只由流水推导：每条流水对 from 账户借记 amount、对 to 账户贷记 amount。
//! 这里的函数不访问数据库，存储层和核对接口共用。

use super::entities::{AccountKind, Movement, NewMovement};
use super::responses::{VerificationLine, VerificationReport};

/// 单笔流水与单项费用的上限（最小货币单位）
pub const MAX_AMOUNT: i64 = 1_000_000_000_000;

/// 三个账户的余额
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LedgerBalances {
    pub safe: i64,
    pub registry: i64,
    pub bank: i64,
}

impl LedgerBalances {
    pub fn get(&self, account: AccountKind) -> i64 {
        match account {
            AccountKind::Safe => self.safe,
            AccountKind::Registry => self.registry,
            AccountKind::Bank => self.bank,
        }
    }

    fn slot(&mut self, account: AccountKind) -> &mut i64 {
        match account {
            AccountKind::Safe => &mut self.safe,
            AccountKind::Registry => &mut self.registry,
            AccountKind::Bank => &mut self.bank,
        }
    }

    pub fn apply(&mut self, account: AccountKind, delta: i64) {
        let slot = self.slot(account);
        *slot = slot.saturating_add(delta);
    }

    pub fn total(&self) -> i64 {
        self.safe
            .saturating_add(self.registry)
            .saturating_add(self.bank)
    }

    pub fn from_pairs(pairs: &[(AccountKind, i64)]) -> Self {
        let mut balances = Self::default();
        for (account, balance) in pairs {
            *balances.slot(*account) = *balance;
        }
        balances
    }
}

/// 单条流水对各账户的余额变化
pub fn deltas(
    from_account: Option<AccountKind>,
    to_account: Option<AccountKind>,
    amount: i64,
) -> Vec<(AccountKind, i64)> {
    let mut out = Vec::with_capacity(2);
    if let Some(from) = from_account {
        out.push((from, -amount));
    }
    if let Some(to) = to_account {
        out.push((to, amount));
    }
    out
}

/// 校验一条待写入的流水
pub fn validate_movement(movement: &NewMovement) -> Result<(), String> {
    if movement.amount <= 0 {
        return Err("Amount must be greater than zero".to_string());
    }
    if movement.amount > MAX_AMOUNT {
        return Err(format!("Amount must not exceed {MAX_AMOUNT}"));
    }
    match (movement.from_account, movement.to_account) {
        (None, None) => Err("A movement must touch at least one account".to_string()),
        (Some(from), Some(to)) if from == to => {
            Err("Source and destination accounts must differ".to_string())
        }
        _ => Ok(()),
    }
}

/// 从零开始按时间顺序重放流水
pub fn replay<'a>(movements: impl IntoIterator<Item = &'a Movement>) -> LedgerBalances {
    let mut balances = LedgerBalances::default();
    for movement in movements {
        for (account, delta) in deltas(movement.from_account, movement.to_account, movement.amount) {
            balances.apply(account, delta);
        }
    }
    balances
}

/// 将存储的余额与重放结果逐个账户比对
pub fn verify(stored: LedgerBalances, movements: &[Movement]) -> VerificationReport {
    let replayed = replay(movements);
    let lines: Vec<VerificationLine> = AccountKind::ALL
        .iter()
        .map(|account| {
            let stored_balance = stored.get(*account);
            let replayed_balance = replayed.get(*account);
            VerificationLine {
                account: *account,
                stored: stored_balance,
                replayed: replayed_balance,
                difference: stored_balance.saturating_sub(replayed_balance),
            }
        })
        .collect();
    let consistent = lines.iter().all(|line| line.difference == 0);

    VerificationReport {
        lines,
        consistent,
        movement_count: movements.len() as i64,
        verified_at: chrono::Utc::now(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::treasury::entities::MovementKind;

    fn movement(
        kind: MovementKind,
        from: Option<AccountKind>,
        to: Option<AccountKind>,
        amount: i64,
    ) -> Movement {
        Movement {
            id: 0,
            kind,
            from_account: from,
            to_account: to,
            amount,
            payment_id: None,
            category: None,
            description: None,
            created_by: 1,
            created_at: chrono::Utc::now(),
        }
    }

    fn sample_ledger() -> Vec<Movement> {
        use AccountKind::*;
        vec![
            movement(MovementKind::Payment, None, Some(Registry), 50_000),
            movement(MovementKind::Payment, None, Some(Bank), 120_000),
            movement(MovementKind::Transfer, Some(Registry), Some(Safe), 30_000),
            movement(MovementKind::Expense, Some(Safe), None, 10_000),
            movement(MovementKind::PaymentReversal, Some(Bank), None, 20_000),
        ]
    }

    #[test]
    fn test_replay_sample_ledger() {
        let balances = replay(&sample_ledger());
        assert_eq!(balances.registry, 20_000);
        assert_eq!(balances.safe, 20_000);
        assert_eq!(balances.bank, 100_000);
        assert_eq!(balances.total(), 140_000);
    }

    #[test]
    fn test_transfer_conserves_total() {
        let mut ledger = sample_ledger();
        let before = replay(&ledger).total();
        ledger.push(movement(
            MovementKind::Transfer,
            Some(AccountKind::Bank),
            Some(AccountKind::Safe),
            75_000,
        ));
        assert_eq!(replay(&ledger).total(), before);
    }

    #[test]
    fn test_verify_detects_difference() {
        let ledger = sample_ledger();
        let stored = LedgerBalances {
            safe: 20_000,
            registry: 20_000,
            bank: 100_000,
        };
        let report = verify(stored, &ledger);
        assert!(report.consistent);
        assert_eq!(report.movement_count, 5);

        let tampered = LedgerBalances {
            bank: 90_000,
            ..stored
        };
        let report = verify(tampered, &ledger);
        assert!(!report.consistent);
        let bank = report
            .lines
            .iter()
            .find(|l| l.account == AccountKind::Bank)
            .unwrap();
        assert_eq!(bank.difference, -10_000);
        assert_eq!(bank.replayed, 100_000);
    }

    #[test]
    fn test_adjustment_sign_maps_to_side() {
        let credit = NewMovement::adjustment(AccountKind::Safe, 5_000, "count".into(), 1);
        assert_eq!(credit.to_account, Some(AccountKind::Safe));
        assert_eq!(credit.amount, 5_000);

        let debit = NewMovement::adjustment(AccountKind::Safe, -5_000, "count".into(), 1);
        assert_eq!(debit.from_account, Some(AccountKind::Safe));
        assert_eq!(debit.to_account, None);
        assert_eq!(debit.amount, 5_000);
        assert_eq!(
            deltas(debit.from_account, debit.to_account, debit.amount),
            vec![(AccountKind::Safe, -5_000)]
        );
    }

    #[test]
    fn test_validate_movement() {
        let same = NewMovement::transfer(AccountKind::Bank, AccountKind::Bank, 10, None, 1);
        assert!(validate_movement(&same).is_err());

        let zero = NewMovement::income(AccountKind::Safe, 0, None, 1);
        assert!(validate_movement(&zero).is_err());

        let ok = NewMovement::transfer(AccountKind::Registry, AccountKind::Bank, 10, None, 1);
        assert!(validate_movement(&ok).is_ok());
    }

    #[test]
    fn test_amount_upper_bound() {
        let at_cap = NewMovement::income(AccountKind::Bank, MAX_AMOUNT, None, 1);
        assert!(validate_movement(&at_cap).is_ok());

        let over = NewMovement::income(AccountKind::Bank, MAX_AMOUNT + 1, None, 1);
        assert!(validate_movement(&over).is_err());

        let extreme = NewMovement::adjustment(AccountKind::Safe, i64::MIN, "fix".into(), 1);
        assert_eq!(extreme.amount, i64::MAX);
        assert!(validate_movement(&extreme).is_err());
    }

    #[test]
    fn test_total_saturates() {
        let balances = LedgerBalances {
            safe: i64::MAX,
            registry: 1,
            bank: 1,
        };
        assert_eq!(balances.total(), i64::MAX);
    }

    #[test]
    fn test_from_pairs() {
        let balances = LedgerBalances::from_pairs(&[
            (AccountKind::Bank, 7),
            (AccountKind::Safe, 3),
        ]);
        assert_eq!(balances.get(AccountKind::Bank), 7);
        assert_eq!(balances.registry, 0);
        assert_eq!(balances.total(), 10);
    }
}
