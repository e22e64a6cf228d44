use crate::models::treasury::responses::{TreasuryBalances, VerificationReport};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/backup.ts")]
pub struct BackupFile {
    pub name: String,
    pub rows: i64,
}

/// 备份清单，写入每个备份目录的 manifest.json
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/backup.ts")]
pub struct BackupManifest {
    pub name: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub created_by: i64,
    pub files: Vec<BackupFile>,
    pub treasury_consistent: bool,
}

/// treasury.json 的内容
#[derive(Debug, Clone, Serialize)]
pub struct TreasurySnapshot {
    pub balances: TreasuryBalances,
    pub verification: VerificationReport,
}
