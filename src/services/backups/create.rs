use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};

use super::{BackupService, MANIFEST_FILE, csv_export};
use crate::config::AppConfig;
use crate::errors::{Result, SchoolSysError};
use crate::models::backups::entities::{BackupFile, BackupManifest, TreasurySnapshot};
use crate::models::treasury::responses::TreasuryBalances;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::treasury::verify::build_report;
use crate::services::{current_user_id, error_response};
use crate::storage::Storage;

/// 备份目录名，按时间排序即按名称排序
pub(crate) fn backup_name(now: chrono::DateTime<chrono::Utc>) -> String {
    now.format("%Y%m%d-%H%M%S").to_string()
}

/// 行数超过上限的表拒绝导出，备份不允许静默缺数据
///
/// 调用方按 `limit + 1` 取数，多出的一行即表示超限。
pub(crate) fn check_row_cap<T>(table: &str, rows: Vec<T>, limit: u64) -> Result<Vec<T>> {
    if rows.len() as u64 > limit {
        return Err(SchoolSysError::conflict(format!(
            "Table '{table}' has more than {limit} rows; raise backup.max_rows to back it up"
        )));
    }
    Ok(rows)
}

/// 在备份根目录下新建本次备份目录，同名目录已存在时返回冲突
///
/// `create_dir` 本身是原子的，两个同一秒的请求只有一个能拿到目录。
pub(crate) async fn create_backup_dir(root: &Path, name: &str) -> Result<PathBuf> {
    tokio::fs::create_dir_all(root).await?;
    let dir = root.join(name);
    match tokio::fs::create_dir(&dir).await {
        Ok(()) => Ok(dir),
        Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => Err(
            SchoolSysError::conflict(format!("Backup '{name}' already exists")),
        ),
        Err(e) => Err(e.into()),
    }
}

async fn write_file(dir: &Path, name: &str, data: &[u8], rows: i64) -> Result<BackupFile> {
    tokio::fs::write(dir.join(name), data).await?;
    Ok(BackupFile {
        name: name.to_string(),
        rows,
    })
}

async fn write_backup(
    storage: &Arc<dyn Storage>,
    dir: &Path,
    name: String,
    created_by: i64,
) -> Result<BackupManifest> {
    let config = AppConfig::get();
    let limit = config.backup.max_rows;
    let fetch = limit.saturating_add(1);

    let report = build_report(storage).await?;
    let balances = storage.get_treasury_balances().await?;
    let snapshot = TreasurySnapshot {
        balances: TreasuryBalances::new(balances, config.treasury.currency.clone()),
        verification: report.clone(),
    };

    let students = check_row_cap("students", storage.export_students(fetch).await?, limit)?;
    let enrollments =
        check_row_cap("enrollments", storage.export_enrollments(fetch).await?, limit)?;
    let payments = check_row_cap("payments", storage.export_payments(fetch).await?, limit)?;
    let movements = check_row_cap("movements", storage.list_all_movements().await?, limit)?;

    let mut files = Vec::with_capacity(5);
    let json = serde_json::to_vec_pretty(&snapshot)?;
    files.push(write_file(dir, "treasury.json", &json, report.lines.len() as i64).await?);

    let (data, rows) = csv_export::students_csv(&students)?;
    files.push(write_file(dir, "students.csv", &data, rows).await?);
    let (data, rows) = csv_export::enrollments_csv(&enrollments)?;
    files.push(write_file(dir, "enrollments.csv", &data, rows).await?);
    let (data, rows) = csv_export::payments_csv(&payments)?;
    files.push(write_file(dir, "payments.csv", &data, rows).await?);
    let (data, rows) = csv_export::movements_csv(&movements)?;
    files.push(write_file(dir, "movements.csv", &data, rows).await?);

    let manifest = BackupManifest {
        name,
        created_at: chrono::Utc::now(),
        created_by,
        files,
        treasury_consistent: report.consistent,
    };
    tokio::fs::write(dir.join(MANIFEST_FILE), serde_json::to_vec_pretty(&manifest)?).await?;

    Ok(manifest)
}

pub async fn create_backup(
    service: &BackupService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let uid = match current_user_id(request) {
        Ok(id) => id,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request);

    let name = backup_name(chrono::Utc::now());
    let root = PathBuf::from(&AppConfig::get().backup.dir);
    let dir = match create_backup_dir(&root, &name).await {
        Ok(dir) => dir,
        Err(e) => {
            return Ok(error_response(
                &e,
                ErrorCode::BackupFailed,
                "Failed to create backup directory",
            ));
        }
    };

    match write_backup(&storage, &dir, name, uid).await {
        Ok(manifest) => {
            if !manifest.treasury_consistent {
                warn!("Backup {} taken while the treasury ledger is inconsistent", manifest.name);
            }
            info!("Backup {} created by user {}", manifest.name, uid);
            Ok(HttpResponse::Created().json(ApiResponse::success(
                manifest,
                "Backup created successfully",
            )))
        }
        Err(e) => {
            // 不保留写了一半的目录
            if let Err(cleanup) = tokio::fs::remove_dir_all(&dir).await {
                warn!("Failed to remove incomplete backup {}: {}", dir.display(), cleanup);
            }
            Ok(error_response(&e, ErrorCode::BackupFailed, "Backup failed"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_backup_name() {
        let at = chrono::Utc.with_ymd_and_hms(2025, 1, 7, 18, 4, 9).unwrap();
        assert_eq!(backup_name(at), "20250107-180409");
    }

    #[test]
    fn test_row_cap_refuses_oversized_tables() {
        assert_eq!(check_row_cap("students", vec![1, 2, 3], 3).unwrap().len(), 3);
        assert!(check_row_cap::<i32>("payments", vec![], 0).is_ok());

        let err = check_row_cap("movements", vec![1, 2, 3], 2).unwrap_err();
        assert!(matches!(err, SchoolSysError::Conflict(_)));
        assert!(err.to_string().contains("movements"));
    }

    #[actix_web::test]
    async fn test_same_name_backup_dir_conflicts() {
        let root = std::env::temp_dir()
            .join(format!("schoolsys-create-{}", uuid::Uuid::new_v4()))
            .join("nested");

        let dir = create_backup_dir(&root, "20250107-180409").await.unwrap();
        tokio::fs::write(dir.join(MANIFEST_FILE), b"{}").await.unwrap();

        let second = create_backup_dir(&root, "20250107-180409").await;
        assert!(matches!(second, Err(SchoolSysError::Conflict(_))));
        // 冲突的一方不能动已有目录
        assert!(tokio::fs::try_exists(dir.join(MANIFEST_FILE)).await.unwrap());

        tokio::fs::remove_dir_all(root.parent().unwrap()).await.unwrap();
    }
}
