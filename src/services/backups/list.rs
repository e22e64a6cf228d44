use actix_web::{HttpResponse, Result as ActixResult};
use std::path::Path;
use tracing::warn;

use super::MANIFEST_FILE;
use crate::config::AppConfig;
use crate::errors::Result;
use crate::models::ApiResponse;
use crate::models::backups::entities::BackupManifest;
use crate::services::internal_error;

/// 读取备份根目录下所有清单，最新的在前
///
/// 没有清单或清单无法解析的目录会被跳过。
pub(crate) async fn read_manifests(root: &Path) -> Result<Vec<BackupManifest>> {
    if !tokio::fs::try_exists(root).await? {
        return Ok(Vec::new());
    }

    let mut manifests = Vec::new();
    let mut entries = tokio::fs::read_dir(root).await?;
    while let Some(entry) = entries.next_entry().await? {
        if !entry.file_type().await?.is_dir() {
            continue;
        }
        let path = entry.path().join(MANIFEST_FILE);
        let raw = match tokio::fs::read(&path).await {
            Ok(raw) => raw,
            Err(_) => continue,
        };
        match serde_json::from_slice::<BackupManifest>(&raw) {
            Ok(manifest) => manifests.push(manifest),
            Err(e) => warn!("Skipping unreadable manifest {}: {}", path.display(), e),
        }
    }

    manifests.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    Ok(manifests)
}

pub async fn list_backups() -> ActixResult<HttpResponse> {
    let root = AppConfig::get().backup.dir.clone();
    match read_manifests(Path::new(&root)).await {
        Ok(manifests) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            manifests,
            "Backups retrieved successfully",
        ))),
        Err(e) => Ok(internal_error("Failed to list backups", &e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::backups::entities::BackupFile;

    fn manifest(name: &str, minutes_ago: i64) -> BackupManifest {
        BackupManifest {
            name: name.to_string(),
            created_at: chrono::Utc::now() - chrono::Duration::minutes(minutes_ago),
            created_by: 1,
            files: vec![BackupFile {
                name: "students.csv".to_string(),
                rows: 2,
            }],
            treasury_consistent: true,
        }
    }

    #[actix_web::test]
    async fn test_read_manifests_newest_first() {
        let root = std::env::temp_dir().join(format!("schoolsys-backups-{}", uuid::Uuid::new_v4()));
        for (name, age) in [("older", 30), ("newer", 5)] {
            let dir = root.join(name);
            tokio::fs::create_dir_all(&dir).await.unwrap();
            let json = serde_json::to_vec(&manifest(name, age)).unwrap();
            tokio::fs::write(dir.join(MANIFEST_FILE), json).await.unwrap();
        }
        // 没有清单的目录被忽略
        tokio::fs::create_dir_all(root.join("partial")).await.unwrap();

        let manifests = read_manifests(&root).await.unwrap();
        let names: Vec<&str> = manifests.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["newer", "older"]);

        tokio::fs::remove_dir_all(&root).await.unwrap();
    }

    #[actix_web::test]
    async fn test_missing_root_is_empty() {
        let root = std::env::temp_dir().join(format!("schoolsys-none-{}", uuid::Uuid::new_v4()));
        assert!(read_manifests(&root).await.unwrap().is_empty());
    }
}
