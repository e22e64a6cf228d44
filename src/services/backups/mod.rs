pub mod create;
pub mod csv_export;
pub mod list;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

lazy_storage_service!(BackupService);

impl BackupService {
    pub async fn create_backup(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        create::create_backup(self, request).await
    }

    pub async fn list_backups(&self) -> ActixResult<HttpResponse> {
        list::list_backups().await
    }
}

/// 每个备份目录内的清单文件名
pub(crate) const MANIFEST_FILE: &str = "manifest.json";
