pub mod record;
pub mod summary;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::models::attendance::requests::{
    AttendanceQueryParams, AttendanceSummaryParams, RecordAttendanceRequest,
};

lazy_storage_service!(AttendanceService);

impl AttendanceService {
    pub async fn record_attendance(
        &self,
        req: RecordAttendanceRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        record::record_attendance(self, req, request).await
    }

    pub async fn list_attendance(
        &self,
        query: AttendanceQueryParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        record::list_attendance(self, query, request).await
    }

    pub async fn attendance_summary(
        &self,
        student_id: i64,
        query: AttendanceSummaryParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        summary::attendance_summary(self, student_id, query, request).await
    }
}
