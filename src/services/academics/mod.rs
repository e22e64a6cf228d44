pub mod trimesters;
pub mod years;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::models::academics::requests::{CreateAcademicYearRequest, CreateTrimesterRequest};

lazy_storage_service!(AcademicService);

impl AcademicService {
    pub async fn create_year(
        &self,
        req: CreateAcademicYearRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        years::create_year(self, req, request).await
    }

    pub async fn list_years(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        years::list_years(self, request).await
    }

    // 学年详情（含学期）
    pub async fn get_year(&self, year_id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        years::get_year(self, year_id, request).await
    }

    pub async fn set_current_year(
        &self,
        year_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        years::set_current_year(self, year_id, request).await
    }

    pub async fn create_trimester(
        &self,
        year_id: i64,
        req: CreateTrimesterRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        trimesters::create_trimester(self, year_id, req, request).await
    }

    pub async fn list_trimesters(
        &self,
        year_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        trimesters::list_trimesters(self, year_id, request).await
    }

    pub async fn get_active_trimester(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        trimesters::get_active_trimester(self, request).await
    }

    pub async fn activate_trimester(
        &self,
        trimester_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        trimesters::activate_trimester(self, trimester_id, request).await
    }

    pub async fn close_trimester(
        &self,
        trimester_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        trimesters::close_trimester(self, trimester_id, request).await
    }
}
