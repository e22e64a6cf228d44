use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{EnrollmentService, detail_response};

pub async fn get_enrollment(
    service: &EnrollmentService,
    enrollment_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    Ok(detail_response(&storage, enrollment_id, false, "Enrollment retrieved successfully").await)
}
