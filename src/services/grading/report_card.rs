use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{GradingService, calc, load_class, load_trimester};
use crate::config::AppConfig;
use crate::models::attendance::responses::AttendanceSummary;
use crate::models::grading::requests::ReportCardQueryParams;
use crate::models::grading::responses::ReportCard;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{conflict, internal_error, not_found};

/// 成绩单数据，PDF 由前端生成
pub async fn get_report_card(
    service: &GradingService,
    query: ReportCardQueryParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let student = match storage.get_student(query.student_id).await {
        Ok(Some(student)) => student,
        Ok(None) => return Ok(not_found(ErrorCode::StudentNotFound, "Student not found")),
        Err(e) => return Ok(internal_error("Failed to get student", &e)),
    };
    let trimester = match load_trimester(&storage, query.trimester_id).await {
        Ok(trimester) => trimester,
        Err(resp) => return Ok(resp),
    };
    // 以学生在该学年当前所在的班级为准
    let class_id = match storage
        .find_enrollment_for_year(student.id, trimester.academic_year_id)
        .await
    {
        Ok(Some(enrollment)) => enrollment.class_id,
        Ok(None) => {
            return Ok(not_found(
                ErrorCode::EnrollmentNotFound,
                "Student is not enrolled in this academic year",
            ));
        }
        Err(e) => return Ok(internal_error("Failed to get enrollment", &e)),
    };
    let result = match storage
        .get_student_trimester_result(student.id, class_id, trimester.id)
        .await
    {
        Ok(Some(result)) => result,
        Ok(None) => {
            return Ok(conflict(
                ErrorCode::ResultsNotComputed,
                "Results have not been computed for this student and trimester",
            ));
        }
        Err(e) => return Ok(internal_error("Failed to get result", &e)),
    };
    let class = match load_class(&storage, result.class_id).await {
        Ok(class) => class,
        Err(resp) => return Ok(resp),
    };
    let year_name = match storage.get_academic_year(trimester.academic_year_id).await {
        Ok(year) => year.map(|y| y.name).unwrap_or_default(),
        Err(e) => return Ok(internal_error("Failed to get academic year", &e)),
    };
    let class_results = match storage.list_trimester_results(class.id, trimester.id).await {
        Ok(results) => results,
        Err(e) => return Ok(internal_error("Failed to list class results", &e)),
    };
    let records = match storage
        .list_student_attendance(
            student.id,
            Some(trimester.start_date),
            Some(trimester.end_date),
        )
        .await
    {
        Ok(records) => records,
        Err(e) => return Ok(internal_error("Failed to list attendance", &e)),
    };

    let class_averages: Vec<Option<f64>> = class_results.iter().map(|r| r.average).collect();
    let graded: Vec<_> = result.subjects.iter().filter(|s| s.average.is_some()).collect();

    let card = ReportCard {
        school_name: AppConfig::get().app.system_name.clone(),
        academic_year: year_name,
        trimester: trimester.name.clone(),
        student_id: student.id,
        student_name: student.full_name(),
        matricule: student.matricule.clone(),
        class_name: class.name,
        total_coefficients: graded.iter().map(|s| s.coefficient).sum(),
        total_points: calc::round2(graded.iter().filter_map(|s| s.points).sum()),
        general_average: result.average,
        rank: result.rank,
        class_size: class_results.len() as i64,
        class_average: calc::class_average(&class_averages),
        mention: result.mention,
        attendance: AttendanceSummary::from_records(
            student.id,
            Some(trimester.start_date),
            Some(trimester.end_date),
            &records,
        ),
        subjects: result.subjects,
    };

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        card,
        "Report card generated successfully",
    )))
}
