use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::grading::requests::{
    AnnualResultsQueryParams, ComputeResultsRequest, CreateEvaluationRequest,
    CreateSubjectRequest, EvaluationQueryParams, RecordGradesRequest, ReportCardQueryParams,
    ResultsQueryParams, SubjectQueryParams, UpdateSubjectRequest,
};
use crate::models::users::entities::UserRole;
use crate::services::GradingService;
use crate::utils::SafeIDI64;

static GRADING_SERVICE: Lazy<GradingService> = Lazy::new(GradingService::new_lazy);

// 科目
pub async fn list_subjects(
    req: HttpRequest,
    query: web::Query<SubjectQueryParams>,
) -> ActixResult<HttpResponse> {
    GRADING_SERVICE.list_subjects(query.into_inner(), &req).await
}

pub async fn create_subject(
    req: HttpRequest,
    body: web::Json<CreateSubjectRequest>,
) -> ActixResult<HttpResponse> {
    GRADING_SERVICE.create_subject(body.into_inner(), &req).await
}

pub async fn update_subject(
    req: HttpRequest,
    subject_id: SafeIDI64,
    body: web::Json<UpdateSubjectRequest>,
) -> ActixResult<HttpResponse> {
    GRADING_SERVICE
        .update_subject(subject_id.0, body.into_inner(), &req)
        .await
}

pub async fn delete_subject(req: HttpRequest, subject_id: SafeIDI64) -> ActixResult<HttpResponse> {
    GRADING_SERVICE.delete_subject(subject_id.0, &req).await
}

// 评估与成绩
pub async fn list_evaluations(
    req: HttpRequest,
    query: web::Query<EvaluationQueryParams>,
) -> ActixResult<HttpResponse> {
    GRADING_SERVICE
        .list_evaluations(query.into_inner(), &req)
        .await
}

pub async fn create_evaluation(
    req: HttpRequest,
    body: web::Json<CreateEvaluationRequest>,
) -> ActixResult<HttpResponse> {
    GRADING_SERVICE
        .create_evaluation(body.into_inner(), &req)
        .await
}

pub async fn delete_evaluation(
    req: HttpRequest,
    evaluation_id: SafeIDI64,
) -> ActixResult<HttpResponse> {
    GRADING_SERVICE
        .delete_evaluation(evaluation_id.0, &req)
        .await
}

pub async fn list_grades(req: HttpRequest, evaluation_id: SafeIDI64) -> ActixResult<HttpResponse> {
    GRADING_SERVICE.list_grades(evaluation_id.0, &req).await
}

pub async fn record_grades(
    req: HttpRequest,
    evaluation_id: SafeIDI64,
    body: web::Json<RecordGradesRequest>,
) -> ActixResult<HttpResponse> {
    GRADING_SERVICE
        .record_grades(evaluation_id.0, body.into_inner(), &req)
        .await
}

// 结果
pub async fn compute_trimester_results(
    req: HttpRequest,
    body: web::Json<ComputeResultsRequest>,
) -> ActixResult<HttpResponse> {
    GRADING_SERVICE
        .compute_trimester_results(body.into_inner(), &req)
        .await
}

pub async fn list_trimester_results(
    req: HttpRequest,
    query: web::Query<ResultsQueryParams>,
) -> ActixResult<HttpResponse> {
    GRADING_SERVICE
        .list_trimester_results(query.into_inner(), &req)
        .await
}

pub async fn compute_annual_results(
    req: HttpRequest,
    query: web::Query<AnnualResultsQueryParams>,
) -> ActixResult<HttpResponse> {
    GRADING_SERVICE
        .compute_annual_results(query.into_inner(), &req)
        .await
}

pub async fn get_report_card(
    req: HttpRequest,
    query: web::Query<ReportCardQueryParams>,
) -> ActixResult<HttpResponse> {
    GRADING_SERVICE
        .get_report_card(query.into_inner(), &req)
        .await
}

// 配置路由
pub fn configure_grading_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/subjects")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("")
                    .route(web::get().to(list_subjects))
                    .route(
                        web::post()
                            .to(create_subject)
                            .wrap(middlewares::RequireRole::new_any(UserRole::registrar_roles())),
                    ),
            )
            .service(
                web::resource("/{id}")
                    .wrap(middlewares::RequireRole::new_any(UserRole::registrar_roles()))
                    .route(web::put().to(update_subject))
                    .route(web::delete().to(delete_subject)),
            ),
    );

    cfg.service(
        web::scope("/api/v1/evaluations")
            .wrap(middlewares::RequireRole::new_any(UserRole::academic_roles()))
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("")
                    .route(web::get().to(list_evaluations))
                    .route(web::post().to(create_evaluation)),
            )
            .route("/{id}", web::delete().to(delete_evaluation))
            .service(
                web::resource("/{id}/grades")
                    .route(web::get().to(list_grades))
                    .route(web::put().to(record_grades)),
            ),
    );

    cfg.service(
        web::scope("/api/v1/results")
            .wrap(middlewares::RequireRole::new_any(UserRole::academic_roles()))
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("/trimester")
                    .route(web::get().to(list_trimester_results))
                    .route(web::post().to(compute_trimester_results)),
            )
            .route("/annual", web::get().to(compute_annual_results))
            .route("/report-card", web::get().to(get_report_card)),
    );
}
