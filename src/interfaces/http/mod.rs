mod state;

pub use state::AppState;

use crate::application::check_profile;
use crate::domain::error::AppError;
use crate::domain::evaluation::EvaluationPanel;
use crate::domain::profile::{
    EmployeeProfile, Education, Gender, AGE_RANGE, DOCUMENTED_RULES, EXPERIENCE_RANGE,
    REQUIRED_COLUMNS,
};
use crate::domain::warning::WarningView;
use actix_cors::Cors;
use actix_web::http::header::{ContentDisposition, DispositionParam, DispositionType};
use actix_web::{dev::Server, get, post, web, App, HttpResponse, HttpServer, Responder};
use chrono::Local;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};

const DASHBOARD_HTML: &str = include_str!("../../../static/index.html");
const MAX_LOG_ENTRIES: usize = 100;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct LogEntry {
    pub time: String,
    pub level: String,
    pub source: String,
    pub message: String,
}

pub struct HttpState {
    pub app: Arc<AppState>,
    pub logs: Arc<Mutex<Vec<LogEntry>>>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionsResponse {
    pub ages: Vec<u32>,
    pub genders: Vec<&'static str>,
    pub educations: Vec<&'static str>,
    pub occupations: Vec<String>,
    pub experience: Vec<u32>,
    pub documented_rules: Vec<&'static str>,
    pub required_columns: Vec<&'static str>,
}

#[derive(Serialize)]
pub struct WarningsResponse {
    pub warnings: Vec<WarningView>,
}

#[derive(Serialize)]
pub struct ErrorBody {
    pub error: String,
    pub kind: &'static str,
}

/// JSON error body with a status that tells the page which panel message to
/// show. Every error is scoped to the request that raised it.
pub fn error_response(err: &AppError) -> HttpResponse {
    let body = ErrorBody {
        error: err.to_string(),
        kind: err.kind(),
    };
    match err {
        AppError::ValidationError(_) | AppError::ParseError(_) | AppError::MissingColumns(_) => {
            HttpResponse::BadRequest().json(body)
        }
        AppError::PredictionError(_) => HttpResponse::UnprocessableEntity().json(body),
        AppError::NotFound(_) | AppError::ArtifactMissing(_) => HttpResponse::NotFound().json(body),
        _ => HttpResponse::InternalServerError().json(body),
    }
}

#[get("/")]
async fn dashboard() -> impl Responder {
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(DASHBOARD_HTML)
}

#[get("/health")]
async fn health(data: web::Data<HttpState>) -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "ok",
        "model": data.app.model.name(),
        "occupations": data.app.occupations.len(),
    }))
}

#[get("/options")]
async fn options(data: web::Data<HttpState>) -> impl Responder {
    HttpResponse::Ok().json(OptionsResponse {
        ages: AGE_RANGE.collect(),
        genders: Gender::ALL.iter().map(Gender::as_str).collect(),
        educations: Education::ALL.iter().map(Education::as_str).collect(),
        occupations: data.app.occupations.as_slice().to_vec(),
        experience: EXPERIENCE_RANGE.collect(),
        documented_rules: DOCUMENTED_RULES.to_vec(),
        required_columns: REQUIRED_COLUMNS.to_vec(),
    })
}

#[post("/warnings")]
async fn warnings(req: web::Json<EmployeeProfile>) -> impl Responder {
    HttpResponse::Ok().json(WarningsResponse {
        warnings: check_profile(&req).into_iter().map(Into::into).collect(),
    })
}

#[post("/predict")]
async fn predict(data: web::Data<HttpState>, req: web::Json<EmployeeProfile>) -> impl Responder {
    add_log(
        &data.logs,
        "INFO",
        "Predict",
        &format!(
            "Predicting salary (age={} experience={} education={} occupation={})",
            req.age, req.experience, req.education, req.occupation
        ),
    );

    match data.app.single_prediction.execute(&req) {
        Ok(prediction) => HttpResponse::Ok().json(prediction),
        Err(e) => {
            add_log(
                &data.logs,
                "ERROR",
                "Predict",
                &format!("Prediction failed: {}", e),
            );
            error_response(&e)
        }
    }
}

async fn run_batch(
    data: &web::Data<HttpState>,
    body: web::Bytes,
) -> Result<crate::domain::prediction::BatchPrediction, AppError> {
    add_log(
        &data.logs,
        "INFO",
        "Batch",
        &format!("Batch upload received ({} bytes)", body.len()),
    );

    let app = data.app.clone();
    let result = web::block(move || app.batch_prediction.execute(&body))
        .await
        .map_err(|e| AppError::Internal(format!("Batch worker failed: {}", e)))
        .and_then(|inner| inner);

    match &result {
        Ok(batch) => add_log(
            &data.logs,
            "INFO",
            "Batch",
            &format!("Batch {} predicted {} rows", batch.batch_id, batch.row_count),
        ),
        Err(e) => add_log(
            &data.logs,
            "ERROR",
            "Batch",
            &format!("Batch prediction failed: {}", e),
        ),
    }
    result
}

#[post("/predict/batch")]
async fn predict_batch(data: web::Data<HttpState>, body: web::Bytes) -> impl Responder {
    match run_batch(&data, body).await {
        Ok(batch) => HttpResponse::Ok().json(batch),
        Err(e) => error_response(&e),
    }
}

#[post("/predict/batch/download")]
async fn download_batch(data: web::Data<HttpState>, body: web::Bytes) -> impl Responder {
    match run_batch(&data, body).await {
        Ok(batch) => HttpResponse::Ok()
            .content_type("text/csv; charset=utf-8")
            .insert_header(ContentDisposition {
                disposition: DispositionType::Attachment,
                parameters: vec![DispositionParam::Filename(batch.file_name)],
            })
            .body(batch.csv),
        Err(e) => error_response(&e),
    }
}

#[get("/evaluation")]
async fn evaluation(data: web::Data<HttpState>) -> impl Responder {
    let app = data.app.clone();
    let panel = match web::block(move || app.evaluation.execute()).await {
        Ok(panel) => panel,
        Err(e) => {
            return error_response(&AppError::Internal(format!(
                "Evaluation worker failed: {}",
                e
            )))
        }
    };

    match &panel {
        EvaluationPanel::Unavailable { missing, .. } => add_log(
            &data.logs,
            "WARN",
            "Evaluation",
            &format!("Evaluation images missing: {}", missing.join(", ")),
        ),
        EvaluationPanel::Partial { images, missing, .. } => add_log(
            &data.logs,
            "WARN",
            "Evaluation",
            &format!(
                "Showing {} evaluation images, missing: {}",
                images.len(),
                missing.join(", ")
            ),
        ),
        EvaluationPanel::Ready { .. } => {}
    }
    HttpResponse::Ok().json(panel)
}

#[get("/logs")]
async fn get_logs(data: web::Data<HttpState>) -> impl Responder {
    match data.logs.lock() {
        Ok(logs) => HttpResponse::Ok().json(&*logs),
        Err(_) => error_response(&AppError::Internal("log buffer poisoned".to_string())),
    }
}

pub fn add_log(logs: &Mutex<Vec<LogEntry>>, level: &str, source: &str, message: &str) {
    match level {
        "ERROR" => tracing::error!(source, "{}", message),
        "WARN" => tracing::warn!(source, "{}", message),
        _ => tracing::info!(source, "{}", message),
    }

    let entry = LogEntry {
        time: Local::now().format("%H:%M:%S").to_string(),
        level: level.to_string(),
        source: source.to_string(),
        message: message.to_string(),
    };
    // A poisoned buffer only loses the in-page history; tracing has the event
    if let Ok(mut logs) = logs.lock() {
        logs.push(entry);
        if logs.len() > MAX_LOG_ENTRIES {
            logs.remove(0);
        }
    }
}

/// Routes shared by the server and the handler tests.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(dashboard).service(
        web::scope("/api")
            .service(health)
            .service(options)
            .service(warnings)
            .service(predict)
            .service(predict_batch)
            .service(download_batch)
            .service(evaluation)
            .service(get_logs),
    );
}

pub fn start_server(app: Arc<AppState>, logs: Arc<Mutex<Vec<LogEntry>>>) -> std::io::Result<Server> {
    let host = app.config.server.host.clone();
    let port = app.config.server.port;
    let max_upload_bytes = app.config.server.max_upload_bytes;
    let state = web::Data::new(HttpState { app, logs });

    let server = HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .wrap(cors)
            .app_data(state.clone())
            .app_data(web::PayloadConfig::new(max_upload_bytes))
            .configure(configure)
    })
    .bind((host.as_str(), port))?
    .run();

    Ok(server)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::evaluation::EVALUATION_ARTIFACTS;
    use crate::infrastructure::artifact_store::ArtifactLayout;
    use crate::infrastructure::bootstrap::build_state;
    use crate::infrastructure::config::{AppConfig, ArtifactsConfig};
    use crate::infrastructure::model::linear::LinearPipelineModel;
    use crate::infrastructure::model::test_support::{ConstantModel, PoisonedModel};
    use crate::infrastructure::model::SharedModel;
    use crate::infrastructure::reference_data::ReferenceOccupations;
    use actix_web::http::StatusCode;
    use actix_web::test as actix_test;
    use serde_json::{json, Value};

    fn config_for(evaluation_dir: std::path::PathBuf) -> AppConfig {
        AppConfig {
            artifacts: ArtifactsConfig {
                evaluation_dir,
                ..ArtifactsConfig::default()
            },
            ..AppConfig::default()
        }
    }

    fn http_state(model: SharedModel, evaluation_dir: std::path::PathBuf) -> web::Data<HttpState> {
        http_state_with(model, config_for(evaluation_dir))
    }

    fn http_state_with(model: SharedModel, config: AppConfig) -> web::Data<HttpState> {
        let layout = ArtifactLayout::new(&config.artifacts);
        let occupations =
            ReferenceOccupations::from_values(["CEO", "Data Scientist", "Software Engineer"]);
        let app = build_state(config, layout, model, occupations);
        web::Data::new(HttpState {
            app: Arc::new(app),
            logs: Arc::new(Mutex::new(Vec::new())),
        })
    }

    fn empty_dir() -> std::path::PathBuf {
        let dir = std::env::temp_dir().join(format!("http-eval-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn profile_json(occupation: &str) -> Value {
        json!({
            "age": 30,
            "experience": 5,
            "gender": "Male",
            "education": "Bachelors",
            "occupation": occupation
        })
    }

    #[actix_web::test]
    async fn test_options_lists_inputs() {
        let state = http_state(Arc::new(ConstantModel::new(1.0)), empty_dir());
        let app = actix_test::init_service(App::new().app_data(state).configure(configure)).await;

        let req = actix_test::TestRequest::get().uri("/api/options").to_request();
        let body: Value = actix_test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["ages"].as_array().map(Vec::len), Some(48));
        assert_eq!(body["experience"].as_array().map(Vec::len), Some(41));
        assert_eq!(body["educations"][0], "10th");
        assert_eq!(body["occupations"][0], "CEO");
        assert_eq!(body["documentedRules"].as_array().map(Vec::len), Some(8));
    }

    #[actix_web::test]
    async fn test_warnings_endpoint() {
        let state = http_state(Arc::new(ConstantModel::new(1.0)), empty_dir());
        let app = actix_test::init_service(App::new().app_data(state).configure(configure)).await;

        let req = actix_test::TestRequest::post()
            .uri("/api/warnings")
            .set_json(json!({
                "age": 19,
                "experience": 4,
                "gender": "Female",
                "education": "10th",
                "occupation": "CEO"
            }))
            .to_request();
        let body: Value = actix_test::call_and_read_body_json(&app, req).await;

        let codes: Vec<&str> = body["warnings"]
            .as_array()
            .unwrap()
            .iter()
            .map(|w| w["code"].as_str().unwrap())
            .collect();
        assert_eq!(codes, vec!["ceo_requires_education", "experience_exceeds_age"]);
    }

    #[actix_web::test]
    async fn test_predict_formats_salary() {
        let state = http_state(Arc::new(ConstantModel::new(85000.0)), empty_dir());
        let app = actix_test::init_service(App::new().app_data(state).configure(configure)).await;

        let req = actix_test::TestRequest::post()
            .uri("/api/predict")
            .set_json(profile_json("Software Engineer"))
            .to_request();
        let body: Value = actix_test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["formatted"], "₹85,000.00");
        assert_eq!(body["notice"], "Prediction Complete!");
        assert_eq!(body["input"]["headers"][0], "Age");
    }

    #[actix_web::test]
    async fn test_predict_error_then_success_in_same_process() {
        let model = Arc::new(PoisonedModel {
            poison: "CEO".to_string(),
            value: 1000.0,
        });
        let state = http_state(model, empty_dir());
        let app = actix_test::init_service(App::new().app_data(state).configure(configure)).await;

        let req = actix_test::TestRequest::post()
            .uri("/api/predict")
            .set_json(profile_json("CEO"))
            .to_request();
        let resp = actix_test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body: Value = actix_test::read_body_json(resp).await;
        assert_eq!(body["kind"], "prediction");
        assert!(body["error"].as_str().unwrap().contains("unsupported occupation"));

        let req = actix_test::TestRequest::post()
            .uri("/api/predict")
            .set_json(profile_json("Data Scientist"))
            .to_request();
        let resp = actix_test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[actix_web::test]
    async fn test_predict_rejects_unknown_occupation() {
        let state = http_state(Arc::new(ConstantModel::new(1.0)), empty_dir());
        let app = actix_test::init_service(App::new().app_data(state).configure(configure)).await;

        let req = actix_test::TestRequest::post()
            .uri("/api/predict")
            .set_json(profile_json("Astronaut"))
            .to_request();
        let resp = actix_test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_batch_missing_columns() {
        let model = Arc::new(ConstantModel::new(1.0));
        let state = http_state(model.clone(), empty_dir());
        let app = actix_test::init_service(App::new().app_data(state).configure(configure)).await;

        let req = actix_test::TestRequest::post()
            .uri("/api/predict/batch")
            .insert_header(("Content-Type", "text/csv"))
            .set_payload("Age,Experience,Gender,Education\n30,5,Male,PhD\n")
            .to_request();
        let resp = actix_test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = actix_test::read_body_json(resp).await;
        assert_eq!(body["kind"], "missing_columns");
        assert_eq!(model.call_count(), 0);
    }

    #[actix_web::test]
    async fn test_batch_non_numeric_age_is_unprocessable() {
        let model = LinearPipelineModel::from_json(
            r#"{ "intercept": 20000.0, "numeric": [{ "column": "Age", "weight": 500.0 }] }"#,
        )
        .unwrap();
        let state = http_state(Arc::new(model), empty_dir());
        let app =
            actix_test::init_service(App::new().app_data(state.clone()).configure(configure)).await;

        let req = actix_test::TestRequest::post()
            .uri("/api/predict/batch")
            .insert_header(("Content-Type", "text/csv"))
            .set_payload("Age,Experience,Gender,Education,Occupation
thirty,5,Male,PhD,CEO
")
            .to_request();
        let resp = actix_test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body: Value = actix_test::read_body_json(resp).await;
        assert_eq!(body["kind"], "prediction");
        assert!(body["error"].as_str().unwrap().contains("Age"));

        let logs = state.logs.lock().unwrap();
        assert!(logs
            .iter()
            .any(|e| e.level == "ERROR" && e.source == "Batch"));
    }

    #[actix_web::test]
    async fn test_batch_download_is_csv_attachment() {
        let state = http_state(Arc::new(ConstantModel::new(42000.0)), empty_dir());
        let app = actix_test::init_service(App::new().app_data(state).configure(configure)).await;

        let req = actix_test::TestRequest::post()
            .uri("/api/predict/batch/download")
            .insert_header(("Content-Type", "text/csv"))
            .set_payload("Age,Experience,Gender,Education,Occupation\n30,5,Male,PhD,CEO\n41,9,Female,Masters,Nurse\n")
            .to_request();
        let resp = actix_test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let disposition = resp
            .headers()
            .get("content-disposition")
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        assert!(disposition.contains("predicted_salaries.csv"));

        let body = actix_test::read_body(resp).await;
        let text = std::str::from_utf8(&body).unwrap();
        assert_eq!(
            text,
            "Age,Experience,Gender,Education,Occupation,PredictedSalary\n30,5,Male,PhD,CEO,42000\n41,9,Female,Masters,Nurse,42000\n"
        );
    }

    #[actix_web::test]
    async fn test_evaluation_fallback_and_ready() {
        let dir = empty_dir();
        let state = http_state(Arc::new(ConstantModel::new(1.0)), dir.clone());
        let app = actix_test::init_service(App::new().app_data(state).configure(configure)).await;

        let req = actix_test::TestRequest::get().uri("/api/evaluation").to_request();
        let body: Value = actix_test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["status"], "unavailable");
        assert_eq!(body["missing"].as_array().map(Vec::len), Some(5));

        for artifact in EVALUATION_ARTIFACTS {
            image::RgbImage::new(2, 2)
                .save(dir.join(artifact.file_name))
                .unwrap();
        }
        let req = actix_test::TestRequest::get().uri("/api/evaluation").to_request();
        let body: Value = actix_test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["status"], "ready");
        assert_eq!(body["images"][0]["caption"], "R² Score");

        std::fs::remove_dir_all(&dir).ok();
    }

    #[actix_web::test]
    async fn test_partial_evaluation_is_logged() {
        let dir = empty_dir();
        image::RgbImage::new(2, 2)
            .save(dir.join(EVALUATION_ARTIFACTS[0].file_name))
            .unwrap();
        let mut config = config_for(dir.clone());
        config.evaluation.partial = true;
        let state = http_state_with(Arc::new(ConstantModel::new(1.0)), config);
        let app =
            actix_test::init_service(App::new().app_data(state.clone()).configure(configure)).await;

        let req = actix_test::TestRequest::get().uri("/api/evaluation").to_request();
        let body: Value = actix_test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["status"], "partial");
        assert_eq!(body["missing"].as_array().map(Vec::len), Some(4));

        let req = actix_test::TestRequest::get().uri("/api/logs").to_request();
        let logs: Value = actix_test::call_and_read_body_json(&app, req).await;
        let warning = logs
            .as_array()
            .unwrap()
            .iter()
            .find(|e| e["source"] == "Evaluation")
            .cloned()
            .unwrap();
        assert_eq!(warning["level"], "WARN");
        assert!(warning["message"]
            .as_str()
            .unwrap()
            .contains("residuals_plot.png"));

        std::fs::remove_dir_all(&dir).ok();
    }

    #[actix_web::test]
    async fn test_dashboard_page_served() {
        let state = http_state(Arc::new(ConstantModel::new(1.0)), empty_dir());
        let app = actix_test::init_service(App::new().app_data(state).configure(configure)).await;

        let req = actix_test::TestRequest::get().uri("/").to_request();
        let body = actix_test::call_and_read_body(&app, req).await;
        let html = std::str::from_utf8(&body).unwrap();
        assert!(html.contains("Employee Salary Prediction"));
        assert!(html.contains("Batch Prediction Error"));
    }

    #[test]
    fn test_log_buffer_is_bounded() {
        let logs = Mutex::new(Vec::new());
        for i in 0..(MAX_LOG_ENTRIES + 5) {
            add_log(&logs, "INFO", "Test", &format!("entry {}", i));
        }
        let logs = logs.lock().unwrap();
        assert_eq!(logs.len(), MAX_LOG_ENTRIES);
        assert_eq!(logs[0].message, "entry 5");
    }
}
