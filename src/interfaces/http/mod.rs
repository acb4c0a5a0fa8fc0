use crate::application::{ImportPreview, QuestionImportUseCase};
use crate::domain::error::AppError;
use crate::domain::question::{
    ImportContext, QuestionRecord, Skill, TestModule, DEFAULT_PART_NUMBER,
};
use crate::domain::submission::SubmissionTarget;
use crate::infrastructure::config::ServerConfig;
use actix_cors::Cors;
use actix_web::{dev::Server, get, post, web, App, HttpResponse, HttpServer, Responder};
use chrono::Local;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::{Arc, Mutex};

const MAX_LOG_ENTRIES: usize = 100;
const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct LogEntry {
    pub time: String,
    pub level: String,
    pub source: String,
    pub message: String,
}

pub struct HttpState {
    pub import_use_case: Arc<QuestionImportUseCase>,
    pub logs: Arc<Mutex<Vec<LogEntry>>>,
}

#[derive(Deserialize)]
pub struct PreviewRequest {
    pub content: String,
    #[serde(flatten)]
    pub context: ImportContext,
}

#[derive(Deserialize)]
pub struct ImportRequest {
    pub content: String,
    #[serde(flatten)]
    pub context: ImportContext,
    pub test_id: String,
    pub test_type: String,
}

#[derive(Deserialize)]
pub struct SubmitRequest {
    pub test_id: String,
    pub test_type: String,
    /// Taken from the reviewed questions when absent
    #[serde(default)]
    pub part_number: Option<u32>,
    #[serde(default)]
    pub module: TestModule,
    pub questions: Vec<QuestionRecord>,
}

impl SubmitRequest {
    fn into_parts(self) -> (SubmissionTarget, Vec<QuestionRecord>) {
        let part_number = self
            .part_number
            .or_else(|| self.questions.first().map(|q| q.part_number))
            .unwrap_or(DEFAULT_PART_NUMBER);
        let target = SubmissionTarget {
            test_id: self.test_id,
            test_type: self.test_type,
            part_number,
            module: self.module,
        };
        (target, self.questions)
    }
}

#[derive(Deserialize)]
pub struct QuestionTypesQuery {
    #[serde(default)]
    pub module: TestModule,
    pub skill: Skill,
}

#[post("/questions/preview")]
async fn preview_questions(
    data: web::Data<HttpState>,
    req: web::Json<PreviewRequest>,
) -> impl Responder {
    let PreviewRequest { content, context } = req.into_inner();
    add_log(
        &data.logs,
        "INFO",
        "Importer",
        &format!(
            "Previewing {} {} questions ({} bytes)",
            context.module,
            context.skill,
            content.len()
        ),
    );

    match data.import_use_case.preview(&content, context) {
        Ok(parsed) => preview_response(&data.logs, parsed),
        Err(e) => error_response(&data.logs, "Preview failed", &e),
    }
}

#[post("/questions/preview/raw")]
async fn preview_raw(
    data: web::Data<HttpState>,
    query: web::Query<ImportContext>,
    body: web::Bytes,
) -> impl Responder {
    let context = query.into_inner();
    add_log(
        &data.logs,
        "INFO",
        "Importer",
        &format!(
            "Previewing uploaded {} {} file ({} bytes)",
            context.module,
            context.skill,
            body.len()
        ),
    );

    match data.import_use_case.preview_bytes(&body, context) {
        Ok(parsed) => preview_response(&data.logs, parsed),
        Err(e) => error_response(&data.logs, "Preview failed", &e),
    }
}

#[post("/questions/import")]
async fn import_questions(
    data: web::Data<HttpState>,
    req: web::Json<ImportRequest>,
) -> impl Responder {
    let ImportRequest {
        content,
        context,
        test_id,
        test_type,
    } = req.into_inner();
    add_log(
        &data.logs,
        "INFO",
        "Importer",
        &format!("Importing {} {} questions into {}", context.module, context.skill, test_id),
    );

    match data
        .import_use_case
        .import(&content, context, test_id, test_type)
        .await
    {
        Ok(receipt) => {
            add_log(
                &data.logs,
                "INFO",
                "Importer",
                &format!("Stored {} questions ({})", receipt.stored, receipt.backend),
            );
            HttpResponse::Ok().json(receipt)
        }
        Err(e) => error_response(&data.logs, "Import failed", &e),
    }
}

#[post("/questions/submit")]
async fn submit_questions(
    data: web::Data<HttpState>,
    req: web::Json<SubmitRequest>,
) -> impl Responder {
    let (target, questions) = req.into_inner().into_parts();
    add_log(
        &data.logs,
        "INFO",
        "Importer",
        &format!(
            "Submitting {} reviewed questions into {} part {}",
            questions.len(),
            target.test_id,
            target.part_number
        ),
    );

    match data.import_use_case.confirm(target, questions).await {
        Ok(receipt) => {
            add_log(
                &data.logs,
                "INFO",
                "Importer",
                &format!("Stored {} questions ({})", receipt.stored, receipt.backend),
            );
            HttpResponse::Ok().json(receipt)
        }
        Err(e) => error_response(&data.logs, "Submit failed", &e),
    }
}

#[get("/question-types")]
async fn question_types(
    data: web::Data<HttpState>,
    query: web::Query<QuestionTypesQuery>,
) -> impl Responder {
    HttpResponse::Ok().json(data.import_use_case.question_types(query.module, query.skill))
}

#[get("/templates/{skill}")]
async fn download_template(data: web::Data<HttpState>, path: web::Path<String>) -> impl Responder {
    let skill = match path.parse::<Skill>() {
        Ok(skill) => skill,
        Err(e) => return error_response(&data.logs, "Template failed", &AppError::ValidationError(e)),
    };

    match data.import_use_case.sample_template(skill) {
        Ok(template) => HttpResponse::Ok()
            .content_type("text/csv; charset=utf-8")
            .insert_header((
                "Content-Disposition",
                format!("attachment; filename=\"{}\"", template.file_name),
            ))
            .body(template.content),
        Err(e) => error_response(&data.logs, "Template failed", &e),
    }
}

#[get("/logs")]
async fn get_logs(data: web::Data<HttpState>) -> impl Responder {
    match data.logs.lock() {
        Ok(logs) => HttpResponse::Ok().json(&*logs),
        Err(_) => HttpResponse::InternalServerError().body("Activity log unavailable"),
    }
}

fn preview_response(logs: &Mutex<Vec<LogEntry>>, parsed: ImportPreview) -> HttpResponse {
    add_log(
        logs,
        "INFO",
        "Importer",
        &format!("Parsed {} questions", parsed.count),
    );
    HttpResponse::Ok().json(parsed)
}

/// Log the failure and map it to a status code
fn error_response(logs: &Mutex<Vec<LogEntry>>, action: &str, err: &AppError) -> HttpResponse {
    add_log(logs, "ERROR", "Importer", &format!("{}: {}", action, err));

    match err {
        AppError::Import(import_err) => HttpResponse::UnprocessableEntity().json(json!({
            "error": import_err.kind(),
            "message": import_err.to_string(),
            "detail": import_err,
        })),
        AppError::ValidationError(_) => HttpResponse::BadRequest().json(json!({
            "error": "validation_error",
            "message": err.to_string(),
        })),
        AppError::DatabaseError(_) => HttpResponse::BadGateway().json(json!({
            "error": "storage_error",
            "message": err.to_string(),
        })),
        AppError::UploadError { details, .. } => HttpResponse::BadGateway().json(json!({
            "error": "upload_error",
            "message": err.to_string(),
            "details": details,
        })),
        _ => HttpResponse::InternalServerError().json(json!({
            "error": "internal_error",
            "message": err.to_string(),
        })),
    }
}

pub fn add_log_entry(
    logs: &Mutex<Vec<LogEntry>>,
    level: &str,
    source: &str,
    message: &str,
) -> LogEntry {
    let entry = LogEntry {
        time: Local::now().format("%H:%M:%S").to_string(),
        level: level.to_string(),
        source: source.to_string(),
        message: message.to_string(),
    };
    if let Ok(mut logs) = logs.lock() {
        logs.push(entry.clone());
        if logs.len() > MAX_LOG_ENTRIES {
            logs.remove(0);
        }
    }
    entry
}

pub fn add_log(logs: &Mutex<Vec<LogEntry>>, level: &str, source: &str, message: &str) {
    add_log_entry(logs, level, source, message);
}

/// Mount the `/api` scope
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .app_data(web::JsonConfig::default().limit(MAX_UPLOAD_BYTES))
            .app_data(web::PayloadConfig::new(MAX_UPLOAD_BYTES))
            .service(preview_questions)
            .service(preview_raw)
            .service(import_questions)
            .service(submit_questions)
            .service(question_types)
            .service(download_template)
            .service(get_logs),
    );
}

pub fn start_server(
    import_use_case: Arc<QuestionImportUseCase>,
    logs: Arc<Mutex<Vec<LogEntry>>>,
    config: &ServerConfig,
) -> std::io::Result<Server> {
    let state = web::Data::new(HttpState {
        import_use_case,
        logs,
    });

    let server = HttpServer::new(move || {
        let cors = Cors::permissive(); // Allow all origins for the admin UI

        App::new()
            .wrap(cors)
            .app_data(state.clone())
            .configure(configure_api)
    })
    .bind((config.host.as_str(), config.port))?
    .run();

    Ok(server)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::error::Result;
    use crate::domain::submission::{SubmissionBatch, SubmissionReceipt};
    use crate::infrastructure::config::ImporterConfig;
    use crate::infrastructure::registry::CatalogRegistry;
    use crate::infrastructure::submission::QuestionSubmitter;
    use actix_web::{http::StatusCode, test as actix_test};
    use async_trait::async_trait;

    const HEADER: &str =
        "Question Number,Section,Type,Question Text,Choices,Correct Answer,Explanation";

    struct CountingSubmitter;

    #[async_trait]
    impl QuestionSubmitter for CountingSubmitter {
        fn backend_name(&self) -> &'static str {
            "counting"
        }

        async fn submit(&self, batch: &SubmissionBatch) -> Result<SubmissionReceipt> {
            Ok(SubmissionReceipt {
                import_id: batch.import_id,
                stored: batch.questions.len(),
                backend: self.backend_name().to_string(),
            })
        }
    }

    fn state() -> web::Data<HttpState> {
        let use_case = QuestionImportUseCase::new(
            Arc::new(CatalogRegistry::new()),
            Arc::new(CountingSubmitter),
            ImporterConfig::default().import,
        );
        web::Data::new(HttpState {
            import_use_case: Arc::new(use_case),
            logs: Arc::new(Mutex::new(Vec::new())),
        })
    }

    #[actix_web::test]
    async fn test_preview_returns_questions() {
        let app = actix_test::init_service(App::new().app_data(state()).configure(configure_api)).await;

        let req = actix_test::TestRequest::post()
            .uri("/api/questions/preview")
            .set_json(json!({
                "content": format!("{}\n7,Reading,Multiple Choice,Pick one,A;B;C,B,", HEADER),
                "module": "ielts",
                "skill": "reading",
                "part_number": 2
            }))
            .to_request();
        let body: serde_json::Value = actix_test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["count"], 1);
        assert_eq!(body["questions"][0]["question_number"], 1);
        assert_eq!(body["questions"][0]["part_number"], 2);
        assert_eq!(body["questions"][0]["options"][2], "C");
    }

    #[actix_web::test]
    async fn test_invalid_type_is_unprocessable() {
        let app = actix_test::init_service(App::new().app_data(state()).configure(configure_api)).await;

        let req = actix_test::TestRequest::post()
            .uri("/api/questions/preview")
            .set_json(json!({
                "content": format!("{}\n1,Reading,Crossword,Q,,A,", HEADER),
                "skill": "reading"
            }))
            .to_request();
        let resp = actix_test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let body: serde_json::Value = actix_test::read_body_json(resp).await;
        assert_eq!(body["error"], "invalid_question_type");
        assert_eq!(body["detail"]["row"], 2);
    }

    #[actix_web::test]
    async fn test_raw_upload_with_bom() {
        let app = actix_test::init_service(App::new().app_data(state()).configure(configure_api)).await;

        let mut bytes = vec![0xEF, 0xBB, 0xBF];
        bytes.extend_from_slice(
            format!("{}\n1,Listening,Form completion,Name ____,,Sarah,", HEADER).as_bytes(),
        );
        let req = actix_test::TestRequest::post()
            .uri("/api/questions/preview/raw?skill=listening&cambridge_book=Cambridge%2018")
            .set_payload(bytes)
            .to_request();
        let body: serde_json::Value = actix_test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["encoding"], "UTF-8");
        assert_eq!(body["questions"][0]["question_type"], "Form Completion");
        assert_eq!(body["questions"][0]["cambridge_book"], "Cambridge 18");
    }

    #[actix_web::test]
    async fn test_import_returns_receipt_and_logs() {
        let state = state();
        let app =
            actix_test::init_service(App::new().app_data(state.clone()).configure(configure_api)).await;

        let req = actix_test::TestRequest::post()
            .uri("/api/questions/import")
            .set_json(json!({
                "content": format!("{}\n1,Speaking,Cue Card,Describe a trip,,,", HEADER),
                "skill": "speaking",
                "test_id": "speaking-mock-1",
                "test_type": "speaking"
            }))
            .to_request();
        let body: serde_json::Value = actix_test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["stored"], 1);
        assert_eq!(body["backend"], "counting");

        let req = actix_test::TestRequest::get().uri("/api/logs").to_request();
        let logs: Vec<LogEntry> = actix_test::call_and_read_body_json(&app, req).await;
        assert!(logs.iter().any(|l| l.message.contains("speaking-mock-1")));
    }

    #[actix_web::test]
    async fn test_missing_test_id_is_bad_request() {
        let app = actix_test::init_service(App::new().app_data(state()).configure(configure_api)).await;

        let req = actix_test::TestRequest::post()
            .uri("/api/questions/import")
            .set_json(json!({
                "content": format!("{}\n1,Reading,Multiple Choice,Q,A;B,A,", HEADER),
                "skill": "reading",
                "test_id": "",
                "test_type": "reading"
            }))
            .to_request();
        let resp = actix_test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    fn reviewed_questions() -> serde_json::Value {
        json!([
            {
                "question_number": 1,
                "section": "Reading",
                "question_type": "Multiple Choice",
                "question_text": "Pick one",
                "options": ["A", "B", "C"],
                "correct_answer": "B",
                "explanation": "",
                "cambridge_book": null,
                "section_number": null,
                "part_number": 2
            },
            {
                "question_number": 2,
                "section": "Reading",
                "question_type": "Matching Headings",
                "question_text": "Match the heading",
                "choices": { "i": "Origins", "ii": "Decline" },
                "correct_answer": "ii",
                "explanation": "",
                "cambridge_book": "Cambridge 18",
                "section_number": 1,
                "part_number": 2
            },
            {
                "question_number": 3,
                "section": "Reading",
                "question_type": "Short Answer",
                "question_text": "Name the river",
                "correct_answer": "Nile",
                "explanation": "Paragraph B",
                "cambridge_book": null,
                "section_number": null,
                "part_number": 2
            }
        ])
    }

    #[actix_web::test]
    async fn test_submit_reviewed_questions() {
        let app = actix_test::init_service(App::new().app_data(state()).configure(configure_api)).await;

        let req = actix_test::TestRequest::post()
            .uri("/api/questions/submit")
            .set_json(json!({
                "test_id": "reading-mock-1",
                "test_type": "academic",
                "questions": reviewed_questions()
            }))
            .to_request();
        let resp = actix_test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body: serde_json::Value = actix_test::read_body_json(resp).await;
        assert_eq!(body["stored"], 3);
        assert_eq!(body["backend"], "counting");
    }

    #[actix_web::test]
    async fn test_submit_part_mismatch_is_bad_request() {
        let app = actix_test::init_service(App::new().app_data(state()).configure(configure_api)).await;

        let req = actix_test::TestRequest::post()
            .uri("/api/questions/submit")
            .set_json(json!({
                "test_id": "reading-mock-1",
                "test_type": "academic",
                "part_number": 1,
                "questions": reviewed_questions()
            }))
            .to_request();
        let resp = actix_test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_submit_duplicate_numbers_is_bad_request() {
        let app = actix_test::init_service(App::new().app_data(state()).configure(configure_api)).await;

        let mut questions = reviewed_questions();
        questions[2]["question_number"] = json!(1);
        let req = actix_test::TestRequest::post()
            .uri("/api/questions/submit")
            .set_json(json!({
                "test_id": "reading-mock-1",
                "test_type": "academic",
                "part_number": 2,
                "questions": questions
            }))
            .to_request();
        let resp = actix_test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let body: serde_json::Value = actix_test::read_body_json(resp).await;
        assert!(body["message"]
            .as_str()
            .unwrap_or_default()
            .contains("Duplicate question number 1"));
    }

    #[actix_web::test]
    async fn test_template_download() {
        let app = actix_test::init_service(App::new().app_data(state()).configure(configure_api)).await;

        let req = actix_test::TestRequest::get().uri("/api/templates/reading").to_request();
        let resp = actix_test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let disposition = resp
            .headers()
            .get("Content-Disposition")
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        assert!(disposition.contains("reading_questions_sample.csv"));

        let body = actix_test::read_body(resp).await;
        assert!(body.starts_with(HEADER.as_bytes()));

        let req = actix_test::TestRequest::get().uri("/api/templates/grammar").to_request();
        let resp = actix_test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_question_types_listing() {
        let app = actix_test::init_service(App::new().app_data(state()).configure(configure_api)).await;

        let req = actix_test::TestRequest::get()
            .uri("/api/question-types?skill=speaking")
            .to_request();
        let body: serde_json::Value = actix_test::call_and_read_body_json(&app, req).await;
        assert_eq!(body.as_array().map(Vec::len), Some(3));
        assert_eq!(body[1]["value"], "Part 2 - Long Turn (Cue Card)");
    }

    #[test]
    fn test_log_ring_buffer_is_bounded() {
        let logs = Mutex::new(Vec::new());
        for i in 0..(MAX_LOG_ENTRIES + 5) {
            add_log(&logs, "INFO", "Test", &format!("entry {}", i));
        }
        let logs = logs.lock().unwrap();
        assert_eq!(logs.len(), MAX_LOG_ENTRIES);
        assert_eq!(logs[0].message, "entry 5");
    }
}
