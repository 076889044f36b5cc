use std::sync::{Arc, Mutex};
use actix_web::{web, App, HttpServer, HttpResponse, Result, HttpRequest, middleware};
use log::{error, info, warn};
use serde::{Deserialize, Serialize};
use crate::form::StudentSubmission;
use crate::schedule::{calculate_slot_popularity, AnalysisResult, CommonSlot, Day};
use crate::store::{to_participants, StudentStore};
use crate::summary::Enricher;

pub struct AppState {
    pub store: Arc<dyn StudentStore>,
    pub enricher: Enricher,
    pub last_analysis: Mutex<Option<AnalysisResult>>,
    pub admin_password: String,
}

impl AppState {
    pub fn new(store: Arc<dyn StudentStore>, enricher: Enricher, admin_password: String) -> Self {
        AppState {
            store,
            enricher,
            last_analysis: Mutex::new(None),
            admin_password,
        }
    }

    fn cached_analysis(&self) -> Option<AnalysisResult> {
        match self.last_analysis.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    fn cache_analysis(&self, result: AnalysisResult) {
        match self.last_analysis.lock() {
            Ok(mut guard) => *guard = Some(result),
            Err(poisoned) => *poisoned.into_inner() = Some(result),
        }
    }
}

#[derive(Deserialize)]
pub struct LoginRequest {
    password: String,
}

/// `{success, data}` / `{success: false, error}` envelope used by every endpoint
#[derive(Serialize)]
pub struct ApiResponse<T: Serialize> {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    fn ok(data: T) -> Self {
        ApiResponse { success: true, data: Some(data), error: None }
    }

    fn err(error: impl ToString, data: Option<T>) -> Self {
        ApiResponse { success: false, data, error: Some(error.to_string()) }
    }
}

#[derive(Serialize)]
pub struct DaySlotsResponse<'a> {
    day: Day,
    slots: Vec<&'a CommonSlot>,
}

fn is_admin(req: &HttpRequest, state: &AppState) -> bool {
    req.headers()
        .get("X-Admin-Password")
        .and_then(|v| v.to_str().ok())
        .map(|password| password == state.admin_password)
        .unwrap_or(false)
}

fn unauthorized() -> HttpResponse {
    HttpResponse::Unauthorized().json(ApiResponse::<()>::err("Unauthorized", None))
}

// Admin login endpoint
async fn admin_login(
    req: web::Json<LoginRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    if req.password == state.admin_password {
        Ok(HttpResponse::Ok().json(serde_json::json!({"success": true})))
    } else {
        Ok(HttpResponse::Unauthorized().json(ApiResponse::<()>::err("Invalid password", None)))
    }
}

// Student intake endpoint
async fn submit_student(
    req: web::Json<StudentSubmission>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    let student = match req.into_inner().into_new_student() {
        Ok(student) => student,
        Err(e) => return Ok(HttpResponse::BadRequest().json(ApiResponse::<()>::err(e, None))),
    };

    match state.store.save(student).await {
        Ok(record) => Ok(HttpResponse::Ok().json(ApiResponse::ok(record))),
        Err(e) => {
            error!("Error saving student: {}", e);
            Ok(HttpResponse::InternalServerError().json(ApiResponse::<()>::err(e, None)))
        }
    }
}

// Student listing endpoint
async fn list_students(req: HttpRequest, state: web::Data<AppState>) -> Result<HttpResponse> {
    if !is_admin(&req, &state) {
        return Ok(unauthorized());
    }

    match state.store.list_all().await {
        Ok(records) => Ok(HttpResponse::Ok().json(ApiResponse::ok(records))),
        Err(e) => {
            error!("Error fetching students: {}", e);
            Ok(HttpResponse::InternalServerError().json(ApiResponse::<()>::err(e, None)))
        }
    }
}

// Runs a fresh analysis over every stored student
async fn run_analysis(req: HttpRequest, state: web::Data<AppState>) -> Result<HttpResponse> {
    if !is_admin(&req, &state) {
        return Ok(unauthorized());
    }

    let records = match state.store.list_all().await {
        Ok(records) => records,
        Err(e) => {
            // A failed read is analysed as an empty class so there is still something to show
            error!("Error fetching students for analysis: {}", e);
            let empty = state.enricher.analyze(&[]).await;
            return Ok(HttpResponse::InternalServerError().json(ApiResponse::err(e, Some(empty))));
        }
    };

    let participants = to_participants(&records);
    info!("Analysing timetables of {} student(s)", participants.len());
    let result = state.enricher.analyze(&participants).await;
    info!("Analysis complete: {} common slot(s)", result.common_slots.len());

    state.cache_analysis(result.clone());
    Ok(HttpResponse::Ok().json(ApiResponse::ok(result)))
}

// Latest analysis
async fn get_analysis(req: HttpRequest, state: web::Data<AppState>) -> Result<HttpResponse> {
    if !is_admin(&req, &state) {
        return Ok(unauthorized());
    }

    match state.cached_analysis() {
        Some(result) => Ok(HttpResponse::Ok().json(ApiResponse::ok(result))),
        None => Ok(HttpResponse::NotFound().json(ApiResponse::<()>::err("No analysis has been run yet", None))),
    }
}

// Common slots of the latest analysis for one day
async fn get_day_slots(
    req: HttpRequest,
    day: web::Path<String>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    if !is_admin(&req, &state) {
        return Ok(unauthorized());
    }

    let Some(day) = Day::parse(&day) else {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::<()>::err("Invalid day", None)));
    };

    match state.cached_analysis() {
        Some(result) => Ok(HttpResponse::Ok().json(ApiResponse::ok(DaySlotsResponse {
            day,
            slots: result.slots_for_day(day),
        }))),
        None => Ok(HttpResponse::NotFound().json(ApiResponse::<()>::err("No analysis has been run yet", None))),
    }
}

// Stats endpoint
async fn get_stats(req: HttpRequest, state: web::Data<AppState>) -> Result<HttpResponse> {
    if !is_admin(&req, &state) {
        return Ok(unauthorized());
    }

    match state.store.list_all().await {
        Ok(records) => {
            let popularity = calculate_slot_popularity(&to_participants(&records));
            Ok(HttpResponse::Ok().json(ApiResponse::ok(popularity)))
        }
        Err(e) => {
            warn!("Error fetching students for stats: {}", e);
            Ok(HttpResponse::InternalServerError().json(ApiResponse::<()>::err(e, None)))
        }
    }
}

// Bodies that are not JSON at all still get the usual envelope
fn json_error(err: actix_web::error::JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    warn!("Rejected request body: {}", err);
    let response = HttpResponse::BadRequest().json(ApiResponse::<()>::err(&err, None));
    actix_web::error::InternalError::from_response(err, response).into()
}

/// Registers every API route
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error))
        .route("/api/login", web::post().to(admin_login))
        .route("/api/students", web::post().to(submit_student))
        .route("/api/students", web::get().to(list_students))
        .route("/api/analysis", web::post().to(run_analysis))
        .route("/api/analysis", web::get().to(get_analysis))
        .route("/api/analysis/{day}", web::get().to(get_day_slots))
        .route("/api/stats", web::get().to(get_stats));
}

pub async fn start_server(port: u16, state: AppState) -> std::io::Result<()> {
    let app_state = web::Data::new(state);

    HttpServer::new(move || {
        App::new()
            .app_data(app_state.clone())
            .wrap(middleware::Logger::default())
            .configure(configure)
    })
    .bind(("0.0.0.0", port))?
    .run()
    .await
}
