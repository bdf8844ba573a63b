use actix_web::{App, HttpResponse, HttpServer, Responder, web};
use serde_json::{Value, json};
use tracing::{error, info, warn};

use crate::algorithm::{TimetableOutcome, get_courses_by_semester_and_major, plan_timetable};
use crate::api_json::{
    CourseDto, CoursesQuery, course_to_dto, majors_response, needs_resolution_response, parse_json_input,
    ready_response,
};
use crate::config::Settings;
use crate::error::{Error, Result};
use crate::reports::write_conflict_report;
use crate::storage::{CourseRepository, SqliteRepository, open_database, open_read_only};

fn error_response(e: &Error) -> HttpResponse {
    match e {
        Error::InvalidInput(_) => HttpResponse::BadRequest().json(json!({"error": e.to_string()})),
        Error::NotFound(_) => HttpResponse::NotFound().json(json!({"error": e.to_string()})),
        _ => {
            error!(error = %e, "request failed");
            HttpResponse::InternalServerError().json(json!({"error": e.to_string()}))
        }
    }
}

// Ejecuta trabajo síncrono de SQLite fuera del hilo del runtime
async fn run_blocking<F>(job: F) -> HttpResponse
where
    F: FnOnce() -> Result<Value> + Send + 'static,
{
    match web::block(job).await {
        Ok(Ok(body)) => HttpResponse::Ok().json(body),
        Ok(Err(e)) => error_response(&e),
        Err(e) => HttpResponse::InternalServerError().json(json!({"error": format!("worker failed: {}", e)})),
    }
}

async fn majors_handler(settings: web::Data<Settings>) -> impl Responder {
    let db_path = settings.db_path.clone();
    let lang = settings.lang;
    run_blocking(move || {
        let conn = open_read_only(&db_path)?;
        let majors = SqliteRepository::new(&conn).majors()?;
        Ok(majors_response(&majors, lang))
    })
    .await
}

async fn courses_handler(settings: web::Data<Settings>, query: web::Query<CoursesQuery>) -> impl Responder {
    let query = query.into_inner();
    let db_path = settings.db_path.clone();
    let lang = query.lang.unwrap_or(settings.lang);
    run_blocking(move || {
        let conn = open_read_only(&db_path)?;
        let repo = SqliteRepository::new(&conn);
        let courses = get_courses_by_semester_and_major(&repo, query.semester, query.major_id)?;
        let dtos: Vec<CourseDto> = courses.iter().map(|c| course_to_dto(c, lang)).collect();
        Ok(json!({
            "semester": query.semester,
            "major_id": query.major_id,
            "count": dtos.len(),
            "courses": dtos,
        }))
    })
    .await
}

async fn timetable_handler(settings: web::Data<Settings>, body: web::Json<Value>) -> impl Responder {
    let body_value = body.into_inner();
    let json_str = match serde_json::to_string(&body_value) {
        Ok(s) => s,
        Err(e) => return HttpResponse::BadRequest().json(json!({"error": format!("invalid JSON body: {}", e)})),
    };
    let mut req = match parse_json_input(&json_str) {
        Ok(r) => r,
        Err(e) => return HttpResponse::BadRequest().json(json!({"error": format!("failed to parse input: {}", e)})),
    };
    if body_value.get("lang").is_none() {
        req.lang = settings.lang;
    }

    let db_path = settings.db_path.clone();
    let report_dir = settings.report_dir.clone();
    run_blocking(move || {
        let conn = open_read_only(&db_path)?;
        let repo = SqliteRepository::new(&conn);
        let lang = req.lang;
        match plan_timetable(&repo, &req)? {
            TimetableOutcome::NeedsResolution { header, conflicts } => {
                if let Err(e) = write_conflict_report(&report_dir, &header, &conflicts) {
                    warn!(error = %e, "could not save conflict report");
                }
                Ok(needs_resolution_response(&header, &conflicts, lang))
            }
            TimetableOutcome::Ready(view) => {
                if !view.conflicts.is_empty() {
                    if let Err(e) = write_conflict_report(&report_dir, &view.header, &view.conflicts) {
                        warn!(error = %e, "could not save conflict report");
                    }
                }
                Ok(ready_response(&view, lang))
            }
        }
    })
    .await
}

async fn help_handler() -> impl Responder {
    let help = json!({
        "description": "API de horarios a partir del boletín académico. Todas las respuestas son JSON.",
        "routes": {
            "GET /majors": "menciones disponibles (id, name)",
            "GET /courses?semester=N&major_id=M&lang=ja|en": "cursos de un semestre (1..8), opcionalmente de una mención",
            "POST /timetable": "grilla semanal para un semestre y dos menciones",
        },
        "post_example": {
            "semester": 3,
            "major1_id": 1,
            "major2_id": 2,
            "lang": "ja"
        },
        "resolution_example": {
            "semester": 3,
            "major1_id": 1,
            "major2_id": 2,
            "choices": { "conflict_1_2": "T1234" }
        },
        "note": "Si la respuesta trae status=needs_resolution, repetir el POST con una elección por clave de conflicto."
    });
    HttpResponse::Ok().json(help)
}

pub async fn run_server(settings: Settings) -> std::io::Result<()> {
    // Esquema y maestros se preparan una sola vez; los pedidos sólo leen
    open_database(&settings.db_path).map_err(|e| std::io::Error::other(e.to_string()))?;

    let bind = settings.bind.clone();
    info!(bind = %bind, db = %settings.db_path.display(), "starting HTTP server");
    let data = web::Data::new(settings);
    HttpServer::new(move || {
        App::new()
            .app_data(data.clone())
            .route("/help", web::get().to(help_handler))
            .route("/majors", web::get().to(majors_handler))
            .route("/courses", web::get().to(courses_handler))
            .route("/timetable", web::post().to(timetable_handler))
    })
    .bind(bind.as_str())?
    .run()
    .await
}
