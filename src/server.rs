use crate::data::{Catalog, Schedule, TimetableOutput, TimetableRequest};
use crate::report;
use crate::solver::{self, Csp};
use crate::validation::validate_catalog;
use axum::http::StatusCode;
use axum::{Json, Router, routing::post};
use log::{info, warn};
use rand::SeedableRng;
use rand::rngs::StdRng;

pub const DEFAULT_ADDR: &str = "127.0.0.1:8080";

// validates, seeds and runs one solve; hands back the catalog with updated hours
fn build_timetable(request: TimetableRequest) -> Result<(Catalog, Schedule), String> {
    let TimetableRequest { mut catalog, seed } = request;
    validate_catalog(&catalog)?;
    let rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    let schedule = Csp::new(&mut catalog, rng).solve();
    Ok((catalog, schedule))
}

async fn solve_handler(
    Json(request): Json<TimetableRequest>,
) -> Result<Json<TimetableOutput>, (StatusCode, String)> {
    match build_timetable(request) {
        Ok((catalog, schedule)) => {
            let violations = solver::audit(&schedule, &catalog.professors);
            for violation in &violations {
                warn!("{violation}");
            }
            Ok(Json(solver::build_output(&schedule, violations)))
        }
        Err(e) => Err((StatusCode::BAD_REQUEST, e)),
    }
}

async fn report_handler(
    Json(request): Json<TimetableRequest>,
) -> Result<String, (StatusCode, String)> {
    match build_timetable(request) {
        Ok((catalog, schedule)) => Ok(report::render(&catalog, &schedule)),
        Err(e) => Err((StatusCode::BAD_REQUEST, e)),
    }
}

pub fn router() -> Router {
    Router::new()
        .route("/v1/timetable/solve", post(solve_handler))
        .route("/v1/timetable/report", post(report_handler))
}

pub async fn run_server(addr: &str) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;

    info!("Server running at http://{}", listener.local_addr()?);

    axum::serve(listener, router()).await
}
