use crate::data::{OptimizeRequest, ScheduleResult};
use crate::error::ScheduleError;
use crate::solver;
use axum::{Json, Router, http::StatusCode, routing::post};

async fn solve_handler(
    Json(request): Json<OptimizeRequest>,
) -> Result<Json<ScheduleResult>, (StatusCode, String)> {
    match solver::optimize(&request) {
        Ok(result) => Ok(Json(result)),
        Err(e) => {
            let status = match &e {
                ScheduleError::MalformedInput(_) => StatusCode::BAD_REQUEST,
                ScheduleError::Unsolved(_) => StatusCode::UNPROCESSABLE_ENTITY,
                ScheduleError::SolverFault(_) => StatusCode::INTERNAL_SERVER_ERROR,
            };
            Err((status, e.to_string()))
        }
    }
}

pub async fn run_server() {
    let app = Router::new().route("/v1/timetable/solve", post(solve_handler));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:8080")
        .await
        .unwrap();

    println!("Server running at http://{}", listener.local_addr().unwrap());

    axum::serve(listener, app).await.unwrap();
}
