use actix_web::{HttpResponse, web};
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tokio::sync::watch;

use crate::monitor::{LivenessStatus, Pinger};

#[derive(serde::Serialize)]
struct HealthCheckResponse {
    status: &'static str,
    timestamp: DateTime<Utc>,
}

/// Pings the record store and reports the outcome, so external probers (and
/// curious humans) can tell whether the database is reachable right now.
#[tracing::instrument(name = "Checking database health", skip(pool))]
pub async fn health_check(pool: web::Data<PgPool>) -> HttpResponse {
    let timestamp = Utc::now();
    match pool.get_ref().ping().await {
        Ok(()) => HttpResponse::Ok().json(HealthCheckResponse {
            status: "healthy",
            timestamp,
        }),
        Err(e) => {
            tracing::error!(error.cause_chain = ?e, "database health check failed");
            HttpResponse::ServiceUnavailable().json(HealthCheckResponse {
                status: "error",
                timestamp,
            })
        }
    }
}

/// Reports the liveness monitor's latest observation without touching the
/// database.
pub async fn liveness_status(status: web::Data<watch::Receiver<LivenessStatus>>) -> HttpResponse {
    HttpResponse::Ok().json(*status.borrow())
}
