use actix_web::{get, web, HttpResponse};
use chrono::Utc;
use sea_orm::DatabaseConnection;

use crate::db;
use crate::error::ApiError;
use crate::models::health::HealthResponse;

/// GET /api/health - État du serveur et de la base (PUBLIC)
#[get("/health")]
pub async fn health_check(db_connection: web::Data<DatabaseConnection>) -> HttpResponse {
    match db::health_check(db_connection.get_ref()).await {
        Ok(ok) => HttpResponse::Ok().json(HealthResponse {
            ok,
            db: if ok { "up" } else { "down" }.to_string(),
            time: Utc::now(),
        }),
        Err(e) => {
            tracing::error!("Health check failed: {}", e);
            HttpResponse::InternalServerError().json(serde_json::json!({
                "ok": false,
                "error": e.to_string()
            }))
        }
    }
}

/// GET /api/_tables - Liste brute des tables (diagnostic, PUBLIC)
#[get("/_tables")]
pub async fn list_tables(
    db_connection: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, ApiError> {
    let tables = db::list_tables(db_connection.get_ref()).await?;
    Ok(HttpResponse::Ok().json(tables))
}
