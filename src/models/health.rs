use serde::Serialize;
use chrono::{DateTime, Utc};

#[derive(Serialize)]
pub struct HealthResponse {
    pub ok: bool,
    pub db: String, // "up" | "down"
    pub time: DateTime<Utc>,
}
