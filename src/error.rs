use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use sea_orm::{DbErr, RuntimeErr};
use thiserror::Error;

/// Erreurs renvoyées par l'API
/// Le message (Display) est exactement ce qui part dans `{"error": ...}`
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("auth_required")]
    AuthRequired,

    #[error("invalid_auth_header")]
    InvalidAuthHeader,

    #[error("invalid_token")]
    InvalidToken,

    #[error("invalid_credentials")]
    InvalidCredentials,

    #[error("invalid_payload")]
    InvalidPayload,

    #[error("invalid_id")]
    InvalidId,

    #[error("Champs requis")]
    MissingFields,

    #[error("Cet email est déjà utilisé")]
    EmailAlreadyUsed,

    #[error("not_found")]
    NotFound,

    // Message de la base transmis tel quel
    #[error("{}", driver_message(.0))]
    Database(#[from] DbErr),

    #[error("{0}")]
    Internal(String),
}

/// Texte du driver, sans le préfixe ajouté par sea-orm ("Query Error: ...")
fn driver_message(err: &DbErr) -> String {
    match err {
        DbErr::Conn(inner) | DbErr::Exec(inner) | DbErr::Query(inner) => match inner {
            RuntimeErr::Internal(message) => message.clone(),
            other => other.to_string(),
        },
        DbErr::Custom(message) => message.clone(),
        other => other.to_string(),
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::AuthRequired
            | ApiError::InvalidAuthHeader
            | ApiError::InvalidToken
            | ApiError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            ApiError::InvalidPayload
            | ApiError::InvalidId
            | ApiError::MissingFields
            | ApiError::EmailAlreadyUsed => StatusCode::BAD_REQUEST,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Database(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        if let ApiError::Database(e) = self {
            tracing::error!("Database error: {}", e);
        }

        HttpResponse::build(self.status_code()).json(serde_json::json!({
            "error": self.to_string()
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;

    #[actix_web::test]
    async fn test_error_body_and_status() {
        let response = ApiError::InvalidToken.error_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let body = to_bytes(response.into_body()).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json, serde_json::json!({ "error": "invalid_token" }));
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(ApiError::AuthRequired.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::InvalidPayload.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::MissingFields.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::NotFound.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            ApiError::Database(DbErr::Custom("boom".into())).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_database_message_is_passed_through() {
        let err = ApiError::from(DbErr::Query(RuntimeErr::Internal(
            "relation \"foods\" does not exist".into(),
        )));
        assert_eq!(err.to_string(), "relation \"foods\" does not exist");

        let err = ApiError::from(DbErr::Conn(RuntimeErr::Internal("connection refused".into())));
        assert_eq!(err.to_string(), "connection refused");

        let err = ApiError::from(DbErr::Custom("boom".into()));
        assert_eq!(err.to_string(), "boom");
    }

    #[actix_web::test]
    async fn test_database_error_body() {
        let response = ApiError::from(DbErr::Exec(RuntimeErr::Internal("disk full".into())))
            .error_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = to_bytes(response.into_body()).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json, serde_json::json!({ "error": "disk full" }));
    }
}
