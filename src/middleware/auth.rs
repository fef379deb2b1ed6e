use actix_web::{dev::Payload, http::header, web, FromRequest, HttpRequest};
use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::Engine;
use futures::future::{FutureExt, LocalBoxFuture};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::models::users::{Column as UserColumn, Entity as Users};
use crate::utils::{password, token};

/// Structure qui contient les infos de l'utilisateur authentifié
/// Utilisée comme extracteur dans les routes protégées
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthUser {
    pub user_id: i32,
    /// Connu seulement pour une authentification Basic (le jeton ne porte que l'id)
    pub email: Option<String>,
}

/// Ce que le header Authorization annonce, avant toute vérification en base
#[derive(Debug, Clone, PartialEq)]
pub enum Credentials {
    Token(i32),
    Basic { email: String, password: String },
}

// Le padding "=" est facultatif dans le header Basic
const BASIC_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Lit le header Authorization
/// Formats acceptés: "Bearer uid:<id>" et "Basic base64(email:password)"
pub fn parse_authorization(header: Option<&str>) -> Result<Credentials, ApiError> {
    let header = header.unwrap_or_default();

    // 1. Jeton simulé "Bearer uid:<id>" (aucune vérification d'existence)
    if let Some(raw) = header.strip_prefix("Bearer ") {
        return token::verify_token(raw)
            .map(Credentials::Token)
            .ok_or(ApiError::InvalidToken);
    }

    // 2. Basic base64(email:password)
    let Some(encoded) = header.strip_prefix("Basic ") else {
        return Err(ApiError::AuthRequired);
    };

    let decoded = BASIC_ENGINE
        .decode(encoded.trim())
        .map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
        .unwrap_or_default();

    let Some((email, password)) = decoded.split_once(':') else {
        return Err(ApiError::InvalidAuthHeader);
    };

    if email.is_empty() || password.is_empty() {
        return Err(ApiError::InvalidCredentials);
    }

    Ok(Credentials::Basic {
        email: email.to_string(),
        password: password.to_string(),
    })
}

/// Cherche l'utilisateur dont l'email et l'empreinte du mot de passe correspondent
pub async fn authenticate_basic(
    db: &DatabaseConnection,
    email: &str,
    plain_password: &str,
) -> Result<AuthUser, ApiError> {
    let user = Users::find()
        .filter(UserColumn::Email.eq(email))
        .filter(UserColumn::Password.eq(password::digest_password(plain_password)))
        .one(db)
        .await?;

    match user {
        Some(user) => Ok(AuthUser {
            user_id: user.id,
            email: Some(user.email),
        }),
        None => {
            tracing::debug!("Basic auth rejected for {}", email);
            Err(ApiError::InvalidCredentials)
        }
    }
}

/// Implémentation de FromRequest pour AuthUser
/// Cela permet à Actix-Web d'extraire automatiquement AuthUser des requêtes
impl FromRequest for AuthUser {
    type Error = ApiError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let credentials = parse_authorization(
            req.headers()
                .get(header::AUTHORIZATION)
                .and_then(|h| h.to_str().ok()),
        );
        let db = req.app_data::<web::Data<DatabaseConnection>>().cloned();

        async move {
            match credentials? {
                Credentials::Token(user_id) => Ok(AuthUser { user_id, email: None }),
                Credentials::Basic { email, password } => {
                    let db = db.ok_or_else(|| {
                        ApiError::Internal("Database connection not configured".to_string())
                    })?;
                    authenticate_basic(db.get_ref(), &email, &password).await
                }
            }
        }
        .map(|result| {
            if let Err(ref e) = result {
                tracing::debug!("Authentication failed: {}", e);
            }
            result
        })
        .boxed_local()
    }
}
