use actix_web::{post, web, HttpResponse};
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    FromQueryResult, QueryFilter, Set, Statement,
};

use crate::error::ApiError;
use crate::models::dto::{LoginQuery, LoginResponse, LoginUser, RegisterRequest};
use crate::models::users::{ActiveModel as UserActiveModel, Column as UserColumn, Entity as Users};
use crate::utils::{password, token};

/// POST /auth/register - Créer un compte (PUBLIC)
#[post("/register")]
pub async fn register(
    body: Option<web::Json<RegisterRequest>>,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, ApiError> {
    let body = body.map(web::Json::into_inner).unwrap_or_default();

    let (Some(email), Some(plain_password)) = (
        body.email.filter(|e| !e.is_empty()),
        body.password.filter(|p| !p.is_empty()),
    ) else {
        return Err(ApiError::MissingFields);
    };

    // 1. Vérifier si l'utilisateur existe déjà
    let existing_user = Users::find()
        .filter(UserColumn::Email.eq(&email))
        .one(db.get_ref())
        .await?;

    if existing_user.is_some() {
        return Err(ApiError::EmailAlreadyUsed);
    }

    // 2. Créer l'utilisateur avec l'empreinte calculée côté serveur
    let new_user = UserActiveModel {
        email: Set(email.clone()),
        password: Set(password::digest_password(&plain_password)),
        ..Default::default()
    };

    Users::insert(new_user).exec(db.get_ref()).await?;
    tracing::info!("User registered: {}", email);

    Ok(HttpResponse::Created().json(serde_json::json!({
        "ok": true,
        "message": "Utilisateur créé"
    })))
}

/// Texte SQL du login de démonstration.
/// Volontairement construit par concaténation: `u` et `p` ne sont pas échappés,
/// ce qui rend la route injectable (exercice de sécurité).
pub fn build_login_sql(u: &str, p: &str) -> String {
    format!(
        "SELECT id, email FROM users WHERE email = '{}' AND password = encode(sha256('{}'::bytea), 'hex') LIMIT 1",
        u, p
    )
}

/// GET|POST /auth/login?u=...&p=... - Login vulnérable (PUBLIC)
pub async fn login(
    query: web::Query<LoginQuery>,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, ApiError> {
    let sql = build_login_sql(&query.u, &query.p);
    tracing::warn!("Executing unparameterized login query: {}", sql);

    let statement = Statement::from_string(db.get_database_backend(), sql.clone());
    let rows = LoginUser::find_by_statement(statement)
        .all(db.get_ref())
        .await?;

    let user = rows.first().cloned();
    let token = user.as_ref().map(|u| token::generate_token(u.id));

    Ok(HttpResponse::Ok().json(LoginResponse {
        ok: user.is_some(),
        rows_count: rows.len(),
        sql,
        user,
        token,
    }))
}

pub fn auth_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/auth")
            .service(register)
            .service(
                web::resource("/login")
                    .route(web::get().to(login))
                    .route(web::post().to(login)),
            ),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::users;
    use actix_web::{http::StatusCode, test as actix_test, App};
    use sea_orm::{DatabaseBackend, DbErr, MockDatabase};

    fn user(id: i32, email: &str) -> users::Model {
        users::Model {
            id,
            email: email.to_string(),
            password: password::digest_password("secret"),
        }
    }

    macro_rules! app_with {
        ($db:expr) => {
            actix_test::init_service(
                App::new()
                    .app_data(web::Data::new($db))
                    .service(web::scope("/api").configure(auth_routes)),
            )
            .await
        };
    }

    #[test]
    fn test_login_sql_is_interpolated_verbatim() {
        let sql = build_login_sql("x' OR '1'='1", "whatever");
        assert!(sql.contains("email = 'x' OR '1'='1'"));
        assert!(sql.contains("sha256('whatever'::bytea)"));
    }

    #[actix_web::test]
    async fn test_register_requires_fields() {
        let app = app_with!(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

        for body in [
            serde_json::json!({}),
            serde_json::json!({ "email": "a@b.c" }),
            serde_json::json!({ "email": "", "password": "x" }),
        ] {
            let req = actix_test::TestRequest::post()
                .uri("/api/auth/register")
                .set_json(body)
                .to_request();
            let resp = actix_test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
            let json: serde_json::Value = actix_test::read_body_json(resp).await;
            assert_eq!(json["error"], "Champs requis");
        }
    }

    #[actix_web::test]
    async fn test_register_existing_email() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![user(1, "a@b.c")]])
            .into_connection();
        let app = app_with!(db);

        let req = actix_test::TestRequest::post()
            .uri("/api/auth/register")
            .set_json(serde_json::json!({ "email": "a@b.c", "password": "secret" }))
            .to_request();
        let resp = actix_test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let json: serde_json::Value = actix_test::read_body_json(resp).await;
        assert_eq!(json["error"], "Cet email est déjà utilisé");
    }

    #[actix_web::test]
    async fn test_register_creates_user() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<users::Model>::new()])
            .append_query_results([vec![user(2, "new@b.c")]])
            .into_connection();
        let app = app_with!(db);

        let req = actix_test::TestRequest::post()
            .uri("/api/auth/register")
            .set_json(serde_json::json!({ "email": "new@b.c", "password": "secret" }))
            .to_request();
        let resp = actix_test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let json: serde_json::Value = actix_test::read_body_json(resp).await;
        assert_eq!(json["ok"], true);
    }

    #[actix_web::test]
    async fn test_login_injection_returns_rows() {
        // Le payload injecté fait renvoyer toutes les lignes
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![user(1, "a@b.c"), user(2, "d@e.f")]])
            .into_connection();
        let app = app_with!(db);

        let req = actix_test::TestRequest::get()
            .uri("/api/auth/login?u=x%27%20OR%20%271%27%3D%271&p=y")
            .to_request();
        let json: serde_json::Value = actix_test::call_and_read_body_json(&app, req).await;

        assert_eq!(json["ok"], true);
        assert_eq!(json["rowsCount"], 2);
        assert_eq!(json["user"]["id"], 1);
        assert_eq!(json["token"], "uid:1");
        assert!(json["sql"].as_str().unwrap().contains("email = 'x' OR '1'='1'"));
    }

    #[actix_web::test]
    async fn test_login_no_match() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<users::Model>::new()])
            .into_connection();
        let app = app_with!(db);

        let req = actix_test::TestRequest::post()
            .uri("/api/auth/login?u=a@b.c&p=bad")
            .to_request();
        let json: serde_json::Value = actix_test::call_and_read_body_json(&app, req).await;

        assert_eq!(json["ok"], false);
        assert_eq!(json["rowsCount"], 0);
        assert!(json["user"].is_null());
        assert!(json.get("token").is_none());
    }

    #[actix_web::test]
    async fn test_login_database_error_is_500() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_errors([DbErr::Custom("syntax error at or near \"'\"".to_string())])
            .into_connection();
        let app = app_with!(db);

        let req = actix_test::TestRequest::get()
            .uri("/api/auth/login?u=%27&p=x")
            .to_request();
        let resp = actix_test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json: serde_json::Value = actix_test::read_body_json(resp).await;
        assert!(json["error"].as_str().unwrap().contains("syntax error"));
    }
}
