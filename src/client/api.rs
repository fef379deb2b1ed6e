use base64::{engine::general_purpose::STANDARD, Engine};
use reqwest::{RequestBuilder, Response, StatusCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::auth_store::{AuthSession, LocalStorage};
use crate::models::foods::{self, FoodType};

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error ({status}): {message}")]
    Api { status: StatusCode, message: String },
}

// Corps envoyé pour créer / modifier un aliment
#[derive(Debug, Clone, Serialize)]
pub struct FoodInput {
    pub name: String,
    pub description: Option<String>,
    pub calories: Option<f64>,
    #[serde(rename = "type")]
    pub food_type: FoodType,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginUser {
    pub id: i32,
    pub email: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginOutcome {
    pub ok: bool,
    pub rows_count: usize,
    pub sql: String,
    pub user: Option<LoginUser>,
    pub token: Option<String>,
}

/// Header "Basic base64(email:password)"
pub fn basic_authorization(email: &str, password: &str) -> String {
    format!("Basic {}", STANDARD.encode(format!("{}:{}", email, password)))
}

/// Header construit à partir des identifiants en cache dans la session
pub fn authorization_for<S: LocalStorage>(session: &AuthSession<S>) -> Option<String> {
    session
        .credentials()
        .map(|(email, password)| basic_authorization(email, password))
}

/// Client HTTP utilisé par les vues
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}/api{}", self.base_url, path)
    }

    fn authorized<S: LocalStorage>(
        &self,
        request: RequestBuilder,
        session: &AuthSession<S>,
    ) -> RequestBuilder {
        match authorization_for(session) {
            Some(header) => request.header(reqwest::header::AUTHORIZATION, header),
            // Sans identifiants, le serveur répondra auth_required
            None => request,
        }
    }

    pub async fn health(&self) -> Result<serde_json::Value, ClientError> {
        let response = self.http.get(self.url("/health")).send().await?;
        Ok(check(response).await?.json().await?)
    }

    pub async fn register(&self, email: &str, password: &str) -> Result<serde_json::Value, ClientError> {
        let response = self
            .http
            .post(self.url("/auth/register"))
            .json(&serde_json::json!({ "email": email, "password": password }))
            .send()
            .await?;
        Ok(check(response).await?.json().await?)
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<LoginOutcome, ClientError> {
        let response = self
            .http
            .get(self.url("/auth/login"))
            .query(&[("u", email), ("p", password)])
            .send()
            .await?;
        Ok(check(response).await?.json().await?)
    }

    pub async fn list_foods<S: LocalStorage>(
        &self,
        session: &AuthSession<S>,
        q: Option<&str>,
        food_type: Option<FoodType>,
    ) -> Result<Vec<foods::Model>, ClientError> {
        let mut params: Vec<(&str, &str)> = Vec::new();
        if let Some(q) = q {
            params.push(("q", q));
        }
        if let Some(food_type) = food_type {
            params.push(("type", food_type.as_str()));
        }

        let request = self.http.get(self.url("/foods")).query(&params);
        let response = self.authorized(request, session).send().await?;
        Ok(check(response).await?.json().await?)
    }

    pub async fn create_food<S: LocalStorage>(
        &self,
        session: &AuthSession<S>,
        food: &FoodInput,
    ) -> Result<foods::Model, ClientError> {
        let request = self.http.post(self.url("/foods")).json(food);
        let response = self.authorized(request, session).send().await?;
        Ok(check(response).await?.json().await?)
    }

    pub async fn update_food<S: LocalStorage>(
        &self,
        session: &AuthSession<S>,
        id: i32,
        food: &FoodInput,
    ) -> Result<foods::Model, ClientError> {
        let request = self.http.put(self.url(&format!("/foods/{}", id))).json(food);
        let response = self.authorized(request, session).send().await?;
        Ok(check(response).await?.json().await?)
    }

    pub async fn delete_food<S: LocalStorage>(
        &self,
        session: &AuthSession<S>,
        id: i32,
    ) -> Result<(), ClientError> {
        let request = self.http.delete(self.url(&format!("/foods/{}", id)));
        let response = self.authorized(request, session).send().await?;
        check(response).await?;
        Ok(())
    }
}

/// Transforme une réponse non-2xx en ClientError::Api avec le champ "error" du serveur
async fn check(response: Response) -> Result<Response, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(ClientError::Api {
        status,
        message: error_message(&body),
    })
}

fn error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(str::to_string))
        .unwrap_or_else(|| body.to_string())
}
