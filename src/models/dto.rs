//pour les requêtes / réponses de l'API
use sea_orm::FromQueryResult;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use super::foods::FoodType;

// DTO pour l'inscription
// Les champs sont optionnels pour pouvoir répondre "Champs requis" au lieu d'une erreur serde
#[derive(Debug, Default, Deserialize)]
pub struct RegisterRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

// Paramètres de /auth/login (?u=...&p=...)
#[derive(Debug, Default, Deserialize)]
pub struct LoginQuery {
    #[serde(default)]
    pub u: String,
    #[serde(default)]
    pub p: String,
}

// Ligne renvoyée par la requête de login
#[derive(Debug, Clone, PartialEq, Serialize, FromQueryResult)]
pub struct LoginUser {
    pub id: i32,
    pub email: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub ok: bool,
    pub rows_count: usize,
    pub sql: String,
    pub user: Option<LoginUser>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

// Filtres de GET /foods
#[derive(Debug, Default, Deserialize)]
pub struct FoodsQuery {
    pub q: Option<String>,
    #[serde(rename = "type")]
    pub food_type: Option<String>,
}

/// Calories telles qu'envoyées par le front: nombre ou texte
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum CaloriesInput {
    Number(f64),
    Text(String),
}

impl CaloriesInput {
    /// Vide ou non numérique => None
    pub fn to_number(&self) -> Option<f64> {
        let value = match self {
            CaloriesInput::Number(n) => *n,
            CaloriesInput::Text(s) => {
                let s = s.trim();
                if s.is_empty() {
                    return None;
                }
                s.parse::<f64>().ok()?
            }
        };
        value.is_finite().then_some(value)
    }
}

// Corps de POST /foods et PUT /foods/{id}
#[derive(Debug, Default, Deserialize, Validate)]
pub struct FoodPayload {
    #[validate(required, length(min = 1))]
    pub name: Option<String>,
    pub description: Option<String>,
    pub calories: Option<CaloriesInput>,
    #[serde(rename = "type")]
    #[validate(required, custom(function = "validate_food_type"))]
    pub food_type: Option<String>,
}

fn validate_food_type(value: &str) -> Result<(), ValidationError> {
    value
        .parse::<FoodType>()
        .map(|_| ())
        .map_err(|_| ValidationError::new("food_type"))
}

/// Aliment validé, prêt à être écrit en base
#[derive(Debug, Clone, PartialEq)]
pub struct NewFood {
    pub name: String,
    pub description: Option<String>,
    pub calories: Option<f64>,
    pub food_type: FoodType,
}

impl TryFrom<FoodPayload> for NewFood {
    type Error = validator::ValidationErrors;

    fn try_from(payload: FoodPayload) -> Result<Self, Self::Error> {
        payload.validate()?;

        // validate() garantit la présence de name et d'un type connu
        let (Some(name), Some(food_type)) = (payload.name, payload.food_type) else {
            return Err(validator::ValidationErrors::new());
        };
        let Ok(food_type) = food_type.parse::<FoodType>() else {
            return Err(validator::ValidationErrors::new());
        };

        Ok(NewFood {
            name,
            description: payload.description.filter(|d| !d.is_empty()),
            calories: payload.calories.as_ref().and_then(CaloriesInput::to_number),
            food_type,
        })
    }
}
