// ============================================================================
// MODÈLE : FOODS
// ============================================================================
//
// Colonnes de la table foods:
//   - id (INTEGER, PRIMARY KEY, SERIAL)
//   - name (VARCHAR, NOT NULL)
//   - description (TEXT, NULL)
//   - calories (DOUBLE PRECISION, NULL)
//   - type (VARCHAR, NOT NULL) - aliment | plat | dessert | boisson | hippo
//
// ============================================================================

use std::str::FromStr;

use sea_orm::entity::prelude::*;
use sea_orm::sea_query::StringLen;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "lowercase")]
pub enum FoodType {
    #[sea_orm(string_value = "aliment")]
    Aliment,
    #[sea_orm(string_value = "plat")]
    Plat,
    #[sea_orm(string_value = "dessert")]
    Dessert,
    #[sea_orm(string_value = "boisson")]
    Boisson,
    #[sea_orm(string_value = "hippo")]
    Hippo,
}

impl FoodType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FoodType::Aliment => "aliment",
            FoodType::Plat => "plat",
            FoodType::Dessert => "dessert",
            FoodType::Boisson => "boisson",
            FoodType::Hippo => "hippo",
        }
    }
}

impl FromStr for FoodType {
    type Err = ();

    // Correspondance exacte, sensible à la casse
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "aliment" => Ok(FoodType::Aliment),
            "plat" => Ok(FoodType::Plat),
            "dessert" => Ok(FoodType::Dessert),
            "boisson" => Ok(FoodType::Boisson),
            "hippo" => Ok(FoodType::Hippo),
            _ => Err(()),
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "foods")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub calories: Option<f64>,
    #[serde(rename = "type")]
    #[sea_orm(column_name = "type")]
    pub food_type: FoodType,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::Iterable;

    #[test]
    fn test_food_type_parsing() {
        for t in FoodType::iter() {
            assert_eq!(t.as_str().parse::<FoodType>(), Ok(t));
        }
        assert!("Dessert".parse::<FoodType>().is_err());
        assert!("".parse::<FoodType>().is_err());
    }

    #[test]
    fn test_model_serializes_type_field() {
        let food = Model {
            id: 1,
            name: "Mousse au chocolat".to_string(),
            description: None,
            calories: Some(350.0),
            food_type: FoodType::Dessert,
        };
        let json = serde_json::to_value(&food).unwrap();
        assert_eq!(json["type"], "dessert");
        assert_eq!(json["description"], serde_json::Value::Null);
        assert_eq!(json["calories"], 350.0);
    }
}
