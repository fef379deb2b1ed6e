use actix_web::{delete, get, post, put, web, HttpResponse};
use sea_orm::sea_query::{Expr, Func};
use sea_orm::{
    ColumnTrait, Condition, DatabaseConnection, EntityTrait, NotSet, QueryFilter, QueryOrder,
    QuerySelect, Select, Set,
};

use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::models::dto::{FoodPayload, FoodsQuery, NewFood};
use crate::models::foods::{
    self, ActiveModel as FoodActiveModel, Column as FoodColumn, Entity as Foods, FoodType,
};

/// Nombre maximum de lignes renvoyées par GET /foods
pub const MAX_ROWS: u64 = 200;

/// Construit la requête de liste à partir des filtres
/// - q : sous-chaîne cherchée dans name OU description (insensible à la casse)
/// - type : ignoré s'il ne fait pas partie des types connus
pub fn list_query(filters: &FoodsQuery) -> Select<Foods> {
    let mut query = Foods::find();

    let q = filters.q.as_deref().map(str::trim).unwrap_or_default();
    if !q.is_empty() {
        let pattern = format!("%{}%", q.to_lowercase());
        query = query.filter(
            Condition::any()
                .add(Expr::expr(Func::lower(Expr::col(FoodColumn::Name))).like(pattern.clone()))
                .add(Expr::expr(Func::lower(Expr::col(FoodColumn::Description))).like(pattern)),
        );
    }

    let food_type = filters
        .food_type
        .as_deref()
        .and_then(|t| t.trim().parse::<FoodType>().ok());
    if let Some(food_type) = food_type {
        query = query.filter(FoodColumn::FoodType.eq(food_type));
    }

    query.order_by_asc(FoodColumn::Name).limit(MAX_ROWS)
}

/// L'id du chemin doit être un entier strictement positif
pub fn parse_id(raw: &str) -> Result<i32, ApiError> {
    match raw.trim().parse::<i32>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(ApiError::InvalidId),
    }
}

fn to_active_model(food: &NewFood) -> FoodActiveModel {
    FoodActiveModel {
        id: NotSet,
        name: Set(food.name.clone()),
        description: Set(food.description.clone()),
        calories: Set(food.calories),
        food_type: Set(food.food_type),
    }
}

/// Relit la ligne écrite. Si la relecture échoue, on renvoie l'objet reconstruit
/// localement: l'écriture a déjà eu lieu et n'est pas annulée.
async fn fetch_written(db: &DatabaseConnection, id: i32, food: NewFood) -> foods::Model {
    match Foods::find_by_id(id).one(db).await {
        Ok(Some(model)) => model,
        Ok(None) => {
            tracing::warn!("Food {} not found after write, returning local copy", id);
            local_copy(id, food)
        }
        Err(e) => {
            tracing::warn!("Failed to re-fetch food {}: {}", id, e);
            local_copy(id, food)
        }
    }
}

fn local_copy(id: i32, food: NewFood) -> foods::Model {
    foods::Model {
        id,
        name: food.name,
        description: food.description,
        calories: food.calories,
        food_type: food.food_type,
    }
}

/// GET /api/foods - Liste filtrée (PROTÉGÉE)
#[get("")]
pub async fn list_foods(
    _auth_user: AuthUser,
    filters: web::Query<FoodsQuery>,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, ApiError> {
    let foods = list_query(&filters).all(db.get_ref()).await?;
    Ok(HttpResponse::Ok().json(foods))
}

/// POST /api/foods - Créer un aliment (PROTÉGÉE)
#[post("")]
pub async fn create_food(
    auth_user: AuthUser,
    body: web::Json<FoodPayload>,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, ApiError> {
    let food = NewFood::try_from(body.into_inner()).map_err(|_| ApiError::InvalidPayload)?;

    let result = Foods::insert(to_active_model(&food))
        .exec(db.get_ref())
        .await?;
    let id = result.last_insert_id;
    tracing::info!("Food {} created by user {}", id, auth_user.user_id);

    let stored = fetch_written(db.get_ref(), id, food).await;
    Ok(HttpResponse::Created().json(stored))
}

/// PUT /api/foods/{id} - Modifier un aliment (PROTÉGÉE)
#[put("/{id}")]
pub async fn update_food(
    auth_user: AuthUser,
    path: web::Path<String>,
    body: web::Json<FoodPayload>,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, ApiError> {
    let id = parse_id(&path)?;
    let food = NewFood::try_from(body.into_inner()).map_err(|_| ApiError::InvalidPayload)?;

    let result = Foods::update_many()
        .set(to_active_model(&food))
        .filter(FoodColumn::Id.eq(id))
        .exec(db.get_ref())
        .await?;

    if result.rows_affected == 0 {
        return Err(ApiError::NotFound);
    }
    tracing::info!("Food {} updated by user {}", id, auth_user.user_id);

    let stored = fetch_written(db.get_ref(), id, food).await;
    Ok(HttpResponse::Ok().json(stored))
}

/// DELETE /api/foods/{id} - Supprimer un aliment (PROTÉGÉE)
#[delete("/{id}")]
pub async fn delete_food(
    auth_user: AuthUser,
    path: web::Path<String>,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, ApiError> {
    let id = parse_id(&path)?;

    let result = Foods::delete_by_id(id).exec(db.get_ref()).await?;
    if result.rows_affected == 0 {
        return Err(ApiError::NotFound);
    }
    tracing::info!("Food {} deleted by user {}", id, auth_user.user_id);

    Ok(HttpResponse::NoContent().finish())
}

pub fn foods_routes(cfg: &mut web::ServiceConfig) {
    // Un corps JSON illisible est un payload invalide comme un autre
    let json_config = web::JsonConfig::default().error_handler(|err, _req| {
        tracing::debug!("Rejected food payload: {}", err);
        ApiError::InvalidPayload.into()
    });

    cfg.service(
        web::scope("/foods")
            .app_data(json_config)
            .service(list_foods)
            .service(create_food)
            .service(update_food)
            .service(delete_food),
    );
}
