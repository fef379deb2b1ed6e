// connexion BD

use std::time::Duration;

use sea_orm::{
    ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbErr, FromQueryResult,
    JsonValue, Statement,
};

use crate::config::Config;

pub async fn establish_connection(config: &Config) -> Result<DatabaseConnection, DbErr> {
    let mut options = ConnectOptions::new(config.database_url.clone());
    options
        .max_connections(config.db_max_connections)
        .connect_timeout(Duration::from_secs(10))
        .sqlx_logging(false);

    Database::connect(options).await
}

/// Vérifie qu'une connexion du pool répond
pub async fn health_check(db: &DatabaseConnection) -> Result<bool, DbErr> {
    db.ping().await?;
    Ok(true)
}

/// Liste brute des tables du schéma courant (diagnostic)
pub async fn list_tables(db: &DatabaseConnection) -> Result<Vec<JsonValue>, DbErr> {
    let backend = db.get_database_backend();
    let statement = Statement::from_string(
        backend,
        "SELECT table_name FROM information_schema.tables \
         WHERE table_schema = current_schema() ORDER BY table_name",
    );

    JsonValue::find_by_statement(statement).all(db).await
}
