// ============================================================================
// MODELS - MODULE PRINCIPAL
// ============================================================================
//
// Description:
//   Point d'entrée pour tous les modèles de données.
//   Chaque entité correspond à une table PostgreSQL avec SeaORM.
//
// Liste des modules:
//   - health : Réponse du health check
//   - users : Utilisateurs (email + empreinte SHA-256 du mot de passe)
//   - foods : Aliments / plats (type parmi aliment, plat, dessert, boisson, hippo)
//   - dto : Data Transfer Objects pour les requêtes et réponses API
//
// Points d'attention:
//   - Pas de migrations: les tables users et foods doivent exister
//   - Le login de démonstration utilise du SQL brut (voir routes::auth)
//
// ============================================================================

pub mod health;
pub mod users;
pub mod foods;
pub mod dto;
