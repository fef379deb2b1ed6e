//! Partie front: session d'authentification persistée, routeur avec garde
//! de navigation et client HTTP de l'API.

pub mod api;
pub mod auth_store;
pub mod router;

pub use api::ApiClient;
pub use auth_store::{AuthSession, FileStorage, LocalStorage, MemoryStorage};
pub use router::{Navigation, Route, Router};
