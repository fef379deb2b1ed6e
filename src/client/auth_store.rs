//! État de connexion côté client.
//!
//! `AuthSession` est l'objet de contexte passé au routeur: il est créé au
//! démarrage de l'application à partir du stockage persistant (`init`) et rendu
//! à l'arrêt (`teardown`). Aucune vérification n'est faite auprès du serveur.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

pub const KEY_LOGGED: &str = "user_logged";
pub const KEY_EMAIL: &str = "user_email";
pub const KEY_PASSWORD: &str = "user_password";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Storage format error: {0}")]
    Format(#[from] serde_json::Error),
}

/// Équivalent du localStorage du navigateur
pub trait LocalStorage {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&mut self, key: &str) -> Result<(), StorageError>;
}

/// Stockage en mémoire, perdu à la fin du process
#[derive(Debug, Default, Clone)]
pub struct MemoryStorage {
    entries: HashMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl LocalStorage for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.entries.remove(key);
        Ok(())
    }
}

/// Stockage dans un fichier JSON, survit au redémarrage
/// Le fichier est réécrit à chaque modification
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl FileStorage {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let path = path.as_ref().to_path_buf();
        let entries = match fs::read_to_string(&path) {
            Ok(content) if content.trim().is_empty() => BTreeMap::new(),
            Ok(content) => serde_json::from_str(&content)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(e.into()),
        };

        Ok(Self { path, entries })
    }

    fn flush(&self) -> Result<(), StorageError> {
        let content = serde_json::to_string_pretty(&self.entries)?;
        fs::write(&self.path, content)?;
        Ok(())
    }
}

impl LocalStorage for FileStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries.insert(key.to_string(), value.to_string());
        self.flush()
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        if self.entries.remove(key).is_some() {
            self.flush()?;
        }
        Ok(())
    }
}

/// Session d'authentification du front
#[derive(Debug)]
pub struct AuthSession<S: LocalStorage> {
    storage: S,
    is_authenticated: bool,
    email: String,
    // Mot de passe gardé en clair: c'est lui qui sert à construire le header Basic
    password: String,
}

impl<S: LocalStorage> AuthSession<S> {
    /// Relit l'état persistant au démarrage
    pub fn init(storage: S) -> Self {
        let is_authenticated = storage.get(KEY_LOGGED).as_deref() == Some("true");
        let email = storage.get(KEY_EMAIL).unwrap_or_default();
        let password = storage.get(KEY_PASSWORD).unwrap_or_default();

        Self {
            storage,
            is_authenticated,
            email,
            password,
        }
    }

    pub fn login(&mut self, email: &str, password: &str) -> Result<(), StorageError> {
        self.is_authenticated = true;
        self.email = email.to_string();
        self.password = password.to_string();

        self.storage.set(KEY_LOGGED, "true")?;
        self.storage.set(KEY_EMAIL, email)?;
        self.storage.set(KEY_PASSWORD, password)?;
        tracing::debug!("Client session opened for {}", email);
        Ok(())
    }

    pub fn logout(&mut self) -> Result<(), StorageError> {
        self.is_authenticated = false;
        self.email.clear();
        self.password.clear();

        self.storage.remove(KEY_LOGGED)?;
        self.storage.remove(KEY_EMAIL)?;
        self.storage.remove(KEY_PASSWORD)?;
        Ok(())
    }

    /// Fin de vie de la session (arrêt de l'application): rend le stockage
    pub fn teardown(self) -> S {
        self.storage
    }

    pub fn is_authenticated(&self) -> bool {
        self.is_authenticated
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn password(&self) -> &str {
        &self.password
    }

    /// Identifiants en cache, si la session en contient
    pub fn credentials(&self) -> Option<(&str, &str)> {
        if self.email.is_empty() || self.password.is_empty() {
            return None;
        }
        Some((self.email.as_str(), self.password.as_str()))
    }
}
