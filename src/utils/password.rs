use sha2::{Digest, Sha256};

/// Empreinte d'un mot de passe telle que stockée dans la colonne `users.password`
/// SHA-256 encodé en hexadécimal minuscule (même résultat que `SHA2(x, 256)` côté SQL)
pub fn digest_password(password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize())
}
