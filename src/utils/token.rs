// Jeton de session simulé pour l'exercice: "uid:<id>"
// Pas de signature, pas d'expiration, pas de stockage serveur.
// N'importe quel jeton bien formé donne l'identité qu'il annonce.

const PREFIX: &str = "uid:";

/// Génère le jeton d'un utilisateur
pub fn generate_token(user_id: i32) -> String {
    format!("{}{}", PREFIX, user_id)
}

/// Lit l'id contenu dans un jeton `uid:<chiffres>`
/// Retourne None si le format ne correspond pas (ou si l'id dépasse un i32)
pub fn verify_token(token: &str) -> Option<i32> {
    let digits = token.strip_prefix(PREFIX)?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse::<i32>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_and_verify_token() {
        let token = generate_token(42);
        assert_eq!(token, "uid:42");
        assert_eq!(verify_token(&token), Some(42));
    }

    #[test]
    fn test_invalid_tokens() {
        for token in ["", "uid:", "uid:-1", "uid:+3", "uid:12a", "uid: 1", "UID:1", "user:1", "uid:99999999999"] {
            assert_eq!(verify_token(token), None, "token {:?} should be rejected", token);
        }
    }

    #[test]
    fn test_token_for_unknown_user_is_still_valid() {
        assert_eq!(verify_token("uid:999999"), Some(999999));
    }
}
