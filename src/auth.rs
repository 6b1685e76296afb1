use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

// Claims carried inside an access token
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: usize,
}

// Hash a password with Argon2id and a fresh random salt; the salt and
// parameters are embedded in the returned PHC string.
pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default().hash_password(password.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

// Verify a password against a stored PHC string. A malformed hash counts
// as a mismatch instead of an error.
pub fn verify_password(password: &str, hashed_password: &str) -> bool {
    PasswordHash::new(hashed_password)
        .and_then(|parsed| Argon2::default().verify_password(password.as_bytes(), &parsed))
        .is_ok()
}

// Mint an HS256 token for the given subject, expiring after ttl_minutes
pub fn create_access_token(
    secret: &str,
    sub: &str,
    ttl_minutes: i64,
) -> Result<String, jsonwebtoken::errors::Error> {
    let exp = (Utc::now() + Duration::minutes(ttl_minutes)).timestamp();
    let claims = Claims {
        sub: sub.to_owned(),
        exp: exp as usize,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}

// Check signature and expiry and return the claims. Pure function, no
// store access; the caller decides what a failure means.
pub fn decode_token(secret: &str, token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )?;
    Ok(data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret";

    #[test]
    fn password_round_trip() {
        let hash = hash_password("pw1").unwrap();
        assert!(verify_password("pw1", &hash));
        assert!(!verify_password("pw2", &hash));
    }

    #[test]
    fn hashes_embed_fresh_salts() {
        let first = hash_password("pw1").unwrap();
        let second = hash_password("pw1").unwrap();
        assert_ne!(first, second);
        assert!(verify_password("pw1", &first));
        assert!(verify_password("pw1", &second));
    }

    #[test]
    fn malformed_hash_is_a_mismatch() {
        assert!(!verify_password("pw1", ""));
        assert!(!verify_password("pw1", "not-a-phc-string"));
    }

    #[test]
    fn token_round_trip_keeps_subject() {
        let token = create_access_token(SECRET, "alice", 60).unwrap();
        let claims = decode_token(SECRET, &token).unwrap();
        assert_eq!(claims.sub, "alice");
    }

    #[test]
    fn expired_token_is_rejected() {
        // exp two minutes in the past, beyond the default 60s leeway
        let token = create_access_token(SECRET, "alice", -2).unwrap();
        assert!(decode_token(SECRET, &token).is_err());
    }

    #[test]
    fn tampered_signature_is_rejected() {
        let token = create_access_token(SECRET, "alice", 60).unwrap();
        let parts: Vec<&str> = token.split('.').collect();
        let signature = parts[2];
        let flipped = if signature.as_bytes()[0] == b'A' { 'B' } else { 'A' };
        let tampered = format!("{}.{}.{}{}", parts[0], parts[1], flipped, &signature[1..]);
        assert!(decode_token(SECRET, &tampered).is_err());
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let token = create_access_token(SECRET, "alice", 60).unwrap();
        assert!(decode_token("another-secret", &token).is_err());
    }

    #[test]
    fn token_without_subject_is_rejected() {
        #[derive(Serialize)]
        struct NoSubject {
            exp: usize,
        }
        let exp = (Utc::now() + Duration::minutes(60)).timestamp() as usize;
        let token = encode(
            &Header::default(),
            &NoSubject { exp },
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();
        assert!(decode_token(SECRET, &token).is_err());
    }
}
