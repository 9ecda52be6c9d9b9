use super::Claims;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::EncodingKey;
use jsonwebtoken::Validation;

/// JWT signing and verification. Reads its signing key from `JWT_SECRET`
/// at construction so a misconfigured deployment fails at startup rather
/// than minting tokens nobody can later validate.
pub struct Crypto {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl Crypto {
    pub fn new(secret: &str) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
        }
    }
    /// Reads `JWT_SECRET` from the environment. Panics if unset -- there is
    /// no safe default for a signing key.
    pub fn from_env() -> Self {
        let secret = std::env::var("JWT_SECRET").expect("JWT_SECRET must be set");
        Self::new(&secret)
    }
    pub fn encode(&self, claims: &Claims) -> jsonwebtoken::errors::Result<String> {
        jsonwebtoken::encode(&jsonwebtoken::Header::default(), claims, &self.encoding)
    }
    pub fn decode(&self, token: &str) -> jsonwebtoken::errors::Result<Claims> {
        jsonwebtoken::decode::<Claims>(token, &self.decoding, &Validation::default())
            .map(|data| data.claims)
    }
    /// How long an issued session stays valid. Backed by `AUTH_SESSION_TTL`
    /// (seconds), defaulting to [`felt_core::AUTH_SESSION_TTL_SECS`].
    pub fn duration() -> std::time::Duration {
        std::env::var("AUTH_SESSION_TTL")
            .ok()
            .and_then(|s| s.parse().ok())
            .map(std::time::Duration::from_secs)
            .unwrap_or(std::time::Duration::from_secs(
                felt_core::AUTH_SESSION_TTL_SECS,
            ))
    }
    /// Hashes an opaque token for storage; sessions persist this, never the
    /// bearer token itself.
    pub fn hash(token: &str) -> String {
        use sha2::Digest;
        let digest = sha2::Sha256::digest(token.as_bytes());
        format!("{:x}", digest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use felt_core::ID;

    #[test]
    fn encodes_and_decodes_roundtrip() {
        let crypto = Crypto::new("test-secret");
        let claims = Claims::new(ID::default(), ID::default(), "alice".into());
        let token = crypto.encode(&claims).unwrap();
        let decoded = crypto.decode(&token).unwrap();
        assert_eq!(decoded.usr, "alice");
    }

    #[test]
    fn rejects_token_signed_with_different_secret() {
        let a = Crypto::new("secret-a");
        let b = Crypto::new("secret-b");
        let claims = Claims::new(ID::default(), ID::default(), "alice".into());
        let token = a.encode(&claims).unwrap();
        assert!(b.decode(&token).is_err());
    }

    #[test]
    fn hash_is_deterministic() {
        assert_eq!(Crypto::hash("abc"), Crypto::hash("abc"));
        assert_ne!(Crypto::hash("abc"), Crypto::hash("def"));
    }
}
