use crate::user::{Principal, TenantId, UserId};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use serde::Deserialize;
use serde::Serialize;

#[derive(Clone)]
pub struct JWTAuth {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

#[derive(Serialize, Deserialize)]
struct Claims {
    exp: usize,
    sub: UserId,
    tenant: TenantId,
}

impl JWTAuth {
    pub const EXPIRE_TIME: i64 = 30 * 24 * 60 * 60;

    pub fn from_secret(secret: Vec<u8>) -> JWTAuth {
        JWTAuth {
            encoding_key: EncodingKey::from_secret(&secret),
            decoding_key: DecodingKey::from_secret(&secret),
        }
    }

    pub fn create_token(&self, principal: &Principal) -> Result<String, jsonwebtoken::errors::Error> {
        let claims = Claims {
            exp: Self::generate_exp(),
            sub: principal.user_id.clone(),
            tenant: principal.tenant_id.clone(),
        };

        jsonwebtoken::encode(&Header::default(), &claims, &self.encoding_key)
    }

    pub fn validate_token(&self, token: &str) -> Result<Principal, jsonwebtoken::errors::Error> {
        let claim =
            jsonwebtoken::decode::<Claims>(token, &self.decoding_key, &Validation::default())?;
        Ok(Principal::new(claim.claims.sub, claim.claims.tenant))
    }

    fn generate_exp() -> usize {
        (chrono::Utc::now().timestamp() + Self::EXPIRE_TIME) as usize
    }
}

#[cfg(test)]
mod tests {
    use crate::auth::jwt::JWTAuth;
    use crate::user::Principal;
    use base64::Engine;

    fn jwt_auth() -> JWTAuth {
        let secret: [u8; 32] = rand::random();
        JWTAuth::from_secret(secret.to_vec())
    }

    #[test]
    fn valid_token() {
        let jwt_auth = jwt_auth();
        let principal = Principal::new("alice".into(), "family".into());

        let token = jwt_auth.create_token(&principal).unwrap();
        assert_eq!(jwt_auth.validate_token(&token), Ok(principal));
    }

    #[test]
    fn invalid_token() {
        let jwt_auth = jwt_auth();

        let token_bytes: [u8; 32] = rand::random();
        let base64_engine = base64::engine::general_purpose::STANDARD;
        let token = base64_engine.encode(token_bytes);
        assert!(jwt_auth.validate_token(&token).is_err())
    }

    #[test]
    fn token_from_other_secret() {
        let principal = Principal::new("alice".into(), "family".into());
        let token = jwt_auth().create_token(&principal).unwrap();
        assert!(jwt_auth().validate_token(&token).is_err())
    }
}
