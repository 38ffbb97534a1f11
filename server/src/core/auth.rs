use crate::core::{AppError, AppState};
use crate::entities::Role;
use axum::extract::State;
use axum::{Error, body::Body, extract::Request, http, http::Response, middleware::Next};
use jsonwebtoken::{Algorithm, DecodingKey, TokenData, Validation, decode};
use serde::{Deserialize, Deserializer, Serialize};
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};

// struct che codifica il contenuto del token jwt emesso dall'identity provider
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub exp: usize, // Expiry time of the token
    pub iat: usize, // Issued at time of the token
    pub sub: String,
    #[serde(default, alias = "role", deserialize_with = "one_or_many_roles")]
    pub roles: Vec<Role>,
}

// identity providers issue either `"role": "Admin"` or `"roles": [...]`
fn one_or_many_roles<'de, D>(deserializer: D) -> Result<Vec<Role>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(Role),
        Many(Vec<Role>),
    }

    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::One(role) => vec![role],
        OneOrMany::Many(roles) => roles,
    })
}

/// Verified identity of whoever is calling a mail operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caller {
    pub user_id: String,
    pub roles: Vec<Role>,
}

impl Caller {
    pub fn new(user_id: impl Into<String>, roles: Vec<Role>) -> Self {
        Self {
            user_id: user_id.into(),
            roles,
        }
    }

    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }

    pub fn is_admin(&self) -> bool {
        self.has_role(Role::Admin)
    }
}

impl From<Claims> for Caller {
    fn from(claims: Claims) -> Self {
        Self::new(claims.sub, claims.roles)
    }
}

/// Token verification settings
#[derive(Debug, Clone)]
pub struct JwtSettings {
    pub secret: String,
    pub issuer: Option<String>,
    pub audience: Option<String>,
}

impl JwtSettings {
    fn validation(&self) -> Validation {
        let mut validation = Validation::new(Algorithm::HS256);
        // configured claims must be present, not only correct when present
        let mut required = vec!["exp"];
        match &self.issuer {
            Some(issuer) => {
                validation.set_issuer(&[issuer]);
                required.push("iss");
            }
            None => validation.iss = None,
        }
        match &self.audience {
            Some(audience) => {
                validation.set_audience(&[audience]);
                required.push("aud");
            }
            None => validation.validate_aud = false,
        }
        validation.set_required_spec_claims(&required);
        validation
    }
}

#[instrument(skip(jwt_token, settings))]
pub fn decode_jwt(jwt_token: &str, settings: &JwtSettings) -> Result<TokenData<Claims>, Error> {
    debug!("Decoding JWT token");
    decode::<Claims>(
        jwt_token,
        &DecodingKey::from_secret(settings.secret.as_ref()),
        &settings.validation(),
    )
    .map(|data| {
        info!("JWT token decoded successfully for user: {}", data.claims.sub);
        data
    })
    .map_err(|e| {
        error!("Failed to decode JWT token: {:?}", e);
        Error::new("Error in decoding jwt token")
    })
}

/// Bearer token from the Authorization header, or the `access_token` query
/// parameter (browsers cannot set headers on a WebSocket upgrade).
fn extract_token(req: &Request) -> Result<Option<String>, AppError> {
    if let Some(header) = req.headers().get(http::header::AUTHORIZATION) {
        let header = header.to_str().map_err(|_| {
            warn!("Invalid authorization header format");
            AppError::forbidden("Empty header is not allowed")
        })?;
        let mut parts = header.split_whitespace();
        return match (parts.next(), parts.next()) {
            (Some(scheme), Some(token)) if scheme.eq_ignore_ascii_case("bearer") => {
                Ok(Some(token.to_string()))
            }
            _ => {
                warn!("Malformed authorization header");
                Err(AppError::unauthorized("Malformed authorization header"))
            }
        };
    }

    Ok(req.uri().query().and_then(|query| {
        query.split('&').find_map(|pair| {
            pair.strip_prefix("access_token=")
                .filter(|token| !token.is_empty())
                .map(str::to_string)
        })
    }))
}

#[instrument(skip(state, req, next))]
pub async fn authentication_middleware(
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Result<Response<Body>, AppError> {
    debug!("Running authentication middleware");
    let Some(token) = extract_token(&req)? else {
        warn!("Missing authorization header");
        return Err(AppError::forbidden("Please add the JWT token to the header"));
    };

    let token_data = decode_jwt(&token, &state.jwt).map_err(|_| {
        warn!("Failed to decode JWT token");
        AppError::unauthorized("Unable to decode token")
    })?;

    // the subject must still exist in the directory
    if state
        .directory
        .find(&token_data.claims.sub)
        .await?
        .is_none()
    {
        warn!("User not found in directory: {}", token_data.claims.sub);
        return Err(AppError::unauthorized("You are not an authorized user"));
    }

    let caller = Caller::from(token_data.claims);
    info!(user_id = %caller.user_id, roles = ?caller.roles, "User authenticated");
    req.extensions_mut().insert(caller);
    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use jsonwebtoken::{EncodingKey, Header, encode};

    fn settings() -> JwtSettings {
        JwtSettings {
            secret: "test-secret".to_string(),
            issuer: None,
            audience: None,
        }
    }

    fn token(secret: &str, roles: Vec<Role>) -> String {
        let now = Utc::now();
        let claims = Claims {
            exp: (now + Duration::hours(1)).timestamp() as usize,
            iat: now.timestamp() as usize,
            sub: "user-1".to_string(),
            roles,
        };
        encode(&Header::default(), &claims, &EncodingKey::from_secret(secret.as_bytes())).unwrap()
    }

    #[test]
    fn decodes_roles_into_caller() {
        let data = decode_jwt(&token("test-secret", vec![Role::Admin]), &settings()).unwrap();
        let caller = Caller::from(data.claims);
        assert_eq!(caller.user_id, "user-1");
        assert!(caller.is_admin());
        assert!(!caller.has_role(Role::Parent));
    }

    #[test]
    fn rejects_tokens_signed_with_another_secret() {
        assert!(decode_jwt(&token("other", vec![]), &settings()).is_err());
    }

    fn signed(claims: serde_json::Value) -> String {
        encode(&Header::default(), &claims, &EncodingKey::from_secret(b"test-secret")).unwrap()
    }

    fn claims_with(extra: serde_json::Value) -> serde_json::Value {
        let now = Utc::now();
        let mut claims = serde_json::json!({
            "exp": (now + Duration::hours(1)).timestamp(),
            "iat": now.timestamp(),
            "sub": "user-1",
            "roles": ["Parent"],
        });
        if let (Some(claims), Some(extra)) = (claims.as_object_mut(), extra.as_object()) {
            claims.extend(extra.clone());
        }
        claims
    }

    #[test]
    fn missing_issuer_is_rejected_when_configured() {
        let mut settings = settings();
        settings.issuer = Some("daycare-identity".to_string());

        assert!(decode_jwt(&token("test-secret", vec![]), &settings).is_err());
        let wrong = signed(claims_with(serde_json::json!({ "iss": "someone-else" })));
        assert!(decode_jwt(&wrong, &settings).is_err());
        let right = signed(claims_with(serde_json::json!({ "iss": "daycare-identity" })));
        assert!(decode_jwt(&right, &settings).is_ok());
    }

    #[test]
    fn missing_audience_is_rejected_when_configured() {
        let mut settings = settings();
        settings.audience = Some("daycare-mail".to_string());

        assert!(decode_jwt(&token("test-secret", vec![]), &settings).is_err());
        let wrong = signed(claims_with(serde_json::json!({ "aud": "another-app" })));
        assert!(decode_jwt(&wrong, &settings).is_err());
        let right = signed(claims_with(serde_json::json!({ "aud": "daycare-mail" })));
        assert!(decode_jwt(&right, &settings).is_ok());
    }

    #[test]
    fn iss_and_aud_are_optional_when_not_configured() {
        let data = decode_jwt(&token("test-secret", vec![]), &settings()).unwrap();
        assert_eq!(data.claims.sub, "user-1");
    }

    #[test]
    fn single_role_claim_is_accepted() {
        let now = Utc::now();
        let token = signed(serde_json::json!({
            "exp": (now + Duration::hours(1)).timestamp(),
            "iat": now.timestamp(),
            "sub": "user-1",
            "role": "Admin",
        }));
        let caller = Caller::from(decode_jwt(&token, &settings()).unwrap().claims);
        assert_eq!(caller.roles, vec![Role::Admin]);

        let no_roles = signed(serde_json::json!({
            "exp": (now + Duration::hours(1)).timestamp(),
            "iat": now.timestamp(),
            "sub": "user-1",
        }));
        assert!(Caller::from(decode_jwt(&no_roles, &settings()).unwrap().claims).roles.is_empty());
    }

    #[test]
    fn token_can_come_from_query_string() {
        let req = http::Request::builder()
            .uri("/ws?foo=bar&access_token=abc")
            .body(Body::empty())
            .unwrap();
        assert_eq!(extract_token(&req).ok().flatten().as_deref(), Some("abc"));

        let req = http::Request::builder()
            .uri("/ws")
            .header(http::header::AUTHORIZATION, "Bearer xyz")
            .body(Body::empty())
            .unwrap();
        assert_eq!(extract_token(&req).ok().flatten().as_deref(), Some("xyz"));

        let req = http::Request::builder().uri("/ws").body(Body::empty()).unwrap();
        assert_eq!(extract_token(&req).ok().flatten(), None);
    }
}
