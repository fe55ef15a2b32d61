use std::fmt;
use std::str::FromStr;

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::config;

/// Access levels carried in the token, weakest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccessLevel {
    Deny,
    Read,
    Edit,
    Full,
    Admin,
    Root,
}

impl AccessLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccessLevel::Deny => "deny",
            AccessLevel::Read => "read",
            AccessLevel::Edit => "edit",
            AccessLevel::Full => "full",
            AccessLevel::Admin => "admin",
            AccessLevel::Root => "root",
        }
    }

    /// Listing and viewing records: any active user.
    pub fn can_list(&self) -> bool {
        *self > AccessLevel::Deny
    }

    /// Bulk export is held to a stricter bar than listing.
    pub fn can_export(&self) -> bool {
        *self >= AccessLevel::Admin
    }
}

impl fmt::Display for AccessLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AccessLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "deny" => Ok(AccessLevel::Deny),
            "read" => Ok(AccessLevel::Read),
            "edit" => Ok(AccessLevel::Edit),
            "full" => Ok(AccessLevel::Full),
            "admin" => Ok(AccessLevel::Admin),
            "root" => Ok(AccessLevel::Root),
            other => Err(format!("Unknown access level '{}'", other)),
        }
    }
}

/// Reason an operation was refused. Shown to the caller as-is.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{reason}")]
pub struct AccessDenied {
    pub reason: String,
}

impl AccessDenied {
    pub fn new(reason: impl Into<String>) -> Self {
        Self { reason: reason.into() }
    }
}

/// Approves or refuses a CSV export before any record is read.
pub trait ExportGate: Send + Sync {
    fn check_export_authorized(&self) -> Result<(), AccessDenied>;

    /// Who is exporting, for log lines
    fn actor(&self) -> String;
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub tenant: String,
    pub user: String,
    pub access: AccessLevel,
    pub user_id: Uuid,
    pub exp: i64,
    pub iat: i64,
}

impl Claims {
    pub fn new(tenant: String, user: String, access: AccessLevel, user_id: Uuid) -> Self {
        let now = Utc::now();
        let expiry_hours = config::config().security.jwt_expiry_hours;
        let exp = (now + Duration::hours(expiry_hours as i64)).timestamp();

        Self {
            tenant,
            user,
            access,
            user_id,
            exp,
            iat: now.timestamp(),
        }
    }
}

#[derive(Debug, Error)]
pub enum JwtError {
    #[error("JWT generation error: {0}")]
    TokenGeneration(String),

    #[error("JWT secret not configured")]
    InvalidSecret,

    #[error("Invalid JWT token: {0}")]
    InvalidToken(String),
}

fn jwt_secret() -> Result<&'static str, JwtError> {
    match config::config().security.jwt_secret.as_deref() {
        Some(secret) if !secret.is_empty() => Ok(secret),
        _ => Err(JwtError::InvalidSecret),
    }
}

pub fn generate_jwt(claims: &Claims) -> Result<String, JwtError> {
    let encoding_key = EncodingKey::from_secret(jwt_secret()?.as_bytes());
    encode(&Header::default(), claims, &encoding_key).map_err(|e| JwtError::TokenGeneration(e.to_string()))
}

pub fn validate_jwt(token: &str) -> Result<Claims, JwtError> {
    let decoding_key = DecodingKey::from_secret(jwt_secret()?.as_bytes());
    decode::<Claims>(token, &decoding_key, &Validation::default())
        .map(|data| data.claims)
        .map_err(|e| JwtError::InvalidToken(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn access_levels_are_ordered() {
        assert!(AccessLevel::Deny < AccessLevel::Read);
        assert!(AccessLevel::Full < AccessLevel::Admin);
        assert!(AccessLevel::Admin < AccessLevel::Root);
    }

    #[test]
    fn export_requires_more_than_listing() {
        assert!(!AccessLevel::Deny.can_list());
        assert!(AccessLevel::Read.can_list());
        assert!(!AccessLevel::Full.can_export());
        assert!(AccessLevel::Admin.can_export());
        assert!(AccessLevel::Root.can_export());
    }

    #[test]
    fn parses_access_levels() {
        assert_eq!("ADMIN".parse::<AccessLevel>(), Ok(AccessLevel::Admin));
        assert!("superuser".parse::<AccessLevel>().is_err());
    }

    #[test]
    fn token_round_trip() {
        let claims = Claims::new("peso".into(), "officer".into(), AccessLevel::Edit, Uuid::new_v4());
        let token = generate_jwt(&claims).unwrap();
        let decoded = validate_jwt(&token).unwrap();
        assert_eq!(decoded.user, "officer");
        assert_eq!(decoded.access, AccessLevel::Edit);
    }

    #[test]
    fn rejects_tampered_token() {
        let claims = Claims::new("peso".into(), "officer".into(), AccessLevel::Read, Uuid::new_v4());
        let mut token = generate_jwt(&claims).unwrap();
        token.push('x');
        assert!(matches!(validate_jwt(&token), Err(JwtError::InvalidToken(_))));
    }
}
