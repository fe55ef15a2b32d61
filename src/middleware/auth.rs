use axum::{
    extract::Request,
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::auth::{validate_jwt, AccessDenied, AccessLevel, Claims, ExportGate};
use crate::error::ApiError;

/// Authenticated user context extracted from JWT
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub tenant: String,
    pub user: String,
    pub access: AccessLevel,
    pub user_id: Uuid,
}

impl From<Claims> for AuthUser {
    fn from(claims: Claims) -> Self {
        Self {
            tenant: claims.tenant,
            user: claims.user,
            access: claims.access,
            user_id: claims.user_id,
        }
    }
}

impl AuthUser {
    pub fn require_list_access(&self) -> Result<(), AccessDenied> {
        if self.access.can_list() {
            Ok(())
        } else {
            Err(AccessDenied::new("Your account does not have access to jobseeker records"))
        }
    }
}

impl ExportGate for AuthUser {
    fn check_export_authorized(&self) -> Result<(), AccessDenied> {
        if self.access.can_export() {
            Ok(())
        } else {
            Err(AccessDenied::new(format!(
                "Exporting jobseeker records requires admin access (current access: {})",
                self.access
            )))
        }
    }

    fn actor(&self) -> String {
        format!("{}/{}", self.tenant, self.user)
    }
}

/// JWT authentication middleware that validates tokens and extracts user context
pub async fn jwt_auth_middleware(
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_jwt_from_headers(&headers).map_err(ApiError::unauthorized)?;
    let claims = validate_jwt(&token).map_err(|e| ApiError::unauthorized(e.to_string()))?;

    // Convert claims to AuthUser and inject into request
    request.extensions_mut().insert(AuthUser::from(claims));

    Ok(next.run(request).await)
}

/// Extract JWT token from Authorization header
fn extract_jwt_from_headers(headers: &HeaderMap) -> Result<String, String> {
    let auth_header = headers
        .get(axum::http::header::AUTHORIZATION)
        .ok_or_else(|| "Missing Authorization header".to_string())?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| "Invalid Authorization header format".to_string())?;

    if let Some(token) = auth_str.strip_prefix("Bearer ") {
        if token.trim().is_empty() {
            return Err("Empty JWT token".to_string());
        }
        Ok(token.trim().to_string())
    } else {
        Err("Authorization header must use Bearer token format".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn user(access: AccessLevel) -> AuthUser {
        AuthUser {
            tenant: "peso".to_string(),
            user: "officer".to_string(),
            access,
            user_id: Uuid::nil(),
        }
    }

    #[test]
    fn export_gate_requires_admin() {
        assert!(user(AccessLevel::Admin).check_export_authorized().is_ok());
        assert!(user(AccessLevel::Root).check_export_authorized().is_ok());

        let denied = user(AccessLevel::Full).check_export_authorized().unwrap_err();
        assert!(denied.reason.contains("requires admin access"));
        assert!(user(AccessLevel::Read).require_list_access().is_ok());
        assert!(user(AccessLevel::Deny).require_list_access().is_err());
    }

    #[test]
    fn actor_names_tenant_and_user() {
        assert_eq!(user(AccessLevel::Admin).actor(), "peso/officer");
    }

    #[test]
    fn extracts_bearer_token() {
        let mut headers = HeaderMap::new();
        assert!(extract_jwt_from_headers(&headers).is_err());

        headers.insert("authorization", HeaderValue::from_static("Basic abc"));
        assert!(extract_jwt_from_headers(&headers).is_err());

        headers.insert("authorization", HeaderValue::from_static("Bearer abc.def.ghi"));
        assert_eq!(extract_jwt_from_headers(&headers).unwrap(), "abc.def.ghi");
    }
}
