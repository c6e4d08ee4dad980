use crate::auth::jwt::Claims;
use crate::config::Config;
use crate::error::ApiError;
use crate::model::role::Role;
use actix_web::{FromRequest, HttpRequest, dev::Payload, web::Data};
use futures::future::{Ready, ready};
use jsonwebtoken::decode;
use jsonwebtoken::{DecodingKey, Validation};

pub struct AuthUser {
    pub user_id: u64,
    pub email: String,
    pub role: Role,
}

impl FromRequest for AuthUser {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let token = match req
            .headers()
            .get("Authorization")
            .and_then(|h| h.to_str().ok())
            .and_then(|h| h.strip_prefix("Bearer "))
        {
            Some(t) => t,
            None => return ready(Err(ApiError::Unauthorized.into())),
        };

        let config = match req.app_data::<Data<Config>>() {
            Some(c) => c,
            None => {
                return ready(Err(actix_web::error::ErrorInternalServerError(
                    "Config missing",
                )));
            }
        };

        let data = match decode::<Claims>(
            token,
            &DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            &Validation::default(),
        ) {
            Ok(d) => d,
            Err(_) => return ready(Err(ApiError::Unauthorized.into())),
        };

        let role = match Role::from_id(data.claims.role) {
            Some(r) => r,
            None => return ready(Err(ApiError::Unauthorized.into())),
        };

        ready(Ok(AuthUser {
            user_id: data.claims.user_id,
            email: data.claims.sub,
            role,
        }))
    }
}

impl AuthUser {
    pub fn require_admin(&self) -> Result<(), ApiError> {
        if self.role == Role::Admin {
            Ok(())
        } else {
            Err(ApiError::Forbidden)
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::jwt::issue_test_token;
    use actix_web::HttpRequest;
    use actix_web::test::TestRequest;

    const SECRET: &str = "secret";

    fn test_config() -> Config {
        Config {
            database_url: String::new(),
            jwt_secret: SECRET.to_string(),
            server_addr: String::new(),
            rate_mutation_per_min: 60,
            rate_protected_per_min: 1000,
            api_prefix: "/api/v1".to_string(),
            default_leave_balance: 20,
            enforce_leave_balance: false,
        }
    }

    fn request_with(token: Option<&str>) -> HttpRequest {
        let mut req = TestRequest::default().app_data(Data::new(test_config()));
        if let Some(t) = token {
            req = req.insert_header(("Authorization", format!("Bearer {t}")));
        }
        req.to_http_request()
    }

    async fn extract(req: &HttpRequest) -> Result<AuthUser, actix_web::Error> {
        AuthUser::from_request(req, &mut Payload::None).await
    }

    #[actix_web::test]
    async fn extractor_reads_identity_from_the_bearer_token() {
        let token = issue_test_token(7, "jane@company.com", 2, SECRET);
        let user = extract(&request_with(Some(&token))).await.unwrap();
        assert_eq!(user.user_id, 7);
        assert_eq!(user.email, "jane@company.com");
        assert!(!user.is_admin());
    }

    #[actix_web::test]
    async fn admin_role_id_grants_admin() {
        let token = issue_test_token(1, "boss@company.com", 1, SECRET);
        let user = extract(&request_with(Some(&token))).await.unwrap();
        assert!(user.is_admin());
        assert!(user.require_admin().is_ok());
    }

    #[actix_web::test]
    async fn employee_cannot_pass_the_admin_gate() {
        let token = issue_test_token(7, "jane@company.com", 2, SECRET);
        let user = extract(&request_with(Some(&token))).await.unwrap();
        assert!(matches!(user.require_admin(), Err(ApiError::Forbidden)));
    }

    #[actix_web::test]
    async fn missing_header_is_unauthorized() {
        assert!(extract(&request_with(None)).await.is_err());
    }

    #[actix_web::test]
    async fn unknown_role_id_is_unauthorized() {
        let token = issue_test_token(7, "jane@company.com", 9, SECRET);
        assert!(extract(&request_with(Some(&token))).await.is_err());
    }
}
