use std::{future::Future, pin::Pin, rc::Rc, sync::Arc};

use actix_web::{
    Error, HttpMessage, HttpResponse,
    dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready},
};
use futures::future::{Ready, ok};

use common::jwt;

/// Verifies the identity provider's bearer token on secured paths and
/// injects the resulting claims into request extensions.
pub struct AuthMiddleware {
    jwt_secret: Rc<String>,
}

impl AuthMiddleware {
    pub fn new(jwt_secret: String) -> Self {
        AuthMiddleware {
            jwt_secret: Rc::new(jwt_secret),
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: actix_web::body::MessageBody + 'static,
{
    type Response = ServiceResponse<actix_web::body::BoxBody>;
    type Error = Error;
    type Transform = AuthMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ok(AuthMiddlewareService {
            service: Arc::new(service),
            jwt_secret: self.jwt_secret.clone(),
        })
    }
}

pub struct AuthMiddlewareService<S> {
    service: Arc<S>,
    jwt_secret: Rc<String>,
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: actix_web::body::MessageBody + 'static,
{
    type Response = ServiceResponse<actix_web::body::BoxBody>;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        // only require authorization for paths containing "/api/secured"
        let path = req.path();
        let jwt_secret = self.jwt_secret.clone();

        if !path.contains("/api/secured") {
            let fut = self.service.call(req);
            return Box::pin(async move { fut.await.map(|res| res.map_into_boxed_body()) });
        }

        let token_value = req
            .headers()
            .get("Authorization")
            .and_then(|header| header.to_str().ok())
            .and_then(|header| {
                if header.starts_with("Bearer ") {
                    Some(header[7..].to_string())
                } else {
                    None
                }
            });

        let srv = Arc::clone(&self.service);

        Box::pin(async move {
            if let Some(token) = token_value {
                // validate token and insert claims to request object for future usage
                match jwt::validate_token(&token, &jwt_secret) {
                    Ok(claims) => {
                        req.extensions_mut().insert(claims);
                        srv.call(req).await.map(|res| res.map_into_boxed_body())
                    }
                    Err(_) => {
                        let response = HttpResponse::Unauthorized()
                            .json(serde_json::json!({"error": "Invalid token"}))
                            .map_into_boxed_body();
                        Ok(req.into_response(response))
                    }
                }
            } else {
                // no token passed - 401
                let response = HttpResponse::Unauthorized()
                    .json(serde_json::json!({"error": "No authorization token provided"}))
                    .map_into_boxed_body();
                Ok(req.into_response(response))
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{App, HttpResponse, test, web};
    use common::jwt::Claims;
    use uuid::Uuid;

    async fn whoami(claims: web::ReqData<Claims>) -> HttpResponse {
        HttpResponse::Ok().json(serde_json::json!({ "user_id": claims.sub }))
    }

    #[actix_web::test]
    async fn secured_path_rejects_missing_token() {
        let app = test::init_service(
            App::new()
                .wrap(AuthMiddleware::new("secret".to_string()))
                .route("/api/secured/whoami", web::get().to(whoami)),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/api/secured/whoami")
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), 401);
    }

    #[actix_web::test]
    async fn secured_path_accepts_valid_token() {
        let user_id = Uuid::new_v4();
        let token = common::jwt::generate_token(user_id, "member@example.com", "secret").unwrap();

        let app = test::init_service(
            App::new()
                .wrap(AuthMiddleware::new("secret".to_string()))
                .route("/api/secured/whoami", web::get().to(whoami)),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/api/secured/whoami")
            .insert_header(("Authorization", format!("Bearer {}", token)))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), 200);
    }

    #[actix_web::test]
    async fn public_path_passes_through() {
        let app = test::init_service(
            App::new()
                .wrap(AuthMiddleware::new("secret".to_string()))
                .route(
                    "/api/pay/webhook",
                    web::post().to(|| async { HttpResponse::Ok().finish() }),
                ),
        )
        .await;

        let req = test::TestRequest::post().uri("/api/pay/webhook").to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), 200);
    }
}
