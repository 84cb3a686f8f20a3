use std::sync::Arc;

use common::env_config::Config;
use middleware::auth::AuthMiddleware;

pub mod middleware {
    pub mod auth;
}

pub fn auth_middleware(config: Arc<Config>) -> AuthMiddleware {
    AuthMiddleware::new(config.identity_jwt_secret.clone())
}
