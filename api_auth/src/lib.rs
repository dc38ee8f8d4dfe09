use actix_web::web;

use middleware::auth::AuthMiddleware;

pub mod middleware {
    pub mod auth;
}

pub mod routes {
    pub mod auth;
}

mod services {
    pub(crate) mod auth;
}

mod dtos {
    pub(crate) mod auth;
}

pub fn mount_auth() -> actix_web::Scope {
    web::scope("/auth")
        .service(routes::auth::post_login)
        .service(routes::auth::post_forgot_password)
        .service(routes::auth::post_reset_password)
}

/// Validates bearer JWTs for everything under the dashboard and admin scopes.
pub fn auth_middleware(jwt_secret: String) -> AuthMiddleware {
    AuthMiddleware::new(jwt_secret)
}
