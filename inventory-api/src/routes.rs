//! Route configuration
//!
//! Each domain (auth, users, stores, items, tags) manages its own routes.
//! Protected scopes are wrapped with the authorization gate at the
//! capability they require; `/refresh` is the only refresh-type scope and
//! item creation is the only fresh-gated scope.

use crate::handlers;
use crate::metrics::metrics_handler;
use crate::middleware::AuthGate;
use actix_web::{web, HttpResponse};

/// Configure all routes for the application
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg
        // Static/public endpoints
        .route("/metrics", web::get().to(metrics_handler))
        // API routes
        .service(
            web::scope("/api/v1")
                .route("/health", web::get().to(handlers::health_check))
                .route("/health/ready", web::get().to(handlers::readiness_check))
                .route("/openapi.json", web::get().to(openapi_handler))
                .configure(routes::auth::configure)
                .configure(routes::users::configure)
                // Tag routes nest under /store/{id}/tag and /item/{id}/tag
                // and must be registered ahead of the /store and /item
                // scopes to match first.
                .configure(routes::tags::configure)
                .configure(routes::stores::configure)
                .configure(routes::items::configure),
        );
}

/// OpenAPI JSON endpoint
async fn openapi_handler() -> HttpResponse {
    use utoipa::OpenApi;
    HttpResponse::Ok()
        .content_type("application/json")
        .json(crate::openapi::ApiDoc::openapi())
}

// Sub-modules for each domain
mod routes {
    use super::*;

    pub mod auth {
        use super::*;
        pub fn configure(cfg: &mut web::ServiceConfig) {
            cfg.service(
                web::scope("/auth")
                    .route("/register", web::post().to(handlers::register))
                    .route("/login", web::post().to(handlers::login))
                    .service(
                        web::scope("/refresh")
                            .wrap(AuthGate::refresh())
                            .route("", web::post().to(handlers::refresh_token)),
                    )
                    .service(
                        web::scope("/logout")
                            .wrap(AuthGate::access())
                            .route("", web::post().to(handlers::logout)),
                    ),
            );
        }
    }

    pub mod users {
        use super::*;
        pub fn configure(cfg: &mut web::ServiceConfig) {
            cfg.route("/user/{id}", web::get().to(handlers::get_user))
                .service(
                    web::scope("/user")
                        .wrap(AuthGate::access())
                        .route("/{id}", web::delete().to(handlers::delete_user)),
                );
        }
    }

    pub mod stores {
        use super::*;
        pub fn configure(cfg: &mut web::ServiceConfig) {
            cfg.route("/store", web::get().to(handlers::list_stores))
                .route("/store/{id}", web::get().to(handlers::get_store))
                .service(
                    web::scope("/store")
                        .wrap(AuthGate::access())
                        .route("", web::post().to(handlers::create_store))
                        .route("/{id}", web::delete().to(handlers::delete_store)),
                );
        }
    }

    pub mod items {
        use super::*;
        use actix_web::guard;

        pub fn configure(cfg: &mut web::ServiceConfig) {
            cfg.service(
                // Item creation demands a token minted directly from a
                // password login. The method guard keeps every other verb
                // falling through to the access-gated scope below.
                web::scope("/item")
                    .guard(guard::Post())
                    .wrap(AuthGate::fresh())
                    .route("", web::post().to(handlers::create_item)),
            )
            .service(
                web::scope("/item")
                    .wrap(AuthGate::access())
                    .route("", web::get().to(handlers::list_items))
                    .route("/{id}", web::get().to(handlers::get_item))
                    .route("/{id}", web::put().to(handlers::update_item))
                    .route("/{id}", web::delete().to(handlers::delete_item)),
            );
        }
    }

    pub mod tags {
        use super::*;
        pub fn configure(cfg: &mut web::ServiceConfig) {
            cfg.route(
                "/store/{store_id}/tag",
                web::get().to(handlers::list_tags_in_store),
            )
            .route(
                "/store/{store_id}/tag",
                web::post().to(handlers::create_tag_in_store),
            )
            .route("/tag/{id}", web::get().to(handlers::get_tag))
            .route("/tag/{id}", web::delete().to(handlers::delete_tag))
            .route(
                "/item/{item_id}/tag/{tag_id}",
                web::post().to(handlers::link_tag_to_item),
            )
            .route(
                "/item/{item_id}/tag/{tag_id}",
                web::delete().to(handlers::unlink_tag_from_item),
            );
        }
    }
}
