//! HTTP handlers and route configuration.

mod auth;
mod comments;
mod convert;
mod health;
mod posts;
mod uploads;

use actix_web::web;

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            // Public routes
            .route("/health", web::get().to(health::health_check))
            // Auth routes
            .service(
                web::scope("/auth")
                    .route("/register", web::post().to(auth::register))
                    .route("/login", web::post().to(auth::login))
                    .route("/me", web::get().to(auth::me)),
            )
            // Post routes; `/mine` must be registered before `/{slug}`
            .service(
                web::scope("/posts")
                    .route("", web::get().to(posts::list_published))
                    .route("", web::post().to(posts::create))
                    .route("/mine", web::get().to(posts::list_mine))
                    .route("/{slug}", web::get().to(posts::detail_by_slug))
                    .route("/{id}", web::put().to(posts::update))
                    .route("/{id}", web::delete().to(posts::delete))
                    .route("/{id}/publish", web::post().to(posts::publish))
                    .route("/{id}/unpublish", web::post().to(posts::unpublish)),
            )
            // Comment routes
            .service(
                web::scope("/comments")
                    .route("/{post_id}", web::post().to(comments::create))
                    .route("/{id}", web::delete().to(comments::delete)),
            )
            // Upload routes; payload cap above the 5 MiB image limit
            .service(
                web::scope("/uploads")
                    .app_data(web::PayloadConfig::new(6 * 1024 * 1024))
                    .route("/image", web::post().to(uploads::image)),
            ),
    );
}
