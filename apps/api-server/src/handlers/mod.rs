//! HTTP handlers and route configuration.

mod account;
mod auth;
mod comments;
mod health;
mod posts;
mod tags;
mod views;

use actix_web::{guard, web};

use quill_core::guard::{comment as comment_guard, post as post_guard};

use crate::middleware::gate::Gate;

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            // Public routes
            .route("/health", web::get().to(health::health_check))
            .service(
                web::scope("/auth")
                    .route("/register", web::post().to(auth::register))
                    .route("/login", web::post().to(auth::login))
                    .route("/logout", web::post().to(auth::logout))
                    .route("/me", web::get().to(auth::me)),
            )
            .route("/account", web::delete().to(account::delete_account))
            // Posts
            .service(
                web::resource("/posts")
                    .guard(guard::Post())
                    .wrap(Gate::new("write a post", post_guard::can_create))
                    .to(posts::create),
            )
            .route("/posts", web::get().to(posts::list))
            .service(
                web::resource("/posts/{id}")
                    .route(web::get().to(posts::detail))
                    .route(web::put().to(posts::update))
                    .route(web::delete().to(posts::delete)),
            )
            // Comments
            .service(
                web::resource("/posts/{id}/comments")
                    .wrap(Gate::new("comment", comment_guard::can_create))
                    .route(web::post().to(comments::create)),
            )
            .service(
                web::resource("/comments/{id}")
                    .route(web::put().to(comments::update))
                    .route(web::delete().to(comments::delete)),
            )
            // Tags & search
            .route("/tags", web::get().to(tags::list))
            .route("/tags/{slug}/posts", web::get().to(tags::posts))
            .route("/search/{q}", web::get().to(tags::search)),
    );
}
