//! HTTP handlers and route configuration.

mod auth;
mod blogs;
mod comments;
mod health;

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
                    .route("/login", web::post().to(auth::login)),
            )
            // Blog routes. The comments scope is registered first so the
            // literal "comments" segment is not captured as a blog id.
            .service(
                web::scope("/blogs")
                    .service(
                        web::scope("/comments")
                            .route("/{blog_id}", web::post().to(comments::create_comment))
                            .route("/{blog_id}", web::get().to(comments::list_comments))
                            .route(
                                "/{blog_id}/{comment_id}",
                                web::put().to(comments::update_comment),
                            )
                            .route(
                                "/{blog_id}/{comment_id}",
                                web::delete().to(comments::delete_comment),
                            ),
                    )
                    .route("", web::post().to(blogs::create_post))
                    .route("", web::get().to(blogs::list_posts))
                    .route("/{id}", web::get().to(blogs::get_post))
                    .route("/{id}", web::put().to(blogs::update_post))
                    .route("/{id}", web::delete().to(blogs::delete_post)),
            ),
    );
}
