//! HTTP handlers and route configuration.

mod authors;
mod health;
mod posts;

use actix_web::{HttpRequest, HttpResponse, web};
use uuid::Uuid;

use crate::middleware::error::{AppError, AppResult, bad_payload};

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(bad_payload))
        .app_data(web::QueryConfig::default().error_handler(bad_payload))
        .route("/health", web::get().to(health::health_check))
        .service(
            web::scope("/posts")
                .route("", web::get().to(posts::list_posts))
                .route("", web::post().to(posts::create_post))
                .route("/{id}", web::get().to(posts::get_post))
                .route("/{id}", web::put().to(posts::update_post))
                .route("/{id}", web::delete().to(posts::delete_post))
                .route("/{id}/comments", web::post().to(posts::add_comment)),
        )
        .service(
            web::scope("/authors")
                .route("", web::get().to(authors::list_authors))
                .route("", web::post().to(authors::create_author))
                .route("/{id}", web::get().to(authors::get_author))
                .route("/{id}", web::put().to(authors::update_author))
                .route("/{id}", web::delete().to(authors::delete_author))
                .route("/{id}/posts", web::get().to(authors::list_author_posts)),
        );
}

/// Fallback for unmatched routes.
pub async fn route_not_found(req: HttpRequest) -> AppResult<HttpResponse> {
    Err(AppError::NotFound(format!(
        "No route for {} {}",
        req.method(),
        req.path()
    )))
}

/// A path segment that is not a valid id can never resolve to a record.
fn path_id(raw: &str, entity_type: &'static str) -> AppResult<Uuid> {
    raw.parse()
        .map_err(|_| AppError::NotFound(format!("{entity_type} with id {raw} not found")))
}
