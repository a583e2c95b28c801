use axum::{
    routing::{delete, get, patch},
    Router,
};

use crate::{
    handlers::{article, comment, root_handler, user},
    AppState,
};

pub fn create_routes(state: AppState) -> Router {
    // 1. Articles
    let article_routes = Router::new()
        .route(
            "/api/articles",
            get(article::list_articles_handler).post(article::create_article_handler),
        )
        .route("/articles", get(article::list_all_articles_handler))
        .route("/api/featured", get(article::featured_articles_handler))
        .route("/api/categories", get(article::list_categories_handler))
        .route("/api/category/{name}", get(article::articles_by_category_handler))
        .route("/api/tags", get(article::list_tags_handler))
        .route(
            "/api/articles/{id}",
            get(article::get_article_handler)
                .put(article::update_article_handler)
                .delete(article::delete_article_handler),
        )
        .route("/api/articles/{id}/like", patch(article::like_article_handler));

    // 2. Comments
    let comment_routes = Router::new()
        .route(
            "/api/comments",
            get(comment::list_comments_handler).post(comment::create_comment_handler),
        )
        .route("/api/user-comments", get(comment::list_user_comments_handler))
        .route("/api/comments/{id}", delete(comment::delete_comment_handler))
        .route("/api/comments/{id}/like", patch(comment::like_comment_handler));

    // 3. Users
    let user_routes = Router::new().route(
        "/api/users/{email}",
        get(user::get_user_handler).put(user::upsert_user_handler),
    );

    Router::new()
        .route("/", get(root_handler))
        .merge(article_routes)
        .merge(comment_routes)
        .merge(user_routes)
        .with_state(state)
}
