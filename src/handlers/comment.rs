use axum::{
    extract::{Json, Path, Query},
    http::StatusCode,
};
use futures_util::TryStreamExt;
use mongodb::{
    bson::{self, doc},
    options::ReturnDocument,
};

use super::parse_id;
use crate::{
    db::Store,
    error::AppError,
    models::{
        comment::{Comment, CommentFilter, CommentResponse, CreateCommentSchema, UserCommentsFilter},
        DeleteAck, InsertAck,
    },
};

fn respond(comments: Vec<Comment>) -> Json<Vec<CommentResponse>> {
    Json(comments.into_iter().map(CommentResponse::from).collect())
}

// POST /api/comments
pub async fn create_comment_handler(
    store: Store,
    Json(body): Json<CreateCommentSchema>,
) -> Result<(StatusCode, Json<InsertAck>), AppError> {
    let comment = body.into_comment(bson::DateTime::now());
    let result = store.comments.insert_one(&comment).await?;

    let ack = InsertAck::from(result);
    tracing::info!(id = %ack.inserted_id, article = %comment.article_id, "comment created");
    Ok((StatusCode::CREATED, Json(ack)))
}

// GET /api/comments (?articleId=)
pub async fn list_comments_handler(
    store: Store,
    Query(filter): Query<CommentFilter>,
) -> Result<Json<Vec<CommentResponse>>, AppError> {
    let comments: Vec<Comment> = store
        .comments
        .find(filter.to_document())
        .sort(doc! { "createdAt": -1 })
        .await?
        .try_collect()
        .await?;

    Ok(respond(comments))
}

// GET /api/user-comments (?email=)
pub async fn list_user_comments_handler(
    store: Store,
    Query(filter): Query<UserCommentsFilter>,
) -> Result<Json<Vec<CommentResponse>>, AppError> {
    let comments: Vec<Comment> = store
        .comments
        .find(filter.to_document())
        .await?
        .try_collect()
        .await?;

    Ok(respond(comments))
}

// PATCH /api/comments/{id}/like
pub async fn like_comment_handler(
    store: Store,
    Path(id): Path<String>,
) -> Result<Json<CommentResponse>, AppError> {
    let id = parse_id(&id)?;
    let comment = store
        .comments
        .find_one_and_update(doc! { "_id": id }, doc! { "$inc": { "likes": 1 } })
        .return_document(ReturnDocument::After)
        .await?
        .ok_or(AppError::NotFound("Comment not found"))?;

    Ok(Json(comment.into()))
}

// DELETE /api/comments/{id} - no ownership check on comments
pub async fn delete_comment_handler(
    store: Store,
    Path(id): Path<String>,
) -> Result<Json<DeleteAck>, AppError> {
    let id = parse_id(&id)?;
    let result = store.comments.delete_one(doc! { "_id": id }).await?;

    Ok(Json(result.into()))
}
