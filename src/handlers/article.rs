use axum::{
    body::Bytes,
    extract::{Json, Path},
    http::StatusCode,
};
use axum_extra::extract::Query;
use futures_util::TryStreamExt;
use mongodb::{
    bson::{self, doc, oid::ObjectId, Document},
    options::ReturnDocument,
};

use super::parse_id;
use crate::{
    db::Store,
    error::AppError,
    models::{
        article::{
            Article, ArticleFilter, ArticleResponse, CreateArticleSchema, DeleteArticleSchema,
            UpdateArticleSchema,
        },
        lenient_body, InsertAck, SuccessResponse,
    },
};

const FEATURED_LIMIT: i64 = 6;

fn newest_first() -> Document {
    doc! { "createdAt": -1 }
}

fn respond(articles: Vec<Article>) -> Json<Vec<ArticleResponse>> {
    Json(articles.into_iter().map(ArticleResponse::from).collect())
}

// GET /api/articles (?email=&category=&tag=a&tag=b or &tag=a,b)
pub async fn list_articles_handler(
    store: Store,
    Query(filter): Query<ArticleFilter>,
) -> Result<Json<Vec<ArticleResponse>>, AppError> {
    let articles: Vec<Article> = store
        .articles
        .find(filter.to_document())
        .sort(newest_first())
        .await?
        .try_collect()
        .await?;

    tracing::debug!(?filter, count = articles.len(), "listed articles");
    Ok(respond(articles))
}

// GET /articles - whole collection, natural order
pub async fn list_all_articles_handler(
    store: Store,
) -> Result<Json<Vec<ArticleResponse>>, AppError> {
    let articles: Vec<Article> = store.articles.find(doc! {}).await?.try_collect().await?;
    Ok(respond(articles))
}

// GET /api/featured - the six newest
pub async fn featured_articles_handler(
    store: Store,
) -> Result<Json<Vec<ArticleResponse>>, AppError> {
    let articles: Vec<Article> = store
        .articles
        .find(doc! {})
        .sort(newest_first())
        .limit(FEATURED_LIMIT)
        .await?
        .try_collect()
        .await?;

    Ok(respond(articles))
}

// GET /api/category/{name}
pub async fn articles_by_category_handler(
    store: Store,
    Path(name): Path<String>,
) -> Result<Json<Vec<ArticleResponse>>, AppError> {
    let articles: Vec<Article> = store
        .articles
        .find(doc! { "category": name })
        .await?
        .try_collect()
        .await?;

    Ok(respond(articles))
}

// Stable API v1 has no `distinct` command, so distinct values come from a
// $group stage. Arrays are unwound first so tags flatten across articles.
async fn distinct_strings(store: &Store, field: &str, unwind: bool) -> Result<Vec<String>, AppError> {
    let path = format!("${field}");
    let mut pipeline = Vec::with_capacity(4);
    if unwind {
        pipeline.push(doc! { "$unwind": &path });
    }
    let mut is_string = Document::new();
    is_string.insert(field, doc! { "$type": "string" });
    pipeline.push(doc! { "$match": is_string });
    pipeline.push(doc! { "$group": { "_id": &path } });
    pipeline.push(doc! { "$sort": { "_id": 1 } });

    let groups: Vec<Document> = store.articles.aggregate(pipeline).await?.try_collect().await?;

    Ok(groups
        .into_iter()
        .filter_map(|group| group.get_str("_id").ok().map(str::to_owned))
        .collect())
}

// GET /api/categories
pub async fn list_categories_handler(store: Store) -> Result<Json<Vec<String>>, AppError> {
    Ok(Json(distinct_strings(&store, "category", false).await?))
}

// GET /api/tags
pub async fn list_tags_handler(store: Store) -> Result<Json<Vec<String>>, AppError> {
    Ok(Json(distinct_strings(&store, "tags", true).await?))
}

// POST /api/articles
pub async fn create_article_handler(
    store: Store,
    Json(body): Json<CreateArticleSchema>,
) -> Result<(StatusCode, Json<InsertAck>), AppError> {
    let article = body.into_article(bson::DateTime::now());
    let result = store.articles.insert_one(&article).await?;

    let ack = InsertAck::from(result);
    tracing::info!(id = %ack.inserted_id, author = %article.author_email, "article created");
    Ok((StatusCode::CREATED, Json(ack)))
}

// GET /api/articles/{id}
pub async fn get_article_handler(
    store: Store,
    Path(id): Path<String>,
) -> Result<Json<ArticleResponse>, AppError> {
    let id = parse_id(&id)?;
    let article = store
        .articles
        .find_one(doc! { "_id": id })
        .await?
        .ok_or(AppError::NotFound("Article not found"))?;

    Ok(Json(article.into()))
}

// PATCH /api/articles/{id}/like - single $inc, so concurrent likes never collide
pub async fn like_article_handler(
    store: Store,
    Path(id): Path<String>,
) -> Result<Json<ArticleResponse>, AppError> {
    let id = parse_id(&id)?;
    let article = store
        .articles
        .find_one_and_update(doc! { "_id": id }, doc! { "$inc": { "likes": 1 } })
        .return_document(ReturnDocument::After)
        .await?
        .ok_or(AppError::NotFound("Article not found"))?;

    Ok(Json(article.into()))
}

/// Loads the article and checks `author_email` against its owner. A missing
/// article is reported before any ownership mismatch; an empty email never
/// owns anything.
async fn find_owned(store: &Store, id: ObjectId, author_email: &str) -> Result<Article, AppError> {
    let article = store
        .articles
        .find_one(doc! { "_id": id })
        .await?
        .ok_or(AppError::NotFound("Article not found"))?;

    if author_email.is_empty() || article.author_email != author_email {
        tracing::warn!(%id, "ownership check failed");
        return Err(AppError::Forbidden);
    }

    Ok(article)
}

// PUT /api/articles/{id}
pub async fn update_article_handler(
    store: Store,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<Json<SuccessResponse>, AppError> {
    let id = parse_id(&id)?;
    let body: UpdateArticleSchema = lenient_body(&body);
    find_owned(&store, id, &body.author_email).await?;

    let result = store
        .articles
        .update_one(doc! { "_id": id }, body.to_update(bson::DateTime::now()))
        .await?;

    // updatedAt is rewritten every time, so this is true for any owned article
    Ok(Json(SuccessResponse {
        success: result.modified_count > 0,
    }))
}

// DELETE /api/articles/{id} - comments on it are left behind
pub async fn delete_article_handler(
    store: Store,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<Json<SuccessResponse>, AppError> {
    let id = parse_id(&id)?;
    let body: DeleteArticleSchema = lenient_body(&body);
    find_owned(&store, id, &body.author_email).await?;

    let result = store.articles.delete_one(doc! { "_id": id }).await?;
    tracing::info!(%id, deleted = result.deleted_count, "article deleted");

    Ok(Json(SuccessResponse {
        success: result.deleted_count > 0,
    }))
}
