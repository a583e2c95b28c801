use axum::extract::{Json, Path};
use mongodb::bson::{doc, Document};
use serde_json::Value;

use crate::{
    db::Store,
    error::AppError,
    models::{
        user::{profile_to_json, upsert_update},
        UpsertAck,
    },
};

// PUT /api/users/{email}
pub async fn upsert_user_handler(
    store: Store,
    Path(email): Path<String>,
    Json(profile): Json<Document>,
) -> Result<Json<UpsertAck>, AppError> {
    let result = store
        .users
        .update_one(doc! { "email": &email }, upsert_update(&email, profile))
        .upsert(true)
        .await?;

    tracing::debug!(%email, created = result.upserted_id.is_some(), "user upserted");
    Ok(Json(result.into()))
}

// GET /api/users/{email} - `null` when there is no such user
pub async fn get_user_handler(
    store: Store,
    Path(email): Path<String>,
) -> Result<Json<Option<Value>>, AppError> {
    let user = store.users.find_one(doc! { "email": email }).await?;
    Ok(Json(user.map(profile_to_json)))
}
