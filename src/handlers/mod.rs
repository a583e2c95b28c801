pub mod article;
pub mod comment;
pub mod user;

use mongodb::bson::oid::ObjectId;

use crate::error::AppError;

// GET / - liveness check
pub async fn root_handler() -> &'static str {
    "UpStudy Code is Cooking!"
}

fn parse_id(id: &str) -> Result<ObjectId, AppError> {
    ObjectId::parse_str(id).map_err(|_| AppError::InvalidId)
}
