use chrono::{DateTime, Utc};
use mongodb::bson::{self, doc, oid::ObjectId, Document};
use serde::{Deserialize, Serialize};

use super::to_chrono;

// Author fields are a snapshot taken when the comment is written.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub article_id: String,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub user_id: String,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub user_name: String,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub user_photo: String,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub comment_text: String,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub likes: i64,
    pub created_at: Option<bson::DateTime>,
    // Never written by this service; only documents from elsewhere carry it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_email: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCommentSchema {
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub article_id: String,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub user_id: String,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub user_name: String,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub user_photo: String,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub comment_text: String,
}

impl CreateCommentSchema {
    pub fn into_comment(self, now: bson::DateTime) -> Comment {
        Comment {
            id: None,
            article_id: self.article_id,
            user_id: self.user_id,
            user_name: self.user_name,
            user_photo: self.user_photo,
            comment_text: self.comment_text,
            likes: 0,
            created_at: Some(now),
            user_email: None,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentFilter {
    pub article_id: Option<String>,
}

impl CommentFilter {
    pub fn to_document(&self) -> Document {
        match &self.article_id {
            Some(article_id) => doc! { "articleId": article_id },
            None => Document::new(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct UserCommentsFilter {
    pub email: Option<String>,
}

impl UserCommentsFilter {
    /// Matches on `userEmail`. A missing `email` turns into a null match,
    /// which selects every comment lacking the field.
    pub fn to_document(&self) -> Document {
        doc! { "userEmail": self.email.clone() }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentResponse {
    #[serde(rename = "_id")]
    pub id: String,
    pub article_id: String,
    pub user_id: String,
    pub user_name: String,
    pub user_photo: String,
    pub comment_text: String,
    pub likes: i64,
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_email: Option<String>,
}

impl From<Comment> for CommentResponse {
    fn from(comment: Comment) -> Self {
        Self {
            id: comment.id.map(|id| id.to_hex()).unwrap_or_default(),
            article_id: comment.article_id,
            user_id: comment.user_id,
            user_name: comment.user_name,
            user_photo: comment.user_photo,
            comment_text: comment.comment_text,
            likes: comment.likes,
            created_at: to_chrono(comment.created_at),
            user_email: comment.user_email,
        }
    }
}
