use chrono::{DateTime, Utc};
use mongodb::bson::{self, doc, oid::ObjectId, Document};
use serde::{Deserialize, Serialize};

use super::to_chrono;

// 1. Document as stored in the `articles` collection
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub content: String,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub category: String,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub tags: Vec<String>,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub author_email: String,
    #[serde(default)]
    pub thumbnail: Option<String>,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub likes: i64,
    pub created_at: Option<bson::DateTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<bson::DateTime>,
}

// 2. Body of POST /api/articles. Caller-sent `likes`/`createdAt` are dropped.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateArticleSchema {
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub content: String,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub category: String,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub tags: Vec<String>,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub author_email: String,
    pub thumbnail: Option<String>,
}

impl CreateArticleSchema {
    pub fn into_article(self, now: bson::DateTime) -> Article {
        Article {
            id: None,
            title: self.title,
            content: self.content,
            category: self.category,
            tags: self.tags,
            author_email: self.author_email,
            thumbnail: self.thumbnail,
            likes: 0,
            created_at: Some(now),
            updated_at: None,
        }
    }
}

// 3. Body of PUT /api/articles/{id}
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateArticleSchema {
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub author_email: String,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub content: String,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub category: String,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub tags: Vec<String>,
    pub thumbnail: Option<String>,
}

impl UpdateArticleSchema {
    /// `$set` payload: the editable fields plus `updatedAt`, nothing else.
    pub fn to_update(&self, now: bson::DateTime) -> Document {
        doc! {
            "$set": {
                "title": &self.title,
                "content": &self.content,
                "category": &self.category,
                "tags": self.tags.clone(),
                "thumbnail": self.thumbnail.clone(),
                "updatedAt": now,
            }
        }
    }
}

// 4. Body of DELETE /api/articles/{id}
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteArticleSchema {
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub author_email: String,
}

// 5. Query string of GET /api/articles
#[derive(Debug, Default, Deserialize)]
pub struct ArticleFilter {
    pub email: Option<String>,
    pub category: Option<String>,
    /// `?tag=a&tag=b` or `?tag=a,b`; matches articles carrying any of them.
    #[serde(default)]
    pub tag: Vec<String>,
}

impl ArticleFilter {
    pub fn to_document(&self) -> Document {
        let mut filter = Document::new();

        if let Some(email) = &self.email {
            filter.insert("authorEmail", email);
        }
        if let Some(category) = &self.category {
            filter.insert("category", category);
        }

        let tags: Vec<&str> = self
            .tag
            .iter()
            .flat_map(|t| t.split(','))
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .collect();
        if !tags.is_empty() {
            filter.insert("tags", doc! { "$in": tags });
        }

        filter
    }
}

// 6. What goes back over the wire
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleResponse {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    pub content: String,
    pub category: String,
    pub tags: Vec<String>,
    pub author_email: String,
    pub thumbnail: Option<String>,
    pub likes: i64,
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<Article> for ArticleResponse {
    fn from(article: Article) -> Self {
        Self {
            id: article.id.map(|id| id.to_hex()).unwrap_or_default(),
            title: article.title,
            content: article.content,
            category: article.category,
            tags: article.tags,
            author_email: article.author_email,
            thumbnail: article.thumbnail,
            likes: article.likes,
            created_at: to_chrono(article.created_at),
            updated_at: to_chrono(article.updated_at),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::Bson;

    #[test]
    fn empty_filter_matches_everything() {
        assert!(ArticleFilter::default().to_document().is_empty());
    }

    #[test]
    fn filter_combines_email_category_and_tags() {
        let filter = ArticleFilter {
            email: Some("a@x.com".into()),
            category: Some("Tech".into()),
            tag: vec!["rust, web,,".into(), "go".into()],
        };

        assert_eq!(
            filter.to_document(),
            doc! {
                "authorEmail": "a@x.com",
                "category": "Tech",
                "tags": { "$in": ["rust", "web", "go"] },
            }
        );
    }

    #[test]
    fn blank_tag_param_is_ignored() {
        let filter = ArticleFilter {
            tag: vec![" , ".into(), String::new()],
            ..Default::default()
        };
        assert!(filter.to_document().is_empty());
    }

    #[test]
    fn create_resets_server_fields() {
        let body: CreateArticleSchema = serde_json::from_value(serde_json::json!({
            "title": "A",
            "authorEmail": "a@x.com",
            "category": "Tech",
            "likes": 99,
            "createdAt": "1999-01-01T00:00:00Z",
        }))
        .unwrap();

        let now = bson::DateTime::now();
        let article = body.into_article(now);

        assert_eq!(article.likes, 0);
        assert_eq!(article.created_at, Some(now));
        assert!(article.tags.is_empty());
        assert!(article.content.is_empty());
        assert!(article.id.is_none());
    }

    #[test]
    fn update_touches_only_editable_fields() {
        let body: UpdateArticleSchema = serde_json::from_value(serde_json::json!({
            "authorEmail": "a@x.com",
            "title": "B",
            "likes": 500,
        }))
        .unwrap();

        let update = body.to_update(bson::DateTime::now());
        let set = update.get_document("$set").unwrap();
        let mut keys: Vec<&str> = set.keys().map(String::as_str).collect();
        keys.sort_unstable();

        assert_eq!(
            keys,
            ["category", "content", "tags", "thumbnail", "title", "updatedAt"]
        );
        assert_eq!(set.get_str("title").unwrap(), "B");
    }

    #[test]
    fn null_fields_in_stored_article_read_as_defaults() {
        let stored = doc! {
            "_id": ObjectId::new(),
            "title": Bson::Null,
            "content": Bson::Null,
            "tags": Bson::Null,
            "authorEmail": "a@x.com",
            "thumbnail": Bson::Null,
            "likes": Bson::Null,
        };
        let article: Article = bson::from_document(stored).unwrap();

        assert!(article.title.is_empty());
        assert!(article.tags.is_empty());
        assert!(article.thumbnail.is_none());
        assert_eq!(article.likes, 0);
    }

    #[test]
    fn update_and_delete_bodies_tolerate_missing_email() {
        let update: UpdateArticleSchema =
            serde_json::from_value(serde_json::json!({ "title": "x" })).unwrap();
        assert!(update.author_email.is_empty());

        let delete: DeleteArticleSchema =
            serde_json::from_value(serde_json::json!({ "authorEmail": null })).unwrap();
        assert!(delete.author_email.is_empty());
    }

    #[test]
    fn legacy_document_with_missing_fields_still_reads() {
        let stored = doc! { "_id": ObjectId::new(), "title": "old", "likes": 3_i32 };
        let article: Article = bson::from_document(stored).unwrap();

        assert_eq!(article.likes, 3);
        assert!(article.tags.is_empty());
        assert!(article.created_at.is_none());
    }

    #[test]
    fn response_uses_hex_id_and_camel_case() {
        let oid = ObjectId::new();
        let article = Article {
            id: Some(oid),
            title: "A".into(),
            content: String::new(),
            category: "Tech".into(),
            tags: vec!["rust".into()],
            author_email: "a@x.com".into(),
            thumbnail: None,
            likes: 1,
            created_at: Some(bson::DateTime::now()),
            updated_at: None,
        };

        let json = serde_json::to_value(ArticleResponse::from(article)).unwrap();
        assert_eq!(json["_id"], oid.to_hex());
        assert_eq!(json["authorEmail"], "a@x.com");
        assert!(json.get("updatedAt").is_none());
        assert!(json["createdAt"].is_string());
    }
}
