pub mod article;
pub mod comment;
pub mod user;

use chrono::{DateTime, Utc};
use mongodb::{
    bson::{self, Bson},
    results::{DeleteResult, InsertOneResult, UpdateResult},
};
use serde::{de::DeserializeOwned, Deserialize, Deserializer, Serialize};

/// `_id` values go out as plain hex strings rather than extended JSON.
pub fn id_to_string(id: &Bson) -> String {
    match id {
        Bson::ObjectId(oid) => oid.to_hex(),
        Bson::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Reads `null` the same as a missing key: the type's default.
pub fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// JSON body that may be absent or unparsable; either way it reads as the
/// default so the handler, not the extractor, decides the response.
pub fn lenient_body<T: DeserializeOwned + Default>(body: &[u8]) -> T {
    if body.iter().all(u8::is_ascii_whitespace) {
        return T::default();
    }
    serde_json::from_slice(body).unwrap_or_else(|e| {
        tracing::debug!("Ignoring unreadable body: {}", e);
        T::default()
    })
}

pub fn to_chrono(dt: Option<bson::DateTime>) -> Option<DateTime<Utc>> {
    dt.map(|d| d.to_chrono())
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertAck {
    pub acknowledged: bool,
    pub inserted_id: String,
}

impl From<InsertOneResult> for InsertAck {
    fn from(result: InsertOneResult) -> Self {
        Self {
            acknowledged: true,
            inserted_id: id_to_string(&result.inserted_id),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteAck {
    pub acknowledged: bool,
    pub deleted_count: u64,
}

impl From<DeleteResult> for DeleteAck {
    fn from(result: DeleteResult) -> Self {
        Self {
            acknowledged: true,
            deleted_count: result.deleted_count,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpsertAck {
    pub acknowledged: bool,
    pub matched_count: u64,
    pub modified_count: u64,
    pub upserted_id: Option<String>,
}

impl From<UpdateResult> for UpsertAck {
    fn from(result: UpdateResult) -> Self {
        Self {
            acknowledged: true,
            matched_count: result.matched_count,
            modified_count: result.modified_count,
            upserted_id: result.upserted_id.as_ref().map(id_to_string),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default, Deserialize, PartialEq)]
    struct Named {
        #[serde(default, deserialize_with = "null_as_default")]
        name: String,
    }

    #[test]
    fn null_reads_as_default() {
        let parsed: Named = serde_json::from_str(r#"{"name":null}"#).unwrap();
        assert_eq!(parsed, Named::default());

        let parsed: Named = serde_json::from_str("{}").unwrap();
        assert_eq!(parsed, Named::default());
    }

    #[test]
    fn lenient_body_defaults_empty_and_garbage() {
        assert_eq!(lenient_body::<Named>(b""), Named::default());
        assert_eq!(lenient_body::<Named>(b"  \n"), Named::default());
        assert_eq!(lenient_body::<Named>(b"{not json"), Named::default());
        assert_eq!(
            lenient_body::<Named>(br#"{"name":"ann"}"#),
            Named { name: "ann".into() }
        );
    }
}
