use mongodb::bson::{doc, Bson, Document};
use serde_json::Value;

// Profiles are free-form: whatever the client sends is stored as-is.

/// Update for `PUT /api/users/{email}`. Top-level keys of the body are set
/// on the document; `_id` is never written and `email` falls back to the
/// path value so an upsert always carries its key.
pub fn upsert_update(email: &str, mut profile: Document) -> Document {
    profile.remove("_id");
    if !profile.contains_key("email") {
        profile.insert("email", email);
    }
    doc! { "$set": profile }
}

/// Stored profile as JSON, `_id` flattened to its hex form.
pub fn profile_to_json(mut profile: Document) -> Value {
    if let Some(Bson::ObjectId(oid)) = profile.get("_id") {
        let hex = oid.to_hex();
        profile.insert("_id", hex);
    }
    Bson::Document(profile).into_relaxed_extjson()
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::oid::ObjectId;

    #[test]
    fn upsert_sets_body_and_defaults_email() {
        let update = upsert_update("ann@x.com", doc! { "_id": "spoofed", "name": "Ann" });
        assert_eq!(
            update,
            doc! { "$set": { "name": "Ann", "email": "ann@x.com" } }
        );
    }

    #[test]
    fn upsert_keeps_body_email() {
        let update = upsert_update("ann@x.com", doc! { "email": "ann@y.com" });
        assert_eq!(update, doc! { "$set": { "email": "ann@y.com" } });
    }

    #[test]
    fn profile_json_flattens_object_id() {
        let oid = ObjectId::new();
        let json = profile_to_json(doc! { "_id": oid, "email": "ann@x.com", "age": 30 });

        assert_eq!(json["_id"], oid.to_hex());
        assert_eq!(json["email"], "ann@x.com");
        assert_eq!(json["age"], 30);
    }
}
