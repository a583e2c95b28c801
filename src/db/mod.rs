use mongodb::{
    bson::{doc, Document},
    options::{ClientOptions, ServerApi, ServerApiVersion},
    Client, Collection, Database,
};

use crate::models::{article::Article, comment::Comment};

/// Typed handles to the three collections, cloned into every request.
#[derive(Clone)]
pub struct Store {
    pub articles: Collection<Article>,
    pub comments: Collection<Comment>,
    pub users: Collection<Document>,
}

impl Store {
    pub fn new(db: &Database) -> Self {
        Self {
            articles: db.collection("articles"),
            comments: db.collection("comments"),
            users: db.collection("users"),
        }
    }
}

// The driver connects lazily, so this only fails on a bad URI or an SRV
// lookup error. Reachability is checked by a background ping that never
// holds up the listener.
pub async fn connect(uri: &str, db_name: &str) -> mongodb::error::Result<Store> {
    let mut options = ClientOptions::parse(uri).await?;
    options.server_api = Some(
        ServerApi::builder()
            .version(ServerApiVersion::V1)
            .strict(true)
            .deprecation_errors(true)
            .build(),
    );

    let client = Client::with_options(options)?;

    let admin = client.database("admin");
    tokio::spawn(async move {
        match admin.run_command(doc! { "ping": 1 }).await {
            Ok(_) => tracing::info!("Pinged your deployment. You successfully connected to MongoDB!"),
            Err(e) => tracing::error!("MongoDB ping failed: {}", e),
        }
    });

    Ok(Store::new(&client.database(db_name)))
}
