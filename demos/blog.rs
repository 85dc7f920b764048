//! Blog demo
//!
//! Expects a MySQL server with a `blog` database exposing the procedures
//! `Author_load`, `Author_create`, `Author_save`, `Author_delete` and
//! `Article_list_v2`. Connection settings come from `$DBABLE_CONFIG` or
//! `./dbable.toml`.
//!
//! Run with `RUST_LOG=dbable=debug,db_object=debug cargo run --example blog`.

use dbable::prelude::*;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Default, Serialize, Deserialize, Entity)]
#[entity(database = "blog")]
#[load(id)]
#[create(email, display_name, profile)]
#[save(id, email, display_name, profile)]
#[delete(id)]
pub struct Author {
    pub id: Option<i64>,
    pub email: String,
    pub display_name: String,
    pub profile: Option<serde_json::Value>,
    pub joined_at: Option<chrono::NaiveDateTime>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Entity)]
#[entity(database = "blog", extra = "article_cursor")]
#[scrollable(author_id, after, limit, version = 2, cursor = id)]
pub struct Article {
    pub id: i64,
    pub author_id: i64,
    pub title: String,
    pub tags: Vec<String>,
}

fn article_cursor() -> Restrictions {
    Restrictions::new()
        .field("after", Restriction::int().with_default(0))
        .field("limit", Restriction::int().with_default(25))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut dbable = DbAble::from_config().await?;
    dbable.health_check().await?;

    let authors = dbable.register_store::<Author>("authors")?;
    let articles = dbable.register_store::<Article>("articles")?;

    let Some(mut author) = authors
        .create(json!({
            "email": "grace@example.com",
            "display_name": "Grace",
            "profile": {"languages": ["COBOL", "FLOW-MATIC"]},
        }))
        .await?
    else {
        println!("Author_create returned no row");
        return Ok(());
    };
    println!("Created author {:?} at {:?}", author.id, author.joined_at);

    author.display_name = "Grace Hopper".to_string();
    authors.save(&mut author).await?;

    let mut count = 0;
    let mut stream = articles.yield_all(json!({"author_id": author.id, "limit": 10}));
    while let Some(article) = stream.try_next().await? {
        count += 1;
        println!("#{} {} {:?}", article.id, article.title, article.tags);
    }
    println!("{} article(s)", count);

    authors.delete(&mut author).await?;
    Ok(())
}
