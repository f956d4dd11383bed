use serde::{Deserialize, Serialize};
use sqlx::Connection as _;
use tracing::info;

use crate::{
    BEGIN_WRITE, Error, Pool,
    category::{self, CreateCategory},
    error::Result,
    game::{self, CreateGame},
    publisher::{self, CreatePublisher},
};

/// Initial catalog content, games point to publishers and categories by their
/// position in this document
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct SeedData {
    #[serde(default)]
    pub publishers: Vec<CreatePublisher>,
    #[serde(default)]
    pub categories: Vec<CreateCategory>,
    #[serde(default)]
    pub games: Vec<SeedGame>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SeedGame {
    pub title: String,
    pub description: String,
    pub publisher_index: usize,
    pub category_index: usize,
    #[serde(default)]
    pub star_rating: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SeedSummary {
    pub publishers: usize,
    pub categories: usize,
    pub games: usize,
}

/// Loads seed data in a single transaction, nothing is written if any record
/// is invalid. A database that already has publishers is left untouched.
pub async fn seed(pool: &Pool, data: &SeedData) -> Result<SeedSummary> {
    let mut conn = pool.acquire().await?;
    let mut tx = conn.begin_with(BEGIN_WRITE).await?;

    let existing: i64 = sqlx::query_scalar("SELECT count(*) FROM publishers")
        .fetch_one(&mut *tx)
        .await?;
    if existing > 0 {
        info!("Catalog already contains {existing} publishers, skipping seed");
        return Ok(SeedSummary::default());
    }

    let mut publisher_ids = Vec::with_capacity(data.publishers.len());
    for payload in &data.publishers {
        publisher_ids.push(publisher::create(payload, &mut *tx).await?.id);
    }

    let mut category_ids = Vec::with_capacity(data.categories.len());
    for payload in &data.categories {
        category_ids.push(category::create(payload, &mut *tx).await?.id);
    }

    for seed_game in &data.games {
        let publisher_id = publisher_ids.get(seed_game.publisher_index).ok_or_else(|| {
            Error::InvalidPayload(format!(
                "Game {} refers to unknown publisher index {}",
                seed_game.title, seed_game.publisher_index
            ))
        })?;
        let category_id = category_ids.get(seed_game.category_index).ok_or_else(|| {
            Error::InvalidPayload(format!(
                "Game {} refers to unknown category index {}",
                seed_game.title, seed_game.category_index
            ))
        })?;
        let payload = CreateGame {
            title: Some(seed_game.title.clone()),
            description: Some(seed_game.description.clone()),
            publisher_id: Some(*publisher_id),
            category_id: Some(*category_id),
            star_rating: seed_game.star_rating,
        };
        game::insert(&payload, &mut *tx).await?;
    }

    tx.commit().await?;

    let summary = SeedSummary {
        publishers: publisher_ids.len(),
        categories: category_ids.len(),
        games: data.games.len(),
    };
    info!(
        "Seeded {} publishers, {} categories and {} games",
        summary.publishers, summary.categories, summary.games
    );
    Ok(summary)
}
