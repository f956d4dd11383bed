use garde::Validate;
use serde::{Deserialize, Deserializer, Serialize};
use sqlx::{Acquire, Connection as _, Executor, QueryBuilder, Row as _};
use tracing::debug;

use crate::{
    BEGIN_WRITE, ChosenDB, ChosenRow, Error, FromRowPrefixed,
    category::{self, Category},
    error::Result,
    publisher::{self, Publisher},
    validate::{
        TITLE_LABEL, TITLE_MIN_LENGTH, ValidationError, valid_description, valid_title,
        validate_description, validate_string_length,
    },
};

const INVALID_REFERENCES: &str = "Invalid publisher_id or category_id";
const INVALID_PUBLISHER: &str = "Invalid publisher_id";
const INVALID_CATEGORY: &str = "Invalid category_id";

/// Game as presented to clients, with its publisher and category resolved
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Game {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub publisher: Option<Publisher>,
    pub category: Option<Category>,
    #[serde(rename = "starRating")]
    pub star_rating: Option<f64>,
}

impl sqlx::FromRow<'_, ChosenRow> for Game {
    fn from_row(row: &ChosenRow) -> Result<Self, sqlx::Error> {
        let publisher = if row.try_get::<Option<i64>, _>("publisher_id")?.is_some() {
            Some(Publisher::from_row_prefixed(row)?)
        } else {
            None
        };
        let category = if row.try_get::<Option<i64>, _>("category_id")?.is_some() {
            Some(Category::from_row_prefixed(row)?)
        } else {
            None
        };
        Ok(Game {
            id: row.try_get("id")?,
            title: row.try_get("title")?,
            description: row.try_get("description")?,
            publisher,
            category,
            star_rating: row.try_get("star_rating")?,
        })
    }
}

/// Create payload, presence of the required keys is checked by the caller.
///
/// Nullable types mirror what a client may send, a `null` title or reference
/// is rejected here with the same message as a bad value.
#[derive(Debug, Serialize, Deserialize, Clone, Validate)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct CreateGame {
    #[garde(custom(valid_optional_title))]
    pub title: Option<String>,
    #[garde(custom(valid_description))]
    pub description: Option<String>,
    #[garde(skip)]
    pub publisher_id: Option<i64>,
    #[garde(skip)]
    pub category_id: Option<i64>,
    #[garde(skip)]
    #[serde(default)]
    pub star_rating: Option<f64>,
}

fn valid_optional_title(value: &Option<String>, ctx: &()) -> garde::Result {
    match value {
        Some(title) => valid_title(title, ctx),
        None => validate_string_length(TITLE_LABEL, None, TITLE_MIN_LENGTH, false)
            .map(|_| ())
            .map_err(|e| garde::Error::new(e)),
    }
}

/// Partial update, only keys present in the payload are applied.
///
/// Outer `None` means the key was absent, `Some(None)` an explicit `null`.
#[derive(Debug, Deserialize, Clone, Default)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct UpdateGame {
    #[serde(default, deserialize_with = "present")]
    #[cfg_attr(feature = "openapi", schema(value_type = Option<String>))]
    pub title: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    #[cfg_attr(feature = "openapi", schema(value_type = Option<String>))]
    pub description: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    #[cfg_attr(feature = "openapi", schema(value_type = Option<i64>))]
    pub publisher_id: Option<Option<i64>>,
    #[serde(default, deserialize_with = "present")]
    #[cfg_attr(feature = "openapi", schema(value_type = Option<i64>))]
    pub category_id: Option<Option<i64>>,
    #[serde(default, deserialize_with = "present")]
    #[cfg_attr(feature = "openapi", schema(value_type = Option<f64>))]
    pub star_rating: Option<Option<f64>>,
}

fn present<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    T::deserialize(deserializer).map(Some)
}

/// Stored row, nullable text columns are optional here so a `null` reaches the
/// database constraint instead of being silently dropped
#[derive(Debug, sqlx::FromRow)]
struct GameRecord {
    id: i64,
    title: Option<String>,
    description: Option<String>,
    star_rating: Option<f64>,
    category_id: i64,
    publisher_id: i64,
}

/// Games with publisher and category left joined, so games with a dangling
/// reference are still returned
pub fn games_base_query<'a>() -> QueryBuilder<'a, ChosenDB> {
    QueryBuilder::new(
        r#"
        SELECT g.id, g.title, g.description, g.star_rating,
        p.id AS publisher_id, p.name AS publisher_name,
        c.id AS category_id, c.name AS category_name
        FROM games g
        LEFT JOIN publishers p ON g.publisher_id = p.id
        LEFT JOIN categories c ON g.category_id = c.id
        "#,
    )
}

pub type GameRepository = GameRepositoryImpl<sqlx::Pool<ChosenDB>>;

pub struct GameRepositoryImpl<E> {
    executor: E,
}

impl<'c, E> GameRepositoryImpl<E>
where
    for<'a> &'a E: Executor<'c, Database = ChosenDB> + Acquire<'c, Database = ChosenDB>,
{
    pub fn new(executor: E) -> Self {
        Self { executor }
    }

    pub async fn list_all(&self) -> Result<Vec<Game>> {
        let mut query = games_base_query();
        let records = query
            .build_query_as::<Game>()
            .fetch_all(&self.executor)
            .await?;
        Ok(records)
    }

    pub async fn get(&self, id: i64) -> Result<Game> {
        get(id, &self.executor).await
    }

    pub async fn create(&self, payload: CreateGame) -> Result<Game> {
        let mut conn = self.executor.acquire().await?;
        let mut tx = conn.begin_with(BEGIN_WRITE).await?;

        let publisher_exists = match payload.publisher_id {
            Some(id) => publisher::exists(id, &mut *tx).await?,
            None => false,
        };
        let category_exists = match payload.category_id {
            Some(id) => category::exists(id, &mut *tx).await?,
            None => false,
        };
        if !(publisher_exists && category_exists) {
            debug!(
                "Missing publisher {:?} or category {:?}",
                payload.publisher_id, payload.category_id
            );
            return Err(Error::InvalidReference(INVALID_REFERENCES));
        }

        let id = insert(&payload, &mut *tx).await?;
        let record = get(id, &mut *tx).await?;
        tx.commit().await?;
        debug!("Created game {id}");
        Ok(record)
    }

    /// Applies fields in order title, description, publisher, category, rating,
    /// the first invalid one aborts the whole update
    pub async fn update(&self, id: i64, payload: UpdateGame) -> Result<Game> {
        let mut conn = self.executor.acquire().await?;
        let mut tx = conn.begin_with(BEGIN_WRITE).await?;

        let mut record = sqlx::query_as::<_, GameRecord>(
            "SELECT id, title, description, star_rating, category_id, publisher_id FROM games WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| Error::RecordNotFound("Game".to_string()))?;

        if let Some(title) = payload.title {
            validate_string_length(TITLE_LABEL, title.as_deref(), TITLE_MIN_LENGTH, false)?;
            record.title = title;
        }

        if let Some(description) = payload.description {
            validate_description(description.as_deref())?;
            record.description = description;
        }

        if let Some(publisher_id) = payload.publisher_id {
            let publisher_id = publisher_id.ok_or(Error::InvalidReference(INVALID_PUBLISHER))?;
            if !publisher::exists(publisher_id, &mut *tx).await? {
                return Err(Error::InvalidReference(INVALID_PUBLISHER));
            }
            record.publisher_id = publisher_id;
        }

        if let Some(category_id) = payload.category_id {
            let category_id = category_id.ok_or(Error::InvalidReference(INVALID_CATEGORY))?;
            if !category::exists(category_id, &mut *tx).await? {
                return Err(Error::InvalidReference(INVALID_CATEGORY));
            }
            record.category_id = category_id;
        }

        if let Some(star_rating) = payload.star_rating {
            record.star_rating = star_rating;
        }

        sqlx::query(
            "UPDATE games SET title = ?, description = ?, star_rating = ?, category_id = ?, publisher_id = ? WHERE id = ?",
        )
        .bind(&record.title)
        .bind(&record.description)
        .bind(record.star_rating)
        .bind(record.category_id)
        .bind(record.publisher_id)
        .bind(record.id)
        .execute(&mut *tx)
        .await?;

        let updated = get(id, &mut *tx).await?;
        tx.commit().await?;
        debug!("Updated game {id}");
        Ok(updated)
    }

    pub async fn delete(&self, id: i64) -> Result<()> {
        let res = sqlx::query("DELETE FROM games WHERE id = ?")
            .bind(id)
            .execute(&self.executor)
            .await?;

        if res.rows_affected() == 0 {
            Err(Error::RecordNotFound("Game".to_string()))
        } else {
            debug!("Deleted game {id}");
            Ok(())
        }
    }
}

/// Validates and inserts a game, references are expected to be checked already
pub(crate) async fn insert<'c, X>(payload: &CreateGame, executor: X) -> Result<i64>
where
    X: Executor<'c, Database = ChosenDB>,
{
    payload.validate().map_err(ValidationError::from)?;

    let result = sqlx::query(
        "INSERT INTO games (title, description, star_rating, category_id, publisher_id) VALUES (?, ?, ?, ?, ?)",
    )
    .bind(&payload.title)
    .bind(&payload.description)
    .bind(payload.star_rating)
    .bind(payload.category_id)
    .bind(payload.publisher_id)
    .execute(executor)
    .await?;

    Ok(result.last_insert_rowid())
}

pub async fn get<'c, X>(id: i64, executor: X) -> Result<Game>
where
    X: Executor<'c, Database = ChosenDB>,
{
    let mut query = games_base_query();
    query.push(" WHERE g.id = ").push_bind(id);
    query
        .build_query_as::<Game>()
        .fetch_optional(executor)
        .await?
        .ok_or_else(|| Error::RecordNotFound("Game".to_string()))
}
