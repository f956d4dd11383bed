use sqlx::Executor as _;
use tailspin_dal::{
    Error, Pool,
    category::{CategoryRepository, CreateCategory},
    game::{CreateGame, GameRepository, UpdateGame},
    publisher::{CreatePublisher, PublisherRepository},
    seed::{SeedData, SeedGame, seed},
};

const TEST_DATA: &str = r#"
{
    "publishers": [{"name": "DevGames Inc"}, {"name": "Scrum Masters"}],
    "categories": [{"name": "Strategy"}, {"name": "Card Game"}],
    "games": [
        {
            "title": "Pipeline Panic",
            "description": "Build your DevOps pipeline before chaos ensues",
            "publisher_index": 0,
            "category_index": 0,
            "star_rating": 4.5
        },
        {
            "title": "Agile Adventures",
            "description": "Navigate your team through sprints and releases",
            "publisher_index": 1,
            "category_index": 1,
            "star_rating": 4.2
        }
    ]
}
"#;

async fn init_db() -> Pool {
    const DB_URL: &str = "sqlite::memory:";
    let conn = sqlx::sqlite::SqlitePoolOptions::new()
        .max_connections(1)
        .min_connections(1)
        .connect(DB_URL)
        .await
        .unwrap();
    conn.execute("PRAGMA foreign_keys = ON").await.unwrap();
    tailspin_dal::MIGRATOR.run(&conn).await.unwrap();

    let data: SeedData = serde_json::from_str(TEST_DATA).unwrap();
    seed(&conn, &data).await.unwrap();

    conn
}

fn new_game(title: &str, description: Option<&str>) -> CreateGame {
    CreateGame {
        title: Some(title.to_string()),
        description: description.map(|d| d.to_string()),
        publisher_id: Some(1),
        category_id: Some(1),
        star_rating: Some(4.0),
    }
}

fn update(json: &str) -> UpdateGame {
    serde_json::from_str(json).unwrap()
}

#[tokio::test]
async fn test_games_list() {
    let conn = init_db().await;
    let repo = GameRepository::new(conn);

    let games = repo.list_all().await.unwrap();
    assert_eq!(games.len(), 2);
    assert_eq!(games[0].title, "Pipeline Panic");
    assert_eq!(games[0].publisher.as_ref().unwrap().name, "DevGames Inc");
    assert_eq!(games[0].category.as_ref().unwrap().name, "Strategy");
    assert_eq!(games[0].star_rating, Some(4.5));
    assert_eq!(games[1].publisher.as_ref().unwrap().name, "Scrum Masters");
    assert_eq!(games[1].category.as_ref().unwrap().name, "Card Game");
}

#[tokio::test]
async fn test_game_with_dangling_references_is_listed() {
    let conn = init_db().await;
    conn.execute("PRAGMA foreign_keys = OFF").await.unwrap();
    sqlx::query(
        "INSERT INTO games (title, description, star_rating, category_id, publisher_id) VALUES (?, ?, NULL, ?, ?)",
    )
    .bind("Orphan Quest")
    .bind("A game whose publisher vanished")
    .bind(1)
    .bind(999)
    .execute(&conn)
    .await
    .unwrap();

    let repo = GameRepository::new(conn);
    let games = repo.list_all().await.unwrap();
    assert_eq!(games.len(), 3);
    let orphan = games.iter().find(|g| g.title == "Orphan Quest").unwrap();
    assert!(orphan.publisher.is_none());
    assert_eq!(orphan.category.as_ref().unwrap().id, 1);
    assert_eq!(orphan.star_rating, None);

    let fetched = repo.get(orphan.id).await.unwrap();
    assert_eq!(&fetched, orphan);
}

#[tokio::test]
async fn test_game_create_and_get() {
    let conn = init_db().await;
    let repo = GameRepository::new(conn);

    let game = repo
        .create(new_game(
            "Test Game",
            Some("A test game description that is long enough"),
        ))
        .await
        .unwrap();
    assert_eq!(game.id, 3);
    assert_eq!(game.title, "Test Game");
    assert_eq!(game.publisher.as_ref().unwrap().id, 1);
    assert_eq!(game.star_rating, Some(4.0));

    let fetched = repo.get(game.id).await.unwrap();
    assert_eq!(fetched, game);
}

#[tokio::test]
async fn test_game_create_boundaries() {
    let conn = init_db().await;
    let repo = GameRepository::new(conn);

    let err = repo
        .create(new_game("A", Some("Long enough description")))
        .await
        .unwrap_err();
    assert!(
        matches!(err, Error::Validation(ref e) if e.message() == "Game title must be at least 2 characters")
    );

    let err = repo
        .create(new_game("Ab", Some("123456789")))
        .await
        .unwrap_err();
    assert!(
        matches!(err, Error::Validation(ref e) if e.message() == "Description must be at least 10 characters")
    );

    let game = repo
        .create(new_game("Ab", Some("1234567890")))
        .await
        .unwrap();
    assert_eq!(game.title, "Ab");
    assert_eq!(game.description, "1234567890");
}

#[tokio::test]
async fn test_game_create_invalid_references() {
    let conn = init_db().await;
    let repo = GameRepository::new(conn.clone());

    let mut payload = new_game("Test Game", Some("A test game description"));
    payload.publisher_id = Some(999);
    let err = repo.create(payload).await.unwrap_err();
    assert!(matches!(
        err,
        Error::InvalidReference("Invalid publisher_id or category_id")
    ));

    // references are checked before field rules
    let mut payload = new_game("A", Some("short"));
    payload.category_id = Some(999);
    let err = repo.create(payload).await.unwrap_err();
    assert!(matches!(err, Error::InvalidReference(_)));

    let mut payload = new_game("Test Game", Some("A test game description"));
    payload.category_id = None;
    let err = repo.create(payload).await.unwrap_err();
    assert!(matches!(err, Error::InvalidReference(_)));

    assert_eq!(repo.list_all().await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_game_create_null_description_hits_storage() {
    let conn = init_db().await;
    let repo = GameRepository::new(conn);

    let err = repo.create(new_game("Test Game", None)).await.unwrap_err();
    assert!(matches!(err, Error::DatabaseError(_)));
    assert_eq!(repo.list_all().await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_game_update() {
    let conn = init_db().await;
    let repo = GameRepository::new(conn);

    let updated = repo
        .update(
            1,
            update(
                r#"{"title": "Updated Game Title", "description": "An updated description that is definitely long enough", "star_rating": 4.8}"#,
            ),
        )
        .await
        .unwrap();
    assert_eq!(updated.title, "Updated Game Title");
    assert_eq!(
        updated.description,
        "An updated description that is definitely long enough"
    );
    assert_eq!(updated.star_rating, Some(4.8));
    // untouched fields survive
    assert_eq!(updated.publisher.as_ref().unwrap().name, "DevGames Inc");

    let updated = repo
        .update(1, update(r#"{"publisher_id": 2, "category_id": 2, "star_rating": null}"#))
        .await
        .unwrap();
    assert_eq!(updated.title, "Updated Game Title");
    assert_eq!(updated.publisher.unwrap().name, "Scrum Masters");
    assert_eq!(updated.category.unwrap().name, "Card Game");
    assert_eq!(updated.star_rating, None);
}

#[tokio::test]
async fn test_game_update_boundaries() {
    let conn = init_db().await;
    let repo = GameRepository::new(conn);

    let updated = repo
        .update(1, update(r#"{"title": "Ab", "description": "1234567890"}"#))
        .await
        .unwrap();
    assert_eq!(updated.title, "Ab");
    assert_eq!(updated.description, "1234567890");

    let err = repo
        .update(1, update(r#"{"description": "123456789"}"#))
        .await
        .unwrap_err();
    assert!(
        matches!(err, Error::Validation(ref e) if e.message() == "Description must be at least 10 characters")
    );
    assert_eq!(repo.get(1).await.unwrap().description, "1234567890");
}

#[tokio::test]
async fn test_game_update_rejections() {
    let conn = init_db().await;
    let repo = GameRepository::new(conn);

    let err = repo.update(999, update(r#"{"title": "New Title"}"#)).await;
    assert!(matches!(err, Err(Error::RecordNotFound(ref e)) if e == "Game"));

    let err = repo.update(1, update(r#"{"title": "A"}"#)).await.unwrap_err();
    assert!(err.to_string().contains("Game title"));

    let err = repo.update(1, update(r#"{"title": null}"#)).await.unwrap_err();
    assert!(err.to_string().contains("Game title"));

    let err = repo
        .update(1, update(r#"{"description": "Too short"}"#))
        .await
        .unwrap_err();
    assert!(err.to_string().contains("Description"));

    let err = repo
        .update(1, update(r#"{"publisher_id": 999}"#))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::InvalidReference("Invalid publisher_id")));

    let err = repo
        .update(1, update(r#"{"category_id": 999}"#))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::InvalidReference("Invalid category_id")));

    // first failure wins and nothing from the failed update is kept
    let err = repo
        .update(1, update(r#"{"star_rating": 1.0, "title": "Valid title", "category_id": 999}"#))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::InvalidReference("Invalid category_id")));
    let game = repo.get(1).await.unwrap();
    assert_eq!(game.title, "Pipeline Panic");
    assert_eq!(game.star_rating, Some(4.5));
}

#[tokio::test]
async fn test_game_delete() {
    let conn = init_db().await;
    let repo = GameRepository::new(conn);

    repo.delete(1).await.unwrap();
    assert!(matches!(repo.get(1).await, Err(Error::RecordNotFound(_))));
    assert!(matches!(repo.delete(1).await, Err(Error::RecordNotFound(_))));

    // ids are not reused
    let game = repo
        .create(new_game("Fresh Game", Some("Created after a delete")))
        .await
        .unwrap();
    assert_eq!(game.id, 3);
}

#[tokio::test]
async fn test_lookup_repositories() {
    let conn = init_db().await;
    let publishers = PublisherRepository::new(conn.clone());
    let categories = CategoryRepository::new(conn.clone());

    assert_eq!(publishers.count().await.unwrap(), 2);
    assert!(publishers.exists(2).await.unwrap());
    assert!(!publishers.exists(3).await.unwrap());
    let all = categories.list_all().await.unwrap();
    assert_eq!(
        all.iter().map(|c| c.name.as_str()).collect::<Vec<_>>(),
        vec!["Strategy", "Card Game"]
    );
    assert!(matches!(
        categories.get(10).await,
        Err(Error::RecordNotFound(ref e)) if e == "Category"
    ));

    let err = publishers
        .create(CreatePublisher {
            name: "X".to_string(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Validation(ref e) if e.message() == "Name must be at least 2 characters"));

    let publisher = publishers
        .create(CreatePublisher {
            name: "Octo Studio".to_string(),
        })
        .await
        .unwrap();
    assert_eq!(publisher.id, 3);
    assert_eq!(publishers.get(3).await.unwrap(), publisher);

    // names are unique
    let err = publishers
        .create(CreatePublisher {
            name: "DevGames Inc".to_string(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, Error::DatabaseError(ref e) if e.as_database_error().is_some_and(|d| d.is_unique_violation())));
    let err = categories
        .create(CreateCategory {
            name: "Strategy".to_string(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, Error::DatabaseError(_)));
    assert_eq!(publishers.count().await.unwrap(), 3);
    assert_eq!(categories.count().await.unwrap(), 2);
}

#[tokio::test]
async fn test_seed_is_atomic_and_skips_populated_db() {
    let conn = init_db().await;
    let summary = seed(
        &conn,
        &SeedData {
            publishers: vec![CreatePublisher {
                name: "Another".to_string(),
            }],
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(summary.publishers, 0);

    let empty = sqlx::sqlite::SqlitePoolOptions::new()
        .max_connections(1)
        .min_connections(1)
        .connect("sqlite::memory:")
        .await
        .unwrap();
    tailspin_dal::MIGRATOR.run(&empty).await.unwrap();
    let bad = SeedData {
        publishers: vec![CreatePublisher {
            name: "Solo".to_string(),
        }],
        categories: vec![],
        games: vec![SeedGame {
            title: "Lonely".to_string(),
            description: "No category for this one".to_string(),
            publisher_index: 0,
            category_index: 0,
            star_rating: None,
        }],
    };
    let err = seed(&empty, &bad).await.unwrap_err();
    assert!(matches!(err, Error::InvalidPayload(_)));
    let count: i64 = sqlx::query_scalar("SELECT count(*) FROM publishers")
        .fetch_one(&empty)
        .await
        .unwrap();
    assert_eq!(count, 0);
}
