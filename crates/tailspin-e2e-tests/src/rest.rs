use anyhow::Result;
use reqwest::Url;
use serde_json::json;
use tailspin_dal::game::Game;
use tracing::info;

pub async fn create_game(
    client: &reqwest::Client,
    base_url: &Url,
    title: &str,
    description: &str,
    publisher_id: i64,
    category_id: i64,
    star_rating: Option<f64>,
) -> Result<Game> {
    let payload = json!({
        "title": title,
        "description": description,
        "publisher_id": publisher_id,
        "category_id": category_id,
        "star_rating": star_rating,
    });
    let api_url = base_url.join("api/games")?;

    let response = client.post(api_url).json(&payload).send().await?;
    info!("Response: {:#?}", response);
    assert_eq!(response.status().as_u16(), 201);

    let new_game: Game = response.json().await?;
    Ok(new_game)
}

pub fn extend_url(url: &Url, segment: impl ToString) -> Url {
    let mut url = url.clone();
    if let Ok(mut segments) = url.path_segments_mut() {
        segments.pop_if_empty().push(&segment.to_string());
    }
    url
}
