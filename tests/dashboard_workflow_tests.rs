use axum::http::StatusCode;
use serde_json::json;
use std::sync::Arc;

mod utils;

use utils::*;

#[tokio::test]
async fn test_daily_snapshots_drive_title_and_projection() {
    let setup = TestSetupBuilder::new().build();

    for day in 0..10 {
        setup.advance_to_day(day);
        setup
            .record("alice", "1.000s", &format!("{}q", day + 1))
            .await;
    }

    let (status, title) = setup.get("/players/alice/title").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(title["earnings_bonus"], "10.000q");
    assert_eq!(title["current_tier"], "Kilofarmer III");
    assert_eq!(title["next_tier"]["tier"], "Megafarmer I");
    assert_eq!(title["amount_needed"], "990.000q");

    let (status, projection) = setup.get("/players/alice/projection").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(projection["regression"]["fit"]["kind"], "linear");
    assert_eq!(projection["regression"]["target_magnitude"], "1.000Q");
    assert!(projection["average"]["at"].is_string());
    // Compounding estimate beats the straight-line average here
    assert_eq!(projection["earliest"], projection["regression"]["projected"]);
}

#[tokio::test]
async fn test_projection_waits_for_enough_history() {
    let setup = TestSetupBuilder::new().build();
    setup.record("bob", "1K", "5M").await;

    let (status, projection) = setup.get("/players/bob/projection").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        projection["regression"]["projected"]["indeterminate"],
        "insufficient_data"
    );
    assert_eq!(projection["average"]["indeterminate"], "insufficient_data");
    assert_eq!(projection["earliest"]["indeterminate"], "insufficient_data");
}

#[tokio::test]
async fn test_growth_over_last_week() {
    let setup = TestSetupBuilder::new().build();

    setup.record("alice", "1.000Q", "1K").await;
    setup.advance_to_day(3);
    setup.record("alice", "1.250Q", "1K").await;
    setup.advance_to_day(11);
    setup.record("alice", "1.700Q", "1K").await;

    // Window opens on day 4; day 3 is the baseline and day 0 drops out
    let (status, growth) = setup.get("/players/alice/growth?days=7").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(growth["metric"], "soul_eggs");
    assert_eq!(growth["summary"]["start"], "1.250Q");
    assert_eq!(growth["summary"]["gained"], "450.000q");
    assert_eq!(growth["daily_gain"], "56.250q");
}

#[tokio::test]
async fn test_neighbors_across_all_metrics() {
    let setup = TestSetupBuilder::new().build();
    setup.record("a", "100Q", "1s").await;
    setup.record("b", "300Q", "3s").await;
    setup.record("c", "200Q", "2s").await;
    setup.record("d", "50Q", "500Q").await;

    let (status, neighbors) = setup.get("/players/c/neighbors").await;
    assert_eq!(status, StatusCode::OK);

    let metrics = neighbors.as_array().unwrap();
    assert_eq!(metrics.len(), 4);

    let soul_eggs = metrics
        .iter()
        .find(|entry| entry["metric"] == "soul_eggs")
        .unwrap();
    assert_eq!(soul_eggs["value"], "200.000Q");
    assert_eq!(soul_eggs["target_rank"], 2);
    assert_eq!(soul_eggs["upper"]["player_key"], "b");
    assert_eq!(soul_eggs["upper"]["rank"], 1);
    assert_eq!(soul_eggs["lower"]["player_key"], "a");
    assert_eq!(soul_eggs["lower"]["value"], "100.000Q");
}

#[tokio::test]
async fn test_top_player_has_no_upper_neighbor() {
    let setup = TestSetupBuilder::new().build();
    setup.record("a", "100Q", "1s").await;
    setup.record("b", "300Q", "3s").await;

    let (_, neighbors) = setup.get("/players/b/neighbors").await;
    let earnings_bonus = neighbors
        .as_array()
        .unwrap()
        .iter()
        .find(|entry| entry["metric"] == "earnings_bonus")
        .unwrap();
    assert!(earnings_bonus["upper"].is_null());
    assert_eq!(earnings_bonus["lower"]["player_key"], "a");
}

#[tokio::test]
async fn test_number_endpoints() {
    let setup = TestSetupBuilder::new().build();

    let (status, decoded) = setup.get("/numbers/decode/999999").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(decoded["display"], "999.999K");

    let (status, diff) = setup.get("/numbers/difference?a=2.5T&b=1T").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(diff["difference"], "1.500T");

    let (status, error) = setup.get("/numbers/difference?a=2.5T&b=abc").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(error["error"].is_string());
}

#[tokio::test]
async fn test_repository_failure_is_internal_error() {
    let setup = TestSetupBuilder::new()
        .with_repository(Arc::new(FailingSnapshotRepository))
        .build();

    let (status, body) = setup
        .post(
            "/players/alice/snapshots",
            json!({"soul_eggs": "1K", "earnings_bonus": "1K"}),
        )
        .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"].as_str().unwrap().contains("connection refused"));

    let (status, _) = setup.get("/players/alice/title").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
}
