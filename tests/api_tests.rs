// tests/api_tests.rs

use std::sync::Arc;

use ecosnap::models::user::Role;
use ecosnap::store::{MemStore, NewUser, Storage};
use ecosnap::utils::hash::hash_password;
use ecosnap::{config::Config, routes, state::AppState};

struct TestApp {
    address: String,
    store: Arc<MemStore>,
}

/// Helper function to spawn the app on a random port for testing.
///
/// The storage engine is in-memory, so every test gets a fresh, isolated
/// instance. The store handle is returned for direct seeding.
async fn spawn_app() -> TestApp {
    let store = Arc::new(MemStore::new());

    let upload_dir = std::env::temp_dir()
        .join(format!("ecosnap-test-{}", uuid::Uuid::new_v4()))
        .to_string_lossy()
        .into_owned();

    let config = Config {
        jwt_secret: "test_secret_for_integration_tests".to_string(),
        jwt_expiration: 600, // 10 minutes for tests
        rust_log: "error".to_string(),
        upload_dir,
        admin_username: None,
        admin_password: None,
    };

    let state = AppState {
        store: store.clone(),
        config,
    };

    let app = routes::create_router(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind random port");

    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    TestApp { address, store }
}

/// Registers a fresh user through the API and logs in.
/// Returns (user id, bearer token).
async fn register_and_login(client: &reqwest::Client, address: &str) -> (i64, String) {
    let username = format!("u_{}", &uuid::Uuid::new_v4().to_string()[..8]);

    let response = client
        .post(format!("{}/api/auth/register", address))
        .json(&serde_json::json!({
            "username": username,
            "password": "password123",
            "display_name": "Test User"
        }))
        .send()
        .await
        .expect("Register failed");
    assert_eq!(response.status().as_u16(), 201);
    let user: serde_json::Value = response.json().await.unwrap();
    let user_id = user["id"].as_i64().unwrap();

    let login: serde_json::Value = client
        .post(format!("{}/api/auth/login", address))
        .json(&serde_json::json!({
            "username": username,
            "password": "password123"
        }))
        .send()
        .await
        .expect("Login failed")
        .json()
        .await
        .unwrap();

    (user_id, login["token"].as_str().unwrap().to_string())
}

/// Seeds an admin directly in the store (registration never hands out the
/// admin role) and logs in through the API.
async fn seed_admin_and_login(app: &TestApp, client: &reqwest::Client) -> String {
    let username = format!("adm_{}", &uuid::Uuid::new_v4().to_string()[..8]);

    app.store
        .create_user(NewUser {
            username: username.clone(),
            password: hash_password("adminpass").unwrap(),
            display_name: "Admin".to_string(),
            bio: None,
            profile_image: None,
            role: Role::Admin,
        })
        .await
        .unwrap();

    let login: serde_json::Value = client
        .post(format!("{}/api/auth/login", app.address))
        .json(&serde_json::json!({
            "username": username,
            "password": "adminpass"
        }))
        .send()
        .await
        .expect("Admin login failed")
        .json()
        .await
        .unwrap();

    login["token"].as_str().unwrap().to_string()
}

/// Uploads a small multipart video and returns the created record.
async fn upload_video(
    client: &reqwest::Client,
    address: &str,
    token: &str,
    title: &str,
    topic: &str,
) -> serde_json::Value {
    let form = reqwest::multipart::Form::new()
        .text("title", title.to_string())
        .text("topic", topic.to_string())
        .part(
            "video",
            reqwest::multipart::Part::bytes(vec![0u8; 32]).file_name("clip.mp4"),
        );

    let response = client
        .post(format!("{}/api/videos", address))
        .bearer_auth(token)
        .multipart(form)
        .send()
        .await
        .expect("Upload failed");
    assert_eq!(response.status().as_u16(), 201);
    response.json().await.unwrap()
}

async fn approve_video(client: &reqwest::Client, address: &str, admin_token: &str, video_id: i64) {
    let response = client
        .post(format!("{}/api/admin/videos/{}/review", address, video_id))
        .bearer_auth(admin_token)
        .json(&serde_json::json!({ "status": "approved" }))
        .send()
        .await
        .expect("Review failed");
    assert_eq!(response.status().as_u16(), 200);
}

#[tokio::test]
async fn health_check_404() {
    // Arrange
    let app = spawn_app().await;
    let client = reqwest::Client::new();

    // Act
    let response = client
        .get(format!("{}/random_path_that_does_not_exist", app.address))
        .send()
        .await
        .expect("Failed to execute request");

    // Assert
    assert_eq!(response.status().as_u16(), 404);
}

#[tokio::test]
async fn register_works() {
    let app = spawn_app().await;
    let client = reqwest::Client::new();
    let unique_name = format!("u_{}", &uuid::Uuid::new_v4().to_string()[..8]);

    let response = client
        .post(format!("{}/api/auth/register", app.address))
        .json(&serde_json::json!({
            "username": unique_name,
            "password": "password123",
            "display_name": "Eco Fan"
        }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status().as_u16(), 201);
    let user: serde_json::Value = response.json().await.unwrap();
    assert_eq!(user["username"], unique_name.as_str());
    assert_eq!(user["points"], 0);
    assert_eq!(user["role"], "user");
    // The password hash must never leave the server.
    assert!(user.get("password").is_none());
}

#[tokio::test]
async fn user_lookup_by_username() {
    let app = spawn_app().await;
    let client = reqwest::Client::new();
    let unique_name = format!("u_{}", &uuid::Uuid::new_v4().to_string()[..8]);

    client
        .post(format!("{}/api/auth/register", app.address))
        .json(&serde_json::json!({
            "username": unique_name,
            "password": "password123",
            "display_name": "Lookup Target"
        }))
        .send()
        .await
        .unwrap();

    let found: serde_json::Value = client
        .get(format!("{}/api/users/username/{}", app.address, unique_name))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(found["username"], unique_name.as_str());

    let missing = client
        .get(format!("{}/api/users/username/does_not_exist", app.address))
        .send()
        .await
        .unwrap();
    assert_eq!(missing.status().as_u16(), 404);
}

#[tokio::test]
async fn register_fails_validation() {
    let app = spawn_app().await;
    let client = reqwest::Client::new();

    // Username is too short
    let response = client
        .post(format!("{}/api/auth/register", app.address))
        .json(&serde_json::json!({
            "username": "yo",
            "password": "password123",
            "display_name": "Yo"
        }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status().as_u16(), 400);
}

#[tokio::test]
async fn register_duplicate_username_is_conflict() {
    let app = spawn_app().await;
    let client = reqwest::Client::new();
    let unique_name = format!("u_{}", &uuid::Uuid::new_v4().to_string()[..8]);

    let payload = serde_json::json!({
        "username": unique_name,
        "password": "password123",
        "display_name": "First"
    });

    let first = client
        .post(format!("{}/api/auth/register", app.address))
        .json(&payload)
        .send()
        .await
        .unwrap();
    assert_eq!(first.status().as_u16(), 201);

    let second = client
        .post(format!("{}/api/auth/register", app.address))
        .json(&payload)
        .send()
        .await
        .unwrap();
    assert_eq!(second.status().as_u16(), 409);
}

#[tokio::test]
async fn login_rejects_bad_credentials() {
    let app = spawn_app().await;
    let client = reqwest::Client::new();

    let username = format!("u_{}", &uuid::Uuid::new_v4().to_string()[..8]);
    let registered = client
        .post(format!("{}/api/auth/register", app.address))
        .json(&serde_json::json!({
            "username": username,
            "password": "password123",
            "display_name": "Login Tester"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(registered.status().as_u16(), 201);

    // Wrong password for an existing user.
    let response = client
        .post(format!("{}/api/auth/login", app.address))
        .json(&serde_json::json!({
            "username": username,
            "password": "not-the-password"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 401);

    // Unknown username.
    let response = client
        .post(format!("{}/api/auth/login", app.address))
        .json(&serde_json::json!({
            "username": "no_such_user",
            "password": "whatever"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 401);
}

#[tokio::test]
async fn saved_videos_require_authentication() {
    let app = spawn_app().await;
    let client = reqwest::Client::new();

    let response = client
        .get(format!("{}/api/users/saved-videos", app.address))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 401);

    let response = client
        .post(format!("{}/api/videos/1/save", app.address))
        .json(&serde_json::json!({ "action": "save" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 401);
}

#[tokio::test]
async fn save_and_unsave_round_trip() {
    let app = spawn_app().await;
    let client = reqwest::Client::new();

    let (_, uploader_token) = register_and_login(&client, &app.address).await;
    let (_, viewer_token) = register_and_login(&client, &app.address).await;

    let video = upload_video(&client, &app.address, &uploader_token, "Haul", "waste").await;
    let video_id = video["id"].as_i64().unwrap();

    // Save twice: the second call must not create a duplicate.
    for _ in 0..2 {
        let response = client
            .post(format!("{}/api/videos/{}/save", app.address, video_id))
            .bearer_auth(&viewer_token)
            .json(&serde_json::json!({ "action": "save" }))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status().as_u16(), 200);
    }

    let saved: Vec<serde_json::Value> = client
        .get(format!("{}/api/users/saved-videos", app.address))
        .bearer_auth(&viewer_token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(saved.len(), 1);
    assert_eq!(saved[0]["id"].as_i64(), Some(video_id));

    // Unsave restores the original empty set.
    let response = client
        .post(format!("{}/api/videos/{}/save", app.address, video_id))
        .bearer_auth(&viewer_token)
        .json(&serde_json::json!({ "action": "unsave" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 200);

    let saved: Vec<serde_json::Value> = client
        .get(format!("{}/api/users/saved-videos", app.address))
        .bearer_auth(&viewer_token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(saved.is_empty());
}

#[tokio::test]
async fn save_rejects_unknown_action() {
    let app = spawn_app().await;
    let client = reqwest::Client::new();

    let (_, token) = register_and_login(&client, &app.address).await;
    let video = upload_video(&client, &app.address, &token, "Haul", "waste").await;

    let response = client
        .post(format!(
            "{}/api/videos/{}/save",
            app.address,
            video["id"].as_i64().unwrap()
        ))
        .bearer_auth(&token)
        .json(&serde_json::json!({ "action": "bookmark" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 400);
}

#[tokio::test]
async fn feed_contains_only_approved_videos_newest_first() {
    let app = spawn_app().await;
    let client = reqwest::Client::new();

    let (_, token) = register_and_login(&client, &app.address).await;
    let admin_token = seed_admin_and_login(&app, &client).await;

    let v1 = upload_video(&client, &app.address, &token, "Solar panels", "energy").await;
    let v2 = upload_video(&client, &app.address, &token, "Compost bin", "waste").await;
    let v3 = upload_video(&client, &app.address, &token, "Bike commute", "transport").await;

    approve_video(&client, &app.address, &admin_token, v1["id"].as_i64().unwrap()).await;
    approve_video(&client, &app.address, &admin_token, v2["id"].as_i64().unwrap()).await;
    // v3 stays pending and must not appear in the feed.
    let _ = v3;

    let feed: Vec<serde_json::Value> = client
        .get(format!("{}/api/videos", app.address))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(feed.len(), 2);
    assert_eq!(feed[0]["title"], "Compost bin");
    assert_eq!(feed[1]["title"], "Solar panels");
    assert!(feed.iter().all(|v| v["status"] == "approved"));

    // Pagination: limit=1 returns the newest, offset=1 the next one.
    let page: Vec<serde_json::Value> = client
        .get(format!("{}/api/videos?limit=1", app.address))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(page.len(), 1);
    assert_eq!(page[0]["title"], "Compost bin");

    let page: Vec<serde_json::Value> = client
        .get(format!("{}/api/videos?limit=1&offset=1", app.address))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(page.len(), 1);
    assert_eq!(page[0]["title"], "Solar panels");

    // Topic filter.
    let energy: Vec<serde_json::Value> = client
        .get(format!("{}/api/videos?topic=energy", app.address))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(energy.len(), 1);
    assert_eq!(energy[0]["title"], "Solar panels");
}

#[tokio::test]
async fn get_video_increments_views() {
    let app = spawn_app().await;
    let client = reqwest::Client::new();

    let (_, token) = register_and_login(&client, &app.address).await;
    let video = upload_video(&client, &app.address, &token, "Haul", "waste").await;
    let video_id = video["id"].as_i64().unwrap();
    assert_eq!(video["views"], 0);

    let fetched: serde_json::Value = client
        .get(format!("{}/api/videos/{}", app.address, video_id))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(fetched["views"], 1);

    // The dedicated view endpoint counts as well.
    let viewed: serde_json::Value = client
        .post(format!("{}/api/videos/{}/view", app.address, video_id))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(viewed["views"], 2);
}

#[tokio::test]
async fn leaderboard_sorts_by_points_descending() {
    let app = spawn_app().await;
    let client = reqwest::Client::new();

    // Three users with distinct point totals: 20 (two uploads), 10, 0.
    let (high_id, high_token) = register_and_login(&client, &app.address).await;
    let (mid_id, mid_token) = register_and_login(&client, &app.address).await;
    let (low_id, _) = register_and_login(&client, &app.address).await;

    upload_video(&client, &app.address, &high_token, "One", "waste").await;
    upload_video(&client, &app.address, &high_token, "Two", "waste").await;
    upload_video(&client, &app.address, &mid_token, "Three", "waste").await;

    let leaderboard: Vec<serde_json::Value> = client
        .get(format!("{}/api/leaderboard?limit=3", app.address))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(leaderboard.len(), 3);
    assert_eq!(leaderboard[0]["id"].as_i64(), Some(high_id));
    assert_eq!(leaderboard[0]["points"], 20);
    assert_eq!(leaderboard[1]["id"].as_i64(), Some(mid_id));
    assert_eq!(leaderboard[1]["points"], 10);
    assert_eq!(leaderboard[2]["id"].as_i64(), Some(low_id));
    assert_eq!(leaderboard[2]["points"], 0);
}

#[tokio::test]
async fn challenge_lifecycle() {
    let app = spawn_app().await;
    let client = reqwest::Client::new();

    let admin_token = seed_admin_and_login(&app, &client).await;
    let (_, user_token) = register_and_login(&client, &app.address).await;

    // Regular users cannot create challenges.
    let forbidden = client
        .post(format!("{}/api/challenges", app.address))
        .bearer_auth(&user_token)
        .json(&serde_json::json!({
            "title": "Nope",
            "description": "Nope",
            "start_date": "2026-01-01T00:00:00Z",
            "end_date": "2026-01-08T00:00:00Z",
            "topic": "waste"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(forbidden.status().as_u16(), 403);

    // No challenge seeded, nothing active yet.
    let response = client
        .get(format!("{}/api/challenges/active", app.address))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 404);

    let now = chrono::Utc::now();
    let created = client
        .post(format!("{}/api/challenges", app.address))
        .bearer_auth(&admin_token)
        .json(&serde_json::json!({
            "title": "Plastic-free week",
            "description": "Show us your plastic-free grocery haul!",
            "start_date": now - chrono::Duration::days(1),
            "end_date": now + chrono::Duration::days(6),
            "topic": "waste"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(created.status().as_u16(), 201);
    let challenge: serde_json::Value = created.json().await.unwrap();
    // is_active defaults to true.
    assert_eq!(challenge["is_active"], true);

    let active: serde_json::Value = client
        .get(format!("{}/api/challenges/active", app.address))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(active["title"], "Plastic-free week");

    let all: Vec<serde_json::Value> = client
        .get(format!("{}/api/challenges", app.address))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(all.len(), 1);
}

#[tokio::test]
async fn achievement_lifecycle() {
    let app = spawn_app().await;
    let client = reqwest::Client::new();

    let admin_token = seed_admin_and_login(&app, &client).await;
    let (user_id, _) = register_and_login(&client, &app.address).await;

    // Unknown user cannot earn a badge.
    let missing = client
        .post(format!("{}/api/achievements", app.address))
        .bearer_auth(&admin_token)
        .json(&serde_json::json!({ "user_id": 9999, "type": "green_beginner" }))
        .send()
        .await
        .unwrap();
    assert_eq!(missing.status().as_u16(), 404);

    let created = client
        .post(format!("{}/api/achievements", app.address))
        .bearer_auth(&admin_token)
        .json(&serde_json::json!({ "user_id": user_id, "type": "green_beginner" }))
        .send()
        .await
        .unwrap();
    assert_eq!(created.status().as_u16(), 201);

    let achievements: Vec<serde_json::Value> = client
        .get(format!("{}/api/users/{}/achievements", app.address, user_id))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(achievements.len(), 1);
    assert_eq!(achievements[0]["type"], "green_beginner");
}

#[tokio::test]
async fn upload_without_file_is_rejected() {
    let app = spawn_app().await;
    let client = reqwest::Client::new();
    let (_, token) = register_and_login(&client, &app.address).await;

    let form = reqwest::multipart::Form::new()
        .text("title", "No file attached")
        .text("topic", "waste");

    let response = client
        .post(format!("{}/api/videos", app.address))
        .bearer_auth(&token)
        .multipart(form)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 400);
}
