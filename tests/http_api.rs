use axum::{
    body::Body,
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        Method, Request, StatusCode,
    },
    Router,
};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;

use parlor_backend::api;
use parlor_backend::config::Config;
use parlor_backend::db;
use parlor_backend::state::AppState;

type TestResult<T = ()> = anyhow::Result<T>;

const PASSWORD: &str = "Str0ng!pass";

struct TestApp {
    _temp_dir: TempDir,
    state: AppState,
}

impl TestApp {
    async fn new() -> TestResult<Self> {
        let temp_dir = TempDir::new()?;
        let db_path = temp_dir.path().join("parlor_test.sqlite");
        let database_url = format!("sqlite://{}", db_path.display());

        let config = Config {
            server_host: "127.0.0.1".to_string(),
            server_port: 0,
            database_url: database_url.clone(),
            db_max_connections: 5,
            api_url: "http://localhost:8080".to_string(),
            jwt_secret: "integration-test-secret".to_string(),
            jwt_expiry_seconds: 3600,
            send_queue_capacity: 16,
            delivery_timeout_ms: 200,
        };

        let pool = db::prepare_database(&database_url, config.db_max_connections).await?;
        let state = AppState::new(config, pool);

        Ok(Self {
            _temp_dir: temp_dir,
            state,
        })
    }

    fn router(&self) -> Router {
        api::create_router(self.state.clone())
    }

    async fn send(&self, request: Request<Body>) -> TestResult<(StatusCode, Value)> {
        let response = self.router().oneshot(request).await?;
        let status = response.status();
        let bytes = response.into_body().collect().await?.to_bytes();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)?
        };
        Ok((status, body))
    }

    async fn register(&self, email: &str) -> TestResult<i64> {
        let (status, body) = self
            .send(post_json(
                "/auth/register",
                None,
                json!({"email": email, "password": PASSWORD}),
            )?)
            .await?;
        assert_eq!(status, StatusCode::OK, "register failed: {body}");
        Ok(body["user_id"].as_i64().expect("user_id in response"))
    }

    async fn login(&self, email: &str) -> TestResult<String> {
        let (status, body) = self
            .send(post_json(
                "/auth/login",
                None,
                json!({"email": email, "password": PASSWORD}),
            )?)
            .await?;
        assert_eq!(status, StatusCode::OK, "login failed: {body}");
        Ok(body["access_token"]
            .as_str()
            .expect("access_token in response")
            .to_string())
    }

    async fn register_and_login(&self, email: &str) -> TestResult<(i64, String)> {
        let user_id = self.register(email).await?;
        let token = self.login(email).await?;
        Ok((user_id, token))
    }

    async fn create_direct_room(&self, token: &str, a: i64, b: i64) -> TestResult<i64> {
        let (status, body) = self
            .send(post_json(
                "/chat_rooms/direct",
                Some(token),
                json!({"user_ids": [a, b]}),
            )?)
            .await?;
        assert_eq!(status, StatusCode::CREATED, "room creation failed: {body}");
        Ok(body["id"].as_i64().expect("room id in response"))
    }

    async fn rename(&self, token: &str, display_name: &str) -> TestResult<()> {
        let (status, _) = self
            .send(json_request(
                Method::PUT,
                "/users/me/display_name",
                Some(token),
                json!({"display_name": display_name}),
            )?)
            .await?;
        assert_eq!(status, StatusCode::OK);
        Ok(())
    }
}

fn get(uri: &str, token: Option<&str>) -> TestResult<Request<Body>> {
    let mut builder = Request::builder().uri(uri);
    if let Some(token) = token {
        builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
    }
    Ok(builder.body(Body::empty())?)
}

fn json_request(
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Value,
) -> TestResult<Request<Body>> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
    }
    Ok(builder.body(Body::from(body.to_string()))?)
}

fn post_json(uri: &str, token: Option<&str>, body: Value) -> TestResult<Request<Body>> {
    json_request(Method::POST, uri, token, body)
}

mod auth_tests {
    use super::*;

    #[tokio::test]
    async fn register_returns_user_id() -> TestResult {
        let app = TestApp::new().await?;

        let (status, body) = app
            .send(post_json(
                "/auth/register",
                None,
                json!({"email": "alice@example.com", "password": PASSWORD}),
            )?)
            .await?;

        assert_eq!(status, StatusCode::OK);
        assert!(body["user_id"].as_i64().unwrap() > 0);
        Ok(())
    }

    #[tokio::test]
    async fn register_rejects_duplicate_email() -> TestResult {
        let app = TestApp::new().await?;
        app.register("alice@example.com").await?;

        let (status, body) = app
            .send(post_json(
                "/auth/register",
                None,
                json!({"email": "alice@example.com", "password": PASSWORD}),
            )?)
            .await?;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Email already exists");
        Ok(())
    }

    #[tokio::test]
    async fn register_rejects_weak_password() -> TestResult {
        let app = TestApp::new().await?;

        for weak in ["short1!", "nodigits!", "NoSpecial1", "12345678!"] {
            let (status, _) = app
                .send(post_json(
                    "/auth/register",
                    None,
                    json!({"email": "alice@example.com", "password": weak}),
                )?)
                .await?;
            assert_eq!(status, StatusCode::BAD_REQUEST, "accepted weak password {weak}");
        }
        Ok(())
    }

    #[tokio::test]
    async fn register_rejects_invalid_email() -> TestResult {
        let app = TestApp::new().await?;

        let (status, _) = app
            .send(post_json(
                "/auth/register",
                None,
                json!({"email": "not-an-email", "password": PASSWORD}),
            )?)
            .await?;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        // a second @ must not pass as part of the domain
        let (status, _) = app
            .send(post_json(
                "/auth/register",
                None,
                json!({"email": "alice@@example.com", "password": PASSWORD}),
            )?)
            .await?;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        Ok(())
    }

    #[tokio::test]
    async fn login_returns_bearer_token() -> TestResult {
        let app = TestApp::new().await?;
        app.register("alice@example.com").await?;

        let (status, body) = app
            .send(post_json(
                "/auth/login",
                None,
                json!({"email": "alice@example.com", "password": PASSWORD}),
            )?)
            .await?;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["token_type"], "Bearer");
        assert!(!body["access_token"].as_str().unwrap().is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn login_rejects_bad_credentials_uniformly() -> TestResult {
        let app = TestApp::new().await?;
        app.register("alice@example.com").await?;

        // wrong password
        let (status, body) = app
            .send(post_json(
                "/auth/login",
                None,
                json!({"email": "alice@example.com", "password": "Wr0ng!pass"}),
            )?)
            .await?;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "Invalid Credentials");

        // unknown email answers with the same message
        let (status, body) = app
            .send(post_json(
                "/auth/login",
                None,
                json!({"email": "nobody@example.com", "password": PASSWORD}),
            )?)
            .await?;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "Invalid Credentials");
        Ok(())
    }

    #[tokio::test]
    async fn me_returns_profile_with_fallback_avatar() -> TestResult {
        let app = TestApp::new().await?;
        let (user_id, token) = app.register_and_login("alice@example.com").await?;

        let (status, body) = app.send(get("/auth/me", Some(&token))?).await?;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["id"].as_i64().unwrap(), user_id);
        assert_eq!(body["email"], "alice@example.com");
        assert_eq!(body["display_name"], "New User");
        assert_eq!(body["avatar_url"], "https://ui-avatars.com/api/?name=New+User");
        Ok(())
    }

    #[tokio::test]
    async fn me_requires_token() -> TestResult {
        let app = TestApp::new().await?;

        let (status, _) = app.send(get("/auth/me", None)?).await?;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, _) = app.send(get("/auth/me", Some("garbage"))?).await?;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        Ok(())
    }
}

mod profile_tests {
    use super::*;

    // 1x1 transparent PNG
    const PNG_BYTES: &[u8] = &[
        0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48,
        0x44, 0x52, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x06, 0x00, 0x00,
        0x00, 0x1F, 0x15, 0xC4, 0x89, 0x00, 0x00, 0x00, 0x0A, 0x49, 0x44, 0x41, 0x54, 0x78,
        0x9C, 0x63, 0x00, 0x01, 0x00, 0x00, 0x05, 0x00, 0x01, 0x0D, 0x0A, 0x2D, 0xB4, 0x00,
        0x00, 0x00, 0x00, 0x49, 0x45, 0x4E, 0x44, 0xAE, 0x42, 0x60, 0x82,
    ];

    fn multipart_upload(token: &str, bytes: &[u8]) -> TestResult<Request<Body>> {
        let boundary = "ParlorTestBoundary7MA4YWxkTrZu0gW";
        let mut body = Vec::new();
        body.extend_from_slice(
            format!(
                "--{boundary}\r\nContent-Disposition: form-data; name=\"file\"; \
                 filename=\"avatar.png\"\r\nContent-Type: image/png\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());

        Ok(Request::builder()
            .method(Method::PUT)
            .uri("/users/me/avatar")
            .header(AUTHORIZATION, format!("Bearer {token}"))
            .header(
                CONTENT_TYPE,
                format!("multipart/form-data; boundary={boundary}"),
            )
            .body(Body::from(body))?)
    }

    #[tokio::test]
    async fn update_display_name_is_reflected_in_profile() -> TestResult {
        let app = TestApp::new().await?;
        let (_, token) = app.register_and_login("alice@example.com").await?;

        let (status, body) = app
            .send(json_request(
                Method::PUT,
                "/users/me/display_name",
                Some(&token),
                json!({"display_name": "Alice Doe"}),
            )?)
            .await?;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["display_name"], "Alice Doe");

        let (_, me) = app.send(get("/auth/me", Some(&token))?).await?;
        assert_eq!(me["display_name"], "Alice Doe");
        assert_eq!(me["avatar_url"], "https://ui-avatars.com/api/?name=Alice+Doe");
        Ok(())
    }

    #[tokio::test]
    async fn update_display_name_rejects_blank() -> TestResult {
        let app = TestApp::new().await?;
        let (_, token) = app.register_and_login("alice@example.com").await?;

        let (status, _) = app
            .send(json_request(
                Method::PUT,
                "/users/me/display_name",
                Some(&token),
                json!({"display_name": "   "}),
            )?)
            .await?;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        Ok(())
    }

    #[tokio::test]
    async fn avatar_upload_roundtrip() -> TestResult {
        let app = TestApp::new().await?;
        let (_, token) = app.register_and_login("alice@example.com").await?;

        let (status, body) = app.send(multipart_upload(&token, PNG_BYTES)?).await?;
        assert_eq!(status, StatusCode::OK, "upload failed: {body}");
        let file_id = body["file_id"].as_i64().unwrap();

        // avatar URL now points at the uploaded image
        let (_, me) = app.send(get("/auth/me", Some(&token))?).await?;
        assert_eq!(
            me["avatar_url"],
            format!("http://localhost:8080/images/{file_id}")
        );

        // the image is served back byte for byte, without auth
        let response = app
            .router()
            .oneshot(get(&format!("/images/{file_id}"), None)?)
            .await?;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(CONTENT_TYPE).unwrap(),
            "image/png"
        );
        let served = response.into_body().collect().await?.to_bytes();
        assert_eq!(served.as_ref(), PNG_BYTES);
        Ok(())
    }

    #[tokio::test]
    async fn missing_image_is_not_found() -> TestResult {
        let app = TestApp::new().await?;

        let (status, _) = app.send(get("/images/424242", None)?).await?;
        assert_eq!(status, StatusCode::NOT_FOUND);
        Ok(())
    }

    #[tokio::test]
    async fn get_user_returns_display_name() -> TestResult {
        let app = TestApp::new().await?;
        let alice_id = app.register("alice@example.com").await?;

        // public lookup: no bearer required
        let (status, body) = app.send(get(&format!("/users/{alice_id}"), None)?).await?;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["display_name"], "New User");

        let (status, _) = app.send(get("/users/424242", None)?).await?;
        assert_eq!(status, StatusCode::NOT_FOUND);
        Ok(())
    }
}

mod chat_room_tests {
    use super::*;

    #[tokio::test]
    async fn create_direct_room_labels_it_with_the_partner() -> TestResult {
        let app = TestApp::new().await?;
        let (alice_id, alice_token) = app.register_and_login("alice@example.com").await?;
        let (bob_id, bob_token) = app.register_and_login("bob@example.com").await?;
        app.rename(&bob_token, "Bob").await?;

        let (status, body) = app
            .send(post_json(
                "/chat_rooms/direct",
                Some(&alice_token),
                json!({"user_ids": [alice_id, bob_id]}),
            )?)
            .await?;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["type"], "direct");
        assert_eq!(body["user_ids"], json!([alice_id, bob_id]));
        assert_eq!(body["name"], "Bob");
        assert_eq!(body["avatar_url"], "https://ui-avatars.com/api/?name=Bob");
        Ok(())
    }

    #[tokio::test]
    async fn duplicate_direct_room_conflicts_in_either_order() -> TestResult {
        let app = TestApp::new().await?;
        let (alice_id, alice_token) = app.register_and_login("alice@example.com").await?;
        let (bob_id, bob_token) = app.register_and_login("bob@example.com").await?;

        app.create_direct_room(&alice_token, alice_id, bob_id).await?;

        for (token, ids) in [
            (&alice_token, json!([alice_id, bob_id])),
            (&bob_token, json!([bob_id, alice_id])),
        ] {
            let (status, body) = app
                .send(post_json(
                    "/chat_rooms/direct",
                    Some(token),
                    json!({"user_ids": ids}),
                )?)
                .await?;
            assert_eq!(status, StatusCode::CONFLICT);
            assert_eq!(body["error"], "Chat room already exists");
        }
        Ok(())
    }

    #[tokio::test]
    async fn create_direct_room_validates_the_pair() -> TestResult {
        let app = TestApp::new().await?;
        let (alice_id, alice_token) = app.register_and_login("alice@example.com").await?;
        let (bob_id, _) = app.register_and_login("bob@example.com").await?;
        let (carol_id, _) = app.register_and_login("carol@example.com").await?;

        // wrong arity
        let (status, _) = app
            .send(post_json(
                "/chat_rooms/direct",
                Some(&alice_token),
                json!({"user_ids": [alice_id]}),
            )?)
            .await?;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        // self-pair
        let (status, _) = app
            .send(post_json(
                "/chat_rooms/direct",
                Some(&alice_token),
                json!({"user_ids": [alice_id, alice_id]}),
            )?)
            .await?;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        // caller not in the pair
        let (status, _) = app
            .send(post_json(
                "/chat_rooms/direct",
                Some(&alice_token),
                json!({"user_ids": [bob_id, carol_id]}),
            )?)
            .await?;
        assert_eq!(status, StatusCode::FORBIDDEN);

        // unknown partner
        let (status, _) = app
            .send(post_json(
                "/chat_rooms/direct",
                Some(&alice_token),
                json!({"user_ids": [alice_id, 424242]}),
            )?)
            .await?;
        assert_eq!(status, StatusCode::NOT_FOUND);
        Ok(())
    }

    #[tokio::test]
    async fn list_chat_rooms_shows_each_partner() -> TestResult {
        let app = TestApp::new().await?;
        let (alice_id, alice_token) = app.register_and_login("alice@example.com").await?;
        let (bob_id, bob_token) = app.register_and_login("bob@example.com").await?;
        let (carol_id, carol_token) = app.register_and_login("carol@example.com").await?;
        app.rename(&bob_token, "Bob").await?;
        app.rename(&carol_token, "Carol").await?;

        app.create_direct_room(&alice_token, alice_id, bob_id).await?;
        app.create_direct_room(&alice_token, alice_id, carol_id).await?;

        let (status, body) = app.send(get("/chat_rooms", Some(&alice_token))?).await?;
        assert_eq!(status, StatusCode::OK);

        let rooms = body["chat_rooms"].as_array().unwrap();
        assert_eq!(rooms.len(), 2);
        let names: Vec<&str> = rooms.iter().map(|r| r["name"].as_str().unwrap()).collect();
        assert_eq!(names, vec!["Bob", "Carol"]);

        // Bob only sees his room with Alice
        let (_, body) = app.send(get("/chat_rooms", Some(&bob_token))?).await?;
        assert_eq!(body["chat_rooms"].as_array().unwrap().len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn find_direct_room_by_partner() -> TestResult {
        let app = TestApp::new().await?;
        let (alice_id, alice_token) = app.register_and_login("alice@example.com").await?;
        let (bob_id, bob_token) = app.register_and_login("bob@example.com").await?;

        let room_id = app.create_direct_room(&alice_token, alice_id, bob_id).await?;

        // resolves from both sides
        for token in [&alice_token, &bob_token] {
            let partner = if token == &alice_token { bob_id } else { alice_id };
            let (status, body) = app
                .send(get(
                    &format!("/chat_rooms/direct?partner_id={partner}"),
                    Some(token),
                )?)
                .await?;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(body["id"].as_i64().unwrap(), room_id);
        }

        let (status, _) = app
            .send(get("/chat_rooms/direct?partner_id=424242", Some(&alice_token))?)
            .await?;
        assert_eq!(status, StatusCode::NOT_FOUND);
        Ok(())
    }

    #[tokio::test]
    async fn get_chat_room_is_members_only() -> TestResult {
        let app = TestApp::new().await?;
        let (alice_id, alice_token) = app.register_and_login("alice@example.com").await?;
        let (bob_id, _) = app.register_and_login("bob@example.com").await?;
        let (_, carol_token) = app.register_and_login("carol@example.com").await?;

        let room_id = app.create_direct_room(&alice_token, alice_id, bob_id).await?;

        let (status, body) = app
            .send(get(&format!("/chat_rooms/{room_id}"), Some(&alice_token))?)
            .await?;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["id"].as_i64().unwrap(), room_id);

        let (status, body) = app
            .send(get(&format!("/chat_rooms/{room_id}"), Some(&carol_token))?)
            .await?;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["error"], "Not a member of this chat room");

        let (status, _) = app.send(get("/chat_rooms/424242", Some(&alice_token))?).await?;
        assert_eq!(status, StatusCode::NOT_FOUND);
        Ok(())
    }
}

mod message_tests {
    use super::*;

    #[tokio::test]
    async fn send_message_persists_and_lists() -> TestResult {
        let app = TestApp::new().await?;
        let (alice_id, alice_token) = app.register_and_login("alice@example.com").await?;
        let (bob_id, bob_token) = app.register_and_login("bob@example.com").await?;
        let room_id = app.create_direct_room(&alice_token, alice_id, bob_id).await?;

        let (status, body) = app
            .send(post_json(
                "/messages",
                Some(&alice_token),
                json!({"chat_room_id": room_id, "content": "hello bob"}),
            )?)
            .await?;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["content"], "hello bob");
        assert_eq!(body["user_id"].as_i64().unwrap(), alice_id);
        assert_eq!(body["chat_room_id"].as_i64().unwrap(), room_id);
        assert!(body["id"].as_i64().unwrap() > 0);

        // the other member reads it back
        let (status, body) = app
            .send(get(
                &format!("/messages?chat_room_id={room_id}"),
                Some(&bob_token),
            )?)
            .await?;
        assert_eq!(status, StatusCode::OK);
        let messages = body["messages"].as_array().unwrap();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0]["content"], "hello bob");
        Ok(())
    }

    #[tokio::test]
    async fn history_pages_newest_first() -> TestResult {
        let app = TestApp::new().await?;
        let (alice_id, alice_token) = app.register_and_login("alice@example.com").await?;
        let (bob_id, _) = app.register_and_login("bob@example.com").await?;
        let room_id = app.create_direct_room(&alice_token, alice_id, bob_id).await?;

        for i in 0..10 {
            let (status, _) = app
                .send(post_json(
                    "/messages",
                    Some(&alice_token),
                    json!({"chat_room_id": room_id, "content": format!("Message {i}")}),
                )?)
                .await?;
            assert_eq!(status, StatusCode::CREATED);
        }

        let (status, body) = app
            .send(get(
                &format!("/messages?chat_room_id={room_id}&page=5&page_size=2"),
                Some(&alice_token),
            )?)
            .await?;
        assert_eq!(status, StatusCode::OK);
        let contents: Vec<&str> = body["messages"]
            .as_array()
            .unwrap()
            .iter()
            .map(|m| m["content"].as_str().unwrap())
            .collect();
        assert_eq!(contents, vec!["Message 1", "Message 0"]);

        // past the end
        let (_, body) = app
            .send(get(
                &format!("/messages?chat_room_id={room_id}&page=6&page_size=2"),
                Some(&alice_token),
            )?)
            .await?;
        assert!(body["messages"].as_array().unwrap().is_empty());

        // page numbering starts at 1
        let (status, _) = app
            .send(get(
                &format!("/messages?chat_room_id={room_id}&page=0&page_size=2"),
                Some(&alice_token),
            )?)
            .await?;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        Ok(())
    }

    #[tokio::test]
    async fn outsiders_cannot_read_or_post() -> TestResult {
        let app = TestApp::new().await?;
        let (alice_id, alice_token) = app.register_and_login("alice@example.com").await?;
        let (bob_id, _) = app.register_and_login("bob@example.com").await?;
        let (_, carol_token) = app.register_and_login("carol@example.com").await?;
        let room_id = app.create_direct_room(&alice_token, alice_id, bob_id).await?;

        let (status, _) = app
            .send(get(
                &format!("/messages?chat_room_id={room_id}"),
                Some(&carol_token),
            )?)
            .await?;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, _) = app
            .send(post_json(
                "/messages",
                Some(&carol_token),
                json!({"chat_room_id": room_id, "content": "let me in"}),
            )?)
            .await?;
        assert_eq!(status, StatusCode::FORBIDDEN);

        // nothing was stored
        let (_, body) = app
            .send(get(
                &format!("/messages?chat_room_id={room_id}"),
                Some(&alice_token),
            )?)
            .await?;
        assert!(body["messages"].as_array().unwrap().is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn message_validation() -> TestResult {
        let app = TestApp::new().await?;
        let (alice_id, alice_token) = app.register_and_login("alice@example.com").await?;
        let (bob_id, _) = app.register_and_login("bob@example.com").await?;
        let room_id = app.create_direct_room(&alice_token, alice_id, bob_id).await?;

        // unknown room
        let (status, _) = app
            .send(post_json(
                "/messages",
                Some(&alice_token),
                json!({"chat_room_id": 424242, "content": "hello"}),
            )?)
            .await?;
        assert_eq!(status, StatusCode::NOT_FOUND);

        // blank content
        let (status, _) = app
            .send(post_json(
                "/messages",
                Some(&alice_token),
                json!({"chat_room_id": room_id, "content": "   "}),
            )?)
            .await?;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        Ok(())
    }
}

mod health_tests {
    use super::*;

    #[tokio::test]
    async fn health_reports_database_status() -> TestResult {
        let app = TestApp::new().await?;

        let (status, body) = app.send(get("/health", None)?).await?;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["database"], "connected");
        Ok(())
    }
}
