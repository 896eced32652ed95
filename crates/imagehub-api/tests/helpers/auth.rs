use axum_test::TestServer;
use imagehub_api::auth::models::{SignupResponse, TokenResponse};
use imagehub_api::auth::password::hash_password;
use imagehub_core::models::Role;
use imagehub_db::test_helpers::MockDatabase;
use imagehub_db::AccountRepository;
use serde_json::json;

pub const TEST_PASSWORD: &str = "TestPassword123!";

/// Signed-in account for requests.
pub struct TestUser {
    pub id: i64,
    pub email: String,
    pub token: String,
}

impl TestUser {
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.token)
    }
}

pub async fn login(client: &TestServer, email: &str, password: &str) -> String {
    let response = client
        .post("/auth/login")
        .json(&json!({ "email": email, "password": password }))
        .await;
    assert_eq!(response.status_code(), 200, "login failed for {}", email);
    response.json::<TokenResponse>().token
}

/// Sign up a regular account through the API and log it in.
pub async fn register_test_user(client: &TestServer, email: &str) -> TestUser {
    let response = client
        .post("/auth/signup")
        .json(&json!({ "email": email, "password": TEST_PASSWORD }))
        .await;
    assert_eq!(response.status_code(), 201, "signup failed for {}", email);
    let account = response.json::<SignupResponse>();

    TestUser {
        id: account.id,
        email: account.email,
        token: login(client, email, TEST_PASSWORD).await,
    }
}

/// Admin accounts have no signup path; insert one directly and log it in.
pub async fn create_test_admin(client: &TestServer, db: &MockDatabase, email: &str) -> TestUser {
    let hash = hash_password(TEST_PASSWORD).expect("Failed to hash password");
    let account = AccountRepository::create(db, email, &hash, Role::Admin)
        .await
        .expect("Failed to create admin account");

    TestUser {
        id: account.id,
        email: account.email,
        token: login(client, email, TEST_PASSWORD).await,
    }
}
