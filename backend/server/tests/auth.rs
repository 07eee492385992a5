mod common;

use reqwest::{Method, StatusCode};
use serde_json::json;
use server::{Config, Environment};

use common::{PASSWORD, spawn, spawn_with};

#[tokio::test]
async fn test_register_login_logout() {
    let app = spawn().await;

    let (status, body) = app
        .post(
            "/api/auth/register",
            None,
            json!({ "name": "Ada", "email": "  Ada@Example.com ", "password": PASSWORD }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    assert_eq!(body["data"]["email"], "ada@example.com");
    assert_eq!(body["data"]["role"], "user");
    assert!(body["data"].get("password").is_none());

    let token = app.login("ADA@example.com", PASSWORD).await;

    let (status, body) = app.get("/api/profile", Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["name"], "Ada");

    let (status, _) = app.post("/api/auth/logout", Some(&token), json!({})).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app.get("/api/profile", Some(&token)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Authentication required");
}

#[tokio::test]
async fn test_duplicate_email() {
    let app = spawn().await;
    app.shopper("dup@example.com").await;

    let (status, body) = app
        .post(
            "/api/auth/register",
            None,
            json!({ "name": "Again", "email": "DUP@example.com", "password": PASSWORD }),
        )
        .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["message"], "User with this email already exists");
}

#[tokio::test]
async fn test_weak_password_rejected() {
    let app = spawn().await;

    let (status, body) = app
        .post(
            "/api/auth/register",
            None,
            json!({ "name": "Weak", "email": "weak@example.com", "password": "abc" }),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Password does not meet security requirements");
    let errors = body["errors"].as_array().unwrap();
    assert!(errors.contains(&json!("At least 8 characters")));
    assert!(errors.contains(&json!("No sequential characters")));
}

#[tokio::test]
async fn test_bad_credentials() {
    let app = spawn().await;
    app.shopper("who@example.com").await;

    for (email, password) in [("who@example.com", "Wrong-Pass9"), ("nobody@example.com", PASSWORD)] {
        let (status, body) = app
            .post(
                "/api/auth/login",
                None,
                json!({ "email": email, "password": password }),
            )
            .await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["message"], "Invalid email or password");
    }
}

#[tokio::test]
async fn test_password_policy_report() {
    let app = spawn().await;

    let (_, body) = app
        .post("/api/auth/password-policy", None, json!({ "password": PASSWORD }))
        .await;
    assert_eq!(body["data"]["valid"], true);
    assert_eq!(body["data"]["violations"], json!([]));

    let (_, body) = app
        .post("/api/auth/password-policy", None, json!({ "password": "password" }))
        .await;
    assert_eq!(body["data"]["valid"], false);
    assert!(
        body["data"]["violations"]
            .as_array()
            .unwrap()
            .contains(&json!("No common patterns"))
    );
}

#[tokio::test]
async fn test_password_reset_is_single_use() {
    let app = spawn().await;
    app.shopper("reset@example.com").await;

    let (status, body) = app
        .post(
            "/api/auth/forgot-password",
            None,
            json!({ "email": "reset@example.com" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let url = body["data"]["resetUrl"].as_str().unwrap();
    let token = url.split("token=").nth(1).unwrap().to_string();

    // a weak password does not consume the token
    let (status, _) = app
        .post(
            "/api/auth/reset-password",
            None,
            json!({ "token": token, "newPassword": "short" }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let new_password = "Blu3-Harbor#7";
    let (status, body) = app
        .post(
            "/api/auth/reset-password",
            None,
            json!({ "token": token, "newPassword": new_password }),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");

    let (status, body) = app
        .post(
            "/api/auth/reset-password",
            None,
            json!({ "token": token, "newPassword": new_password }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid or expired reset token");

    app.login("reset@example.com", new_password).await;
}

#[tokio::test]
async fn test_forgot_password_hides_unknown_emails() {
    let app = spawn().await;
    app.shopper("known@example.com").await;

    let (_, known) = app
        .post("/api/auth/forgot-password", None, json!({ "email": "known@example.com" }))
        .await;
    let (status, unknown) = app
        .post("/api/auth/forgot-password", None, json!({ "email": "ghost@example.com" }))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(known["message"], unknown["message"]);
    assert!(unknown["data"].get("resetUrl").is_none());
}

#[tokio::test]
async fn test_production_does_not_return_reset_url() {
    let app = spawn_with(Config {
        environment: Environment::Production,
        ..Config::default()
    })
    .await;
    app.shopper("prod@example.com").await;

    let (status, body) = app
        .post("/api/auth/forgot-password", None, json!({ "email": "prod@example.com" }))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["data"].get("resetUrl").is_none());
}

#[tokio::test]
async fn test_change_password() {
    let app = spawn().await;
    let token = app.shopper("change@example.com").await;

    let (status, body) = app
        .send(
            Method::PUT,
            "/api/profile/password",
            Some(&token),
            json!({ "currentPassword": "Not-It-42", "newPassword": "Blu3-Harbor#7" }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Current password is incorrect");

    let (status, body) = app
        .send(
            Method::PUT,
            "/api/profile/password",
            Some(&token),
            json!({ "currentPassword": PASSWORD, "newPassword": PASSWORD }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["message"],
        "New password must be different from the current password"
    );

    let (status, body) = app
        .send(
            Method::PUT,
            "/api/profile/password",
            Some(&token),
            json!({ "currentPassword": PASSWORD, "newPassword": "Blu3-Harbor#7" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["message"], "Password updated successfully");

    app.login("change@example.com", "Blu3-Harbor#7").await;
}
