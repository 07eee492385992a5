mod common;

use futures::future::join_all;
use reqwest::{Method, StatusCode};
use serde_json::json;
use server::{Config, Environment};

use common::{PASSWORD, spawn, spawn_with};

#[tokio::test]
async fn test_first_admin_is_open_then_closed() {
    let app = spawn().await;
    let admin = app.admin().await;

    let body = json!({ "name": "Second", "email": "second@example.com", "password": PASSWORD });

    let (status, _) = app.post("/api/admin/create-admin", None, body.clone()).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let shopper = app.shopper("shopper@example.com").await;
    let (status, _) = app
        .post("/api/admin/create-admin", Some(&shopper), body.clone())
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = app.post("/api/admin/create-admin", Some(&admin), body).await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    assert_eq!(body["data"]["role"], "admin");
}

#[tokio::test]
async fn test_concurrent_bootstrap_creates_one_admin() {
    let app = spawn().await;

    let attempts = (0..8).map(|i| {
        app.post(
            "/api/admin/create-admin",
            None,
            json!({
                "name": "Racer",
                "email": format!("racer{i}@example.com"),
                "password": PASSWORD,
            }),
        )
    });
    let results = join_all(attempts).await;

    let created = results
        .iter()
        .filter(|(status, _)| *status == StatusCode::CREATED)
        .count();
    assert_eq!(created, 1);
    assert!(
        results
            .iter()
            .all(|(status, _)| [StatusCode::CREATED, StatusCode::UNAUTHORIZED].contains(status))
    );
}

#[tokio::test]
async fn test_user_management() {
    let app = spawn().await;
    let admin = app.admin().await;
    app.shopper("member@example.com").await;

    let (status, body) = app.get("/api/admin/users", Some(&admin)).await;
    assert_eq!(status, StatusCode::OK);
    let users = body["data"].as_array().unwrap();
    assert_eq!(users.len(), 2);
    let admin_id = users[0]["_id"].as_str().unwrap().to_string();
    let member_id = users[1]["_id"].as_str().unwrap().to_string();

    let (status, body) = app
        .send(
            Method::PUT,
            "/api/admin/users",
            Some(&admin),
            json!({ "userId": member_id, "role": "supplier" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["data"]["role"], "supplier");

    let (status, body) = app
        .send(
            Method::PUT,
            "/api/admin/users",
            Some(&admin),
            json!({ "userId": admin_id, "role": "user" }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "You cannot change your own role");

    let (status, body) = app
        .send(
            Method::DELETE,
            &format!("/api/admin/users?userId={admin_id}"),
            Some(&admin),
            json!({}),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "You cannot delete your own account");

    let (status, body) = app
        .send(Method::DELETE, "/api/admin/users", Some(&admin), json!({}))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "User ID is required");

    let (status, body) = app
        .send(
            Method::DELETE,
            &format!("/api/admin/users?userId={member_id}"),
            Some(&admin),
            json!({}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "User deleted successfully");

    let (status, _) = app
        .send(
            Method::DELETE,
            &format!("/api/admin/users?userId={member_id}"),
            Some(&admin),
            json!({}),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_admin_routes_reject_shoppers() {
    let app = spawn().await;
    let _admin = app.admin().await;
    let shopper = app.shopper("nosy@example.com").await;

    for path in ["/api/admin/users", "/api/admin/orders", "/api/seed"] {
        let (status, body) = app.get(path, Some(&shopper)).await;
        assert_eq!(status, StatusCode::FORBIDDEN, "{path}");
        assert_eq!(body["message"], "Access denied. Admin privileges required.");
    }
}

#[tokio::test]
async fn test_seed_and_clear() {
    let app = spawn().await;
    let admin = app.admin().await;

    let (status, body) = app.post("/api/seed", Some(&admin), json!({})).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    let seeded = body["message"].as_str().unwrap().to_string();
    assert!(seeded.starts_with("Database seeded with "));

    let (_, body) = app.get("/api/seed", Some(&admin)).await;
    let total = body["data"]["totalProducts"].as_u64().unwrap();
    assert!(total > 0);
    let categories = body["data"]["categories"].as_array().unwrap();
    let counted: u64 = categories.iter().map(|c| c["count"].as_u64().unwrap()).sum();
    assert_eq!(counted, total);
    assert!(
        categories
            .windows(2)
            .all(|w| w[0]["count"].as_u64() >= w[1]["count"].as_u64())
    );

    let (status, body) = app.post("/api/seed", Some(&admin), json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["message"],
        format!("Database already contains {total} products. Clear it before seeding.")
    );

    let (status, body) = app
        .send(Method::DELETE, "/api/seed", Some(&admin), json!({}))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], format!("Deleted {total} products"));

    let (_, body) = app.get("/api/seed", Some(&admin)).await;
    assert_eq!(body["data"]["totalProducts"], 0);
}

#[tokio::test]
async fn test_seed_refused_in_production() {
    let app = spawn_with(Config {
        environment: Environment::Production,
        ..Config::default()
    })
    .await;
    let admin = app.admin().await;

    let (status, body) = app.post("/api/seed", Some(&admin), json!({})).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["message"], "Database seeding is disabled in production");

    let (status, body) = app
        .send(Method::DELETE, "/api/seed", Some(&admin), json!({}))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["message"], "Database clearing is disabled in production");
}
