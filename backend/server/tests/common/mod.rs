#![allow(dead_code)]

use std::sync::Arc;

use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde_json::{Value, json};
use server::{AppState, Config, MemoryStore, StoreBackend, app};
use tokio::net::TcpListener;

pub const PASSWORD: &str = "Gr8-Monsoon!";

pub struct TestApp {
    pub base: String,
    pub client: Client,
    pub state: Arc<AppState>,
}

pub async fn spawn() -> TestApp {
    spawn_with(Config::default()).await
}

pub async fn spawn_with(config: Config) -> TestApp {
    let config = Config {
        store: StoreBackend::Memory,
        ..config
    };
    let state = AppState::with_store(config, Arc::new(MemoryStore::new()));

    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let address = listener.local_addr().expect("local addr");

    let router = app(state.clone());
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("serve");
    });

    TestApp {
        base: format!("http://{address}"),
        client: Client::new(),
        state,
    }
}

impl TestApp {
    pub fn request(&self, method: Method, path: &str, token: Option<&str>) -> RequestBuilder {
        let builder = self.client.request(method, format!("{}{path}", self.base));

        match token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    pub async fn get(&self, path: &str, token: Option<&str>) -> (StatusCode, Value) {
        read(self.request(Method::GET, path, token).send().await.expect("send")).await
    }

    pub async fn send(
        &self,
        method: Method,
        path: &str,
        token: Option<&str>,
        body: Value,
    ) -> (StatusCode, Value) {
        read(
            self.request(method, path, token)
                .json(&body)
                .send()
                .await
                .expect("send"),
        )
        .await
    }

    pub async fn post(&self, path: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        self.send(Method::POST, path, token, body).await
    }

    pub async fn login(&self, email: &str, password: &str) -> String {
        let (status, body) = self
            .post(
                "/api/auth/login",
                None,
                json!({ "email": email, "password": password }),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "{body}");

        body["data"]["token"].as_str().expect("token").to_string()
    }

    /// Registers a shopper and returns a session token.
    pub async fn shopper(&self, email: &str) -> String {
        let (status, body) = self
            .post(
                "/api/auth/register",
                None,
                json!({ "name": "Shopper", "email": email, "password": PASSWORD }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");

        self.login(email, PASSWORD).await
    }

    /// Creates the first admin and returns a session token.
    pub async fn admin(&self) -> String {
        let (status, body) = self
            .post(
                "/api/admin/create-admin",
                None,
                json!({ "name": "Admin", "email": "admin@example.com", "password": PASSWORD }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");

        self.login("admin@example.com", PASSWORD).await
    }

    /// Creates a product as `admin` and returns its id.
    pub async fn product(&self, admin: &str, name: &str, price: f64, stock: u32) -> String {
        let (status, body) = self
            .post(
                "/api/products",
                Some(admin),
                json!({
                    "name": name,
                    "description": format!("{name} description"),
                    "price": price,
                    "category": "cleaning",
                    "images": [],
                    "stock": stock,
                }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");

        body["data"]["_id"].as_str().expect("id").to_string()
    }
}

async fn read(response: Response) -> (StatusCode, Value) {
    let status = response.status();
    let body = response.json().await.unwrap_or(Value::Null);

    (status, body)
}
