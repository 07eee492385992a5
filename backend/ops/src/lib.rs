//! # Operator CLI
//!
//! Talks to a running storefront over its HTTP API with an admin account.
//! Nothing here touches Redis directly, so the server's checks (admin only,
//! no seeding in production) apply to every command.
//!
//! ## Import files
//!
//! A JSON array of products:
//! ```json
//! [{ "name": "Mop_Bucket", "price": 24.5, "category": "Cleaning", "stock": 10 }]
//! ```
//! Names are cleaned with [`utils::clean_name`] and categories matched without
//! regard to case. Bad records are reported and skipped, the rest still go in.
use std::{fs, path::Path, str::FromStr};

use anyhow::{Context, Result, anyhow, bail};
use catalog::{OrderStatus, Product};
use indicatif::{ProgressBar, ProgressStyle};
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::{DeserializeOwned, IgnoredAny};

pub mod models;
pub mod utils;

use models::{Credentials, Envelope, ImportRecord, Orders, SeedStatus, Session, StatusUpdate};
use utils::money;

pub struct OpsClient {
    http: Client,
    base: String,
    token: String,
}

impl OpsClient {
    /// Signs in and keeps the session for later calls.
    pub async fn connect(url: &str, email: &str, password: &str) -> Result<Self> {
        let http = Client::new();
        let base = url.trim_end_matches('/').to_string();

        let response = http
            .post(format!("{base}/api/auth/login"))
            .json(&Credentials { email, password })
            .send()
            .await
            .with_context(|| format!("Could not reach {base}"))?;

        let session: Session = read::<Session>(response)
            .await
            .context("Login failed")?
            .data
            .ok_or_else(|| anyhow!("Login returned no session"))?;

        Ok(Self {
            http,
            base,
            token: session.token,
        })
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.http
            .request(method, format!("{}{path}", self.base))
            .bearer_auth(&self.token)
    }

    async fn send<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<Envelope<T>> {
        let response = builder.send().await.context("Request failed")?;

        read(response).await
    }
}

async fn read<T: DeserializeOwned>(response: Response) -> Result<Envelope<T>> {
    let status = response.status();
    let envelope: Envelope<T> = response
        .json()
        .await
        .with_context(|| format!("Unexpected response ({status})"))?;

    if !envelope.success {
        let message = envelope.message.unwrap_or_else(|| status.to_string());

        if envelope.errors.is_empty() {
            bail!("{message}");
        }
        bail!("{message}: {}", envelope.errors.join(", "));
    }

    Ok(envelope)
}

fn print_message<T>(envelope: Envelope<T>) {
    if let Some(message) = envelope.message {
        println!("{message}");
    }
}

pub async fn print_status(client: &OpsClient) -> Result<()> {
    let status: SeedStatus = client
        .send(client.request(Method::GET, "/api/seed"))
        .await?
        .data
        .ok_or_else(|| anyhow!("Status returned no data"))?;

    println!("Total Products: {}\n", status.total_products);
    for entry in status.categories {
        println!("{:<12} {}", entry.category.as_str(), entry.count);
    }

    Ok(())
}

pub async fn seed(client: &OpsClient) -> Result<()> {
    let envelope: Envelope<IgnoredAny> = client
        .send(client.request(Method::POST, "/api/seed"))
        .await
        .context("Seeding failed")?;

    print_message(envelope);
    Ok(())
}

pub async fn clear(client: &OpsClient) -> Result<()> {
    let envelope: Envelope<IgnoredAny> = client
        .send(client.request(Method::DELETE, "/api/seed"))
        .await
        .context("Clearing failed")?;

    print_message(envelope);
    Ok(())
}

pub async fn import_products(client: &OpsClient, path: &Path) -> Result<()> {
    let raw = fs::read_to_string(path).with_context(|| format!("Reading {}", path.display()))?;
    let records: Vec<ImportRecord> =
        serde_json::from_str(&raw).with_context(|| format!("Parsing {}", path.display()))?;

    println!("Loaded Records: {}\n", records.len());

    let pb = ProgressBar::new(records.len() as u64);
    pb.set_style(
        ProgressStyle::with_template(
            "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}",
        )?
        .progress_chars("=> "),
    );

    let mut created = 0;
    let mut failed = 0;

    for record in records {
        let name = record.name.clone();
        pb.set_message(format!("Creating {name}"));

        let outcome = match record.into_input() {
            Ok(input) => client
                .send::<Product>(client.request(Method::POST, "/api/products").json(&input))
                .await
                .map(|_| ())
                .map_err(|e| format!("{e:#}")),
            Err(reason) => Err(reason),
        };

        match outcome {
            Ok(()) => created += 1,
            Err(reason) => {
                pb.println(format!("Skipped {name}: {reason}"));
                failed += 1;
            }
        }

        pb.inc(1);
    }

    pb.finish_with_message("Done");

    println!("\nCreated: {created}");
    println!("Failed: {failed}");

    Ok(())
}

pub async fn print_orders(client: &OpsClient) -> Result<()> {
    let orders: Orders = client
        .send(client.request(Method::GET, "/api/admin/orders"))
        .await?
        .data
        .unwrap_or_default();

    if orders.is_empty() {
        println!("No orders.");
        return Ok(());
    }

    for order in &orders {
        let units: u32 = order.items.iter().map(|item| item.quantity).sum();

        println!(
            "{}  {:<10}  {:>10}  {:>3} units  {}  {}",
            order.order_number,
            order.status.as_str(),
            money(order.total),
            units,
            order.created_at.format("%Y-%m-%d %H:%M"),
            order.id,
        );
    }

    println!("\nTotal Orders: {}", orders.len());

    Ok(())
}

pub async fn set_status(client: &OpsClient, order_id: &str, status: &str) -> Result<()> {
    let status = OrderStatus::from_str(status)?;

    let envelope: Envelope<IgnoredAny> = client
        .send(
            client
                .request(Method::PATCH, "/api/admin/orders")
                .json(&StatusUpdate {
                    order_id,
                    status: status.as_str(),
                }),
        )
        .await
        .with_context(|| format!("Updating {order_id}"))?;

    print_message(envelope);
    Ok(())
}
