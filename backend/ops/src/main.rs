use std::path::PathBuf;

use clap::{Parser, Subcommand};
use ops::OpsClient;

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    #[arg(long, env = "OPS_URL", default_value = "http://localhost:8080")]
    url: String,

    #[arg(long, env = "OPS_EMAIL")]
    email: String,

    #[arg(long, env = "OPS_PASSWORD", hide_env_values = true)]
    password: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Product counts per category
    Status,

    /// Load the sample catalog into an empty database
    Seed,

    /// Delete every product
    Clear,

    /// Create products from a JSON array
    Import { file: PathBuf },

    /// List orders, newest first
    Orders,

    /// Move an order to another status
    SetStatus { order_id: String, status: String },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let client = OpsClient::connect(&args.url, &args.email, &args.password).await?;

    match args.command {
        Command::Status => ops::print_status(&client).await,
        Command::Seed => ops::seed(&client).await,
        Command::Clear => ops::clear(&client).await,
        Command::Import { file } => ops::import_products(&client, &file).await,
        Command::Orders => ops::print_orders(&client).await,
        Command::SetStatus { order_id, status } => {
            ops::set_status(&client, &order_id, &status).await
        }
    }
}
