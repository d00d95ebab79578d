//! Back-office command tree.

pub mod coupon;
pub mod order;
pub mod shipping;

use clap::{Parser, Subcommand};

use orchard_app::context::AppContext;

#[derive(Debug, Parser)]
#[command(name = "orchard-app", about = "Orchard back-office CLI", long_about = None)]
pub struct Cli {
    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    Coupon(coupon::CouponCommand),
    Order(order::OrderCommand),
    Shipping(shipping::ShippingCommand),
}

pub async fn run(cli: Cli) -> Result<(), String> {
    let ctx = AppContext::from_database_url(&cli.database_url)
        .await
        .map_err(|error| format!("failed to connect to database: {error}"))?;

    match cli.command {
        Commands::Coupon(command) => coupon::run(&ctx, command).await,
        Commands::Order(command) => order::run(&ctx, command).await,
        Commands::Shipping(command) => shipping::run(&ctx, command).await,
    }
}

/// Render a minor-unit amount for terminal output.
pub(crate) fn format_amount(minor: u64) -> String {
    format!("${}.{:02}", minor / 100, minor % 100)
}
