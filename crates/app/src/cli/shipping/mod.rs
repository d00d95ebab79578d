//! Shipping method commands.

mod create;

use clap::{Args, Subcommand};

use orchard_app::context::AppContext;

#[derive(Debug, Args)]
pub struct ShippingCommand {
    #[command(subcommand)]
    command: ShippingSubcommand,
}

#[derive(Debug, Subcommand)]
enum ShippingSubcommand {
    /// Create a new shipping method
    Create(create::CreateShippingMethodArgs),
}

pub(crate) async fn run(ctx: &AppContext, command: ShippingCommand) -> Result<(), String> {
    match command.command {
        ShippingSubcommand::Create(args) => create::run(ctx, args).await,
    }
}
