//! Order fulfilment commands.

mod list;
mod set_status;

use clap::{Args, Subcommand};

use orchard_app::context::AppContext;

#[derive(Debug, Args)]
pub struct OrderCommand {
    #[command(subcommand)]
    command: OrderSubcommand,
}

#[derive(Debug, Subcommand)]
enum OrderSubcommand {
    /// List every order, newest first
    List,

    /// Move an order through fulfilment
    SetStatus(set_status::SetStatusArgs),
}

pub(crate) async fn run(ctx: &AppContext, command: OrderCommand) -> Result<(), String> {
    match command.command {
        OrderSubcommand::List => list::run(ctx).await,
        OrderSubcommand::SetStatus(args) => set_status::run(ctx, args).await,
    }
}
