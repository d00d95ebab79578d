//! Coupon administration commands.

mod assign;
mod create;
mod list;

use clap::{Args, Subcommand};

use orchard_app::context::AppContext;

#[derive(Debug, Args)]
pub struct CouponCommand {
    #[command(subcommand)]
    command: CouponSubcommand,
}

#[derive(Debug, Subcommand)]
enum CouponSubcommand {
    /// Create a new coupon
    Create(create::CreateCouponArgs),

    /// List coupons that can still be redeemed
    List,

    /// Reserve a coupon for a customer email
    Assign(assign::AssignCouponArgs),
}

pub(crate) async fn run(ctx: &AppContext, command: CouponCommand) -> Result<(), String> {
    match command.command {
        CouponSubcommand::Create(args) => create::run(ctx, args).await,
        CouponSubcommand::List => list::run(ctx).await,
        CouponSubcommand::Assign(args) => assign::run(ctx, args).await,
    }
}
