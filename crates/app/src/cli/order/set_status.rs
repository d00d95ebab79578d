//! Move an order through fulfilment.

use clap::Args;
use uuid::Uuid;

use orchard_app::{
    context::AppContext,
    domain::orders::models::{OrderStatus, OrderUuid},
};

#[derive(Debug, Args)]
pub struct SetStatusArgs {
    /// Order UUID
    #[arg(long)]
    order_uuid: Uuid,

    /// One of: pending, processing, shipped, delivered, cancelled
    #[arg(long)]
    status: String,
}

pub(crate) async fn run(ctx: &AppContext, args: SetStatusArgs) -> Result<(), String> {
    let status = OrderStatus::parse(&args.status)
        .ok_or_else(|| format!("unknown order status {:?}", args.status))?;

    let order = ctx
        .orders
        .set_status(OrderUuid::from_uuid(args.order_uuid), status)
        .await
        .map_err(|error| format!("failed to update order: {error}"))?;

    println!("order {} is now {}", order.uuid, order.status);

    Ok(())
}
