//! List orders.

use tabled::{Table, Tabled};

use orchard_app::context::AppContext;

use crate::cli::format_amount;

#[derive(Tabled)]
struct OrderRow {
    uuid: String,
    status: String,
    subtotal: String,
    discounts: String,
    total: String,
    placed: String,
}

pub(crate) async fn run(ctx: &AppContext) -> Result<(), String> {
    let orders = ctx
        .orders
        .list_all_orders()
        .await
        .map_err(|error| format!("failed to list orders: {error}"))?;

    let rows: Vec<OrderRow> = orders
        .iter()
        .map(|order| OrderRow {
            uuid: order.uuid.to_string(),
            status: order.status.to_string(),
            subtotal: format_amount(order.subtotal),
            discounts: format_amount(order.coupon_discount + order.points_discount),
            total: format_amount(order.total),
            placed: order.created_at.to_string(),
        })
        .collect();

    println!("{}", Table::new(rows));

    Ok(())
}
