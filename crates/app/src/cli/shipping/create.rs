//! Create a shipping method.

use clap::Args;

use orchard_app::{
    context::AppContext,
    domain::shipping::models::{NewShippingMethod, ShippingMethodUuid},
};

use crate::cli::format_amount;

#[derive(Debug, Args)]
pub struct CreateShippingMethodArgs {
    /// Display name, e.g. "Standard"
    #[arg(long)]
    name: String,

    /// Flat cost in minor units
    #[arg(long)]
    price: u64,
}

pub(crate) async fn run(ctx: &AppContext, args: CreateShippingMethodArgs) -> Result<(), String> {
    let method = ctx
        .shipping
        .create_method(NewShippingMethod {
            uuid: ShippingMethodUuid::new(),
            name: args.name,
            price: args.price,
        })
        .await
        .map_err(|error| format!("failed to create shipping method: {error}"))?;

    println!("shipping_method_uuid: {}", method.uuid);
    println!("name: {}", method.name);
    println!("price: {}", format_amount(method.price));

    Ok(())
}
