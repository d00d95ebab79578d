//! Assign a coupon to a customer.

use clap::Args;
use uuid::Uuid;

use orchard_app::{context::AppContext, domain::coupons::models::CouponUuid};

#[derive(Debug, Args)]
pub struct AssignCouponArgs {
    /// Coupon UUID
    #[arg(long)]
    coupon_uuid: Uuid,

    /// Customer email the coupon is reserved for
    #[arg(long)]
    email: String,
}

pub(crate) async fn run(ctx: &AppContext, args: AssignCouponArgs) -> Result<(), String> {
    ctx.coupons
        .assign_coupon(CouponUuid::from_uuid(args.coupon_uuid), &args.email)
        .await
        .map_err(|error| format!("failed to assign coupon: {error}"))?;

    println!("assigned {} to {}", args.coupon_uuid, args.email);

    Ok(())
}
