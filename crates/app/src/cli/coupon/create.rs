//! Create a coupon.

use clap::Args;
use jiff::Timestamp;

use orchard_app::{
    context::AppContext,
    domain::coupons::models::{CouponKind, CouponUuid, NewCoupon},
};

#[derive(Debug, Args)]
pub struct CreateCouponArgs {
    /// Redemption code, e.g. WELCOME10
    #[arg(long)]
    code: String,

    /// Either "percentage" or "fixed"
    #[arg(long)]
    kind: String,

    /// Whole percent (1-100) for percentage coupons, amount in minor units
    /// for fixed coupons
    #[arg(long)]
    value: u32,

    /// RFC 3339 timestamp the coupon becomes redeemable
    #[arg(long)]
    starts_at: Option<String>,

    /// RFC 3339 timestamp the coupon stops being redeemable
    #[arg(long)]
    expires_at: Option<String>,

    /// Total redemptions across all shoppers
    #[arg(long)]
    max_uses: Option<u32>,

    /// Minimum merchandise subtotal in minor units
    #[arg(long)]
    minimum_order: Option<u64>,
}

fn parse_timestamp(raw: Option<String>, flag: &str) -> Result<Option<Timestamp>, String> {
    raw.map(|value| {
        value
            .parse::<Timestamp>()
            .map_err(|error| format!("invalid {flag}: {error}"))
    })
    .transpose()
}

pub(crate) async fn run(ctx: &AppContext, args: CreateCouponArgs) -> Result<(), String> {
    let kind = CouponKind::parse(&args.kind)
        .ok_or_else(|| format!("unknown coupon kind {:?}; use percentage or fixed", args.kind))?;

    let coupon = ctx
        .coupons
        .create_coupon(NewCoupon {
            uuid: CouponUuid::new(),
            code: args.code,
            kind,
            value: args.value,
            starts_at: parse_timestamp(args.starts_at, "--starts-at")?,
            expires_at: parse_timestamp(args.expires_at, "--expires-at")?,
            max_uses: args.max_uses,
            minimum_order: args.minimum_order,
        })
        .await
        .map_err(|error| format!("failed to create coupon: {error}"))?;

    println!("coupon_uuid: {}", coupon.uuid);
    println!("code: {}", coupon.code);

    Ok(())
}
