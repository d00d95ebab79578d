//! List coupons.

use tabled::{Table, Tabled};

use orchard_app::{context::AppContext, domain::coupons::models::CouponKind};

use crate::cli::format_amount;

#[derive(Tabled)]
struct CouponRow {
    code: String,
    value: String,
    used: String,
    expires: String,
}

pub(crate) async fn run(ctx: &AppContext) -> Result<(), String> {
    let coupons = ctx
        .coupons
        .list_coupons()
        .await
        .map_err(|error| format!("failed to list coupons: {error}"))?;

    let rows: Vec<CouponRow> = coupons
        .iter()
        .map(|coupon| CouponRow {
            code: coupon.code.clone(),
            value: match coupon.kind {
                CouponKind::Percentage => format!("{}%", coupon.value),
                CouponKind::Fixed => format_amount(u64::from(coupon.value)),
            },
            used: match coupon.max_uses {
                Some(max) => format!("{}/{max}", coupon.used_count),
                None => coupon.used_count.to_string(),
            },
            expires: coupon
                .expires_at
                .map(|expires| expires.to_string())
                .unwrap_or_else(|| "never".to_string()),
        })
        .collect();

    println!("{}", Table::new(rows));

    Ok(())
}
