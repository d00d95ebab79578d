//! Carts

use rusty_money::{Money, MoneyError, iso::Currency};
use thiserror::Error;

use crate::items::{LineItem, LineItemError};

/// Errors related to cart construction or valuation.
#[derive(Debug, Error)]
pub enum CartError {
    /// A line's currency differs from the cart currency
    /// (index, line currency, cart currency).
    #[error("line {0} has currency {1}, but the cart has currency {2}")]
    CurrencyMismatch(usize, &'static str, &'static str),

    /// A line could not be totalled.
    #[error(transparent)]
    LineItem(#[from] LineItemError),

    /// Wrapped money arithmetic error.
    #[error(transparent)]
    Money(#[from] MoneyError),
}

/// An ordered collection of line items in a single currency.
#[derive(Debug)]
pub struct Cart<'a> {
    lines: Vec<LineItem<'a>>,
    currency: &'static Currency,
}

impl<'a> Cart<'a> {
    /// Creates an empty cart in the given currency.
    #[must_use]
    pub fn new(currency: &'static Currency) -> Self {
        Cart {
            lines: Vec::new(),
            currency,
        }
    }

    /// Creates a cart from the given lines.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::CurrencyMismatch`] when any line is priced in a
    /// currency other than the cart's.
    pub fn with_lines(
        lines: impl Into<Vec<LineItem<'a>>>,
        currency: &'static Currency,
    ) -> Result<Self, CartError> {
        let lines = lines.into();

        lines.iter().enumerate().try_for_each(|(i, line)| {
            let line_currency = line.unit_price().currency();

            if line_currency == currency {
                Ok(())
            } else {
                Err(CartError::CurrencyMismatch(
                    i,
                    line_currency.iso_alpha_code,
                    currency.iso_alpha_code,
                ))
            }
        })?;

        Ok(Cart { lines, currency })
    }

    /// Calculates the merchandise subtotal: the sum of line totals.
    ///
    /// An empty cart has a zero subtotal; refusing to check out an empty
    /// cart is the caller's concern, not the valuation's.
    ///
    /// # Errors
    ///
    /// Returns a [`CartError`] when a line total overflows or money
    /// arithmetic fails.
    pub fn subtotal(&'a self) -> Result<Money<'a, Currency>, CartError> {
        self.lines
            .iter()
            .try_fold(Money::from_minor(0, self.currency), |acc, line| {
                Ok(acc.add(line.total()?)?)
            })
    }

    /// Iterates over the lines in the cart.
    pub fn iter(&self) -> impl Iterator<Item = &LineItem<'a>> {
        self.lines.iter()
    }

    /// Returns the number of lines in the cart.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Returns whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Returns the currency of the cart.
    #[must_use]
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::{GBP, USD};
    use testresult::TestResult;

    use super::*;

    #[test]
    fn empty_cart_has_zero_subtotal() -> TestResult {
        let cart = Cart::new(USD);

        assert_eq!(cart.subtotal()?, Money::from_minor(0, USD));
        assert!(cart.is_empty());

        Ok(())
    }

    #[test]
    fn subtotal_sums_line_totals() -> TestResult {
        let cart = Cart::with_lines(
            [
                LineItem::new(Money::from_minor(5_00, USD), 2)?,
                LineItem::new(Money::from_minor(12_50, USD), 1)?,
            ],
            USD,
        )?;

        assert_eq!(cart.subtotal()?, Money::from_minor(22_50, USD));
        assert_eq!(cart.len(), 2);

        Ok(())
    }

    #[test]
    fn mismatched_currency_is_rejected() -> TestResult {
        let result = Cart::with_lines(
            [
                LineItem::new(Money::from_minor(5_00, USD), 1)?,
                LineItem::new(Money::from_minor(5_00, GBP), 1)?,
            ],
            USD,
        );

        assert!(
            matches!(result, Err(CartError::CurrencyMismatch(1, "GBP", "USD"))),
            "expected CurrencyMismatch, got {result:?}"
        );

        Ok(())
    }
}
