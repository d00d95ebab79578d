//! Line Items

use rusty_money::{Money, iso};
use thiserror::Error;

/// Errors raised while constructing or totalling line items.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LineItemError {
    /// Quantity below the minimum of one.
    #[error("quantity must be at least 1")]
    ZeroQuantity,

    /// Recurrence with a zero-week delivery frequency.
    #[error("delivery frequency must be at least one week")]
    ZeroFrequency,

    /// The line total does not fit in minor units.
    #[error("line total overflows the representable amount")]
    Overflow,
}

/// Recurring-delivery settings for a line item.
///
/// A recurring line produces a subscription at checkout; the frequency is
/// whole weeks between deliveries.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Recurrence {
    frequency_weeks: u32,
}

impl Recurrence {
    /// Creates a recurrence delivering every `frequency_weeks` weeks.
    ///
    /// # Errors
    ///
    /// Returns [`LineItemError::ZeroFrequency`] when the frequency is zero.
    pub fn every_weeks(frequency_weeks: u32) -> Result<Self, LineItemError> {
        if frequency_weeks == 0 {
            return Err(LineItemError::ZeroFrequency);
        }

        Ok(Self { frequency_weeks })
    }

    /// Weeks between deliveries.
    #[must_use]
    pub fn frequency_weeks(&self) -> u32 {
        self.frequency_weeks
    }
}

/// A priced cart line: unit price, quantity and optional recurrence.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct LineItem<'a> {
    unit_price: Money<'a, iso::Currency>,
    quantity: u32,
    recurrence: Option<Recurrence>,
}

impl<'a> LineItem<'a> {
    /// Creates a one-off line item.
    ///
    /// # Errors
    ///
    /// Returns [`LineItemError::ZeroQuantity`] when the quantity is zero.
    pub fn new(unit_price: Money<'a, iso::Currency>, quantity: u32) -> Result<Self, LineItemError> {
        if quantity == 0 {
            return Err(LineItemError::ZeroQuantity);
        }

        Ok(Self {
            unit_price,
            quantity,
            recurrence: None,
        })
    }

    /// Creates a line item that recurs on the given schedule.
    ///
    /// # Errors
    ///
    /// Returns [`LineItemError::ZeroQuantity`] when the quantity is zero.
    pub fn recurring(
        unit_price: Money<'a, iso::Currency>,
        quantity: u32,
        recurrence: Recurrence,
    ) -> Result<Self, LineItemError> {
        let mut item = Self::new(unit_price, quantity)?;
        item.recurrence = Some(recurrence);

        Ok(item)
    }

    /// Returns the unit price of the line.
    pub fn unit_price(&self) -> &Money<'a, iso::Currency> {
        &self.unit_price
    }

    /// Returns the quantity of the line.
    #[must_use]
    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Returns the recurrence schedule, if the line is a subscription.
    #[must_use]
    pub fn recurrence(&self) -> Option<Recurrence> {
        self.recurrence
    }

    /// Calculates `unit_price × quantity` in minor units.
    ///
    /// # Errors
    ///
    /// Returns [`LineItemError::Overflow`] when the multiplication does not
    /// fit in minor units.
    pub fn total(&self) -> Result<Money<'a, iso::Currency>, LineItemError> {
        let minor = self
            .unit_price
            .to_minor_units()
            .checked_mul(i64::from(self.quantity))
            .ok_or(LineItemError::Overflow)?;

        Ok(Money::from_minor(minor, self.unit_price.currency()))
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::USD;
    use testresult::TestResult;

    use super::*;

    #[test]
    fn line_total_multiplies_unit_price_by_quantity() -> TestResult {
        let item = LineItem::new(Money::from_minor(2_50, USD), 3)?;

        assert_eq!(item.total()?, Money::from_minor(7_50, USD));

        Ok(())
    }

    #[test]
    fn zero_quantity_is_rejected() {
        let result = LineItem::new(Money::from_minor(100, USD), 0);

        assert!(
            matches!(result, Err(LineItemError::ZeroQuantity)),
            "expected ZeroQuantity, got {result:?}"
        );
    }

    #[test]
    fn zero_frequency_is_rejected() {
        let result = Recurrence::every_weeks(0);

        assert!(
            matches!(result, Err(LineItemError::ZeroFrequency)),
            "expected ZeroFrequency, got {result:?}"
        );
    }

    #[test]
    fn overflowing_line_total_returns_error() -> TestResult {
        let item = LineItem::new(Money::from_minor(i64::MAX, USD), 2)?;
        let result = item.total();

        assert!(
            matches!(result, Err(LineItemError::Overflow)),
            "expected Overflow, got {result:?}"
        );

        Ok(())
    }

    #[test]
    fn recurring_line_carries_its_schedule() -> TestResult {
        let recurrence = Recurrence::every_weeks(4)?;
        let item = LineItem::recurring(Money::from_minor(12_00, USD), 1, recurrence)?;

        assert_eq!(item.recurrence(), Some(recurrence));

        Ok(())
    }
}
