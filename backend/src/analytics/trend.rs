//! Month-over-month change strings and growth rates.

use rust_decimal::{Decimal, RoundingStrategy};

pub const MONTHS_PER_YEAR: usize = 12;

/// Formats the change from `previous` to `current` as a signed percentage.
///
/// A zero predecessor reports `"+100%"` for growth and `"0%"` otherwise;
/// every other case is rounded to one decimal place with trailing zeros
/// dropped, e.g. `"+50%"`, `"-12.5%"`. A change too large for a `Decimal`
/// reports `"+100%"` or `"-100%"` by direction.
pub fn percent_change(previous: Decimal, current: Decimal) -> String {
    if previous.is_zero() {
        return if current > Decimal::ZERO {
            "+100%".to_string()
        } else {
            "0%".to_string()
        };
    }

    match relative_change(previous, current) {
        Some(change) if change > Decimal::ZERO => format!("+{}%", change),
        Some(change) => format!("{}%", change),
        None if growing(previous, current) => "+100%".to_string(),
        None => "-100%".to_string(),
    }
}

/// Numeric counterpart of [`percent_change`]; zero when the predecessor is
/// zero, saturating at the `Decimal` bounds.
pub fn growth_rate(previous: Decimal, current: Decimal) -> Decimal {
    if previous.is_zero() {
        return Decimal::ZERO;
    }
    relative_change(previous, current).unwrap_or(if growing(previous, current) {
        Decimal::MAX
    } else {
        Decimal::MIN
    })
}

/// `(current - previous) / previous * 100`, `None` on overflow.
fn relative_change(previous: Decimal, current: Decimal) -> Option<Decimal> {
    current
        .checked_sub(previous)?
        .checked_div(previous)?
        .checked_mul(Decimal::ONE_HUNDRED)
        .map(round_one)
}

fn growing(previous: Decimal, current: Decimal) -> bool {
    (current > previous) == (previous > Decimal::ZERO)
}

/// Twelve change strings for January through December.
///
/// Missing trailing months count as zero and January is compared against
/// an implicit zero.
pub fn monthly_trend<T>(values: &[T]) -> Vec<String>
where
    T: Copy + Into<Decimal>,
{
    let mut previous = Decimal::ZERO;
    (0..MONTHS_PER_YEAR)
        .map(|index| {
            let current = values.get(index).map(|v| (*v).into()).unwrap_or(Decimal::ZERO);
            let change = percent_change(previous, current);
            previous = current;
            change
        })
        .collect()
}

fn round_one(value: Decimal) -> Decimal {
    value
        .round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero)
        .normalize()
}
