// Chart data providers - where a merchant's monthly series comes from

use super::series::MonthlySeries;
use crate::entities::{Direction, InventoryLedger};
use crate::error::Result;
use chrono::Datelike;
use rand::Rng;

pub trait ChartDataProvider {
    fn monthly_series(&self, merchant: &str, year: i32) -> Result<MonthlySeries>;
}

const DEFAULT_BASE: [u32; 12] = [100, 80, 150, 130, 110, 90, 110, 130, 105, 115, 125, 85];

/// Base purchase pattern per mock merchant
fn base_values(merchant: &str) -> [u32; 12] {
    match merchant {
        "Supermarket A" => [120, 95, 180, 160, 140, 110, 130, 150, 125, 135, 145, 100],
        "Supermarket B" => [80, 70, 140, 120, 100, 90, 110, 130, 105, 115, 125, 85],
        "Supermarket C" => [100, 85, 160, 140, 120, 100, 120, 140, 115, 125, 135, 95],
        "Convenience Store D" => [60, 50, 100, 80, 70, 60, 80, 90, 75, 85, 95, 65],
        "Mall E" => [150, 120, 200, 180, 160, 130, 150, 170, 145, 155, 165, 125],
        _ => DEFAULT_BASE,
    }
}

/// Static table plus a random ±jitter per month. Results are not
/// reproducible across calls unless jitter is 0.
#[derive(Debug, Clone)]
pub struct MockTrendProvider {
    jitter: u32,
}

impl MockTrendProvider {
    pub fn new(jitter: u32) -> Self {
        MockTrendProvider { jitter }
    }

    /// Unperturbed base series for a merchant
    pub fn base_series(merchant: &str) -> MonthlySeries {
        MonthlySeries::calendar(base_values(merchant))
    }
}

impl Default for MockTrendProvider {
    fn default() -> Self {
        MockTrendProvider::new(20)
    }
}

impl ChartDataProvider for MockTrendProvider {
    fn monthly_series(&self, merchant: &str, year: i32) -> Result<MonthlySeries> {
        let base = base_values(merchant);
        let jitter = i64::from(self.jitter);
        let mut rng = rand::thread_rng();

        let mut values = [0u32; 12];
        for (slot, base_value) in values.iter_mut().zip(base) {
            let variation = if jitter > 0 { rng.gen_range(-jitter..=jitter) } else { 0 };
            *slot = (i64::from(base_value) + variation).max(0) as u32;
        }

        log::debug!("mock series for {} / {}: {:?}", merchant, year, values);
        Ok(MonthlySeries::calendar(values))
    }
}

/// Sums outbound quantities per calendar month of the requested year
pub struct LedgerTrendProvider<'a> {
    ledger: &'a InventoryLedger,
}

impl<'a> LedgerTrendProvider<'a> {
    pub fn new(ledger: &'a InventoryLedger) -> Self {
        LedgerTrendProvider { ledger }
    }
}

impl ChartDataProvider for LedgerTrendProvider<'_> {
    fn monthly_series(&self, merchant: &str, year: i32) -> Result<MonthlySeries> {
        let mut values = [0u32; 12];

        for record in self.ledger.records() {
            if record.direction != Direction::Outbound
                || record.date.year() != year
                || record.merchant.as_deref() != Some(merchant)
            {
                continue;
            }
            let month = record.date.month0() as usize;
            values[month] = values[month].saturating_add(record.quantity);
        }

        Ok(MonthlySeries::calendar(values))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_provider_stays_within_jitter() {
        let provider = MockTrendProvider::new(20);
        let base = MockTrendProvider::base_series("Supermarket A");

        for _ in 0..20 {
            let series = provider.monthly_series("Supermarket A", 2024).unwrap();
            assert_eq!(series.len(), 12);
            for (got, want) in series.values().zip(base.values()) {
                assert!((i64::from(got) - i64::from(want)).abs() <= 20);
            }
        }
    }

    #[test]
    fn test_zero_jitter_is_deterministic() {
        let provider = MockTrendProvider::new(0);
        let a = provider.monthly_series("Mall E", 2023).unwrap();
        let b = provider.monthly_series("Mall E", 2023).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.get("Mar"), Some(200));
    }

    #[test]
    fn test_unknown_merchant_uses_default_table() {
        let series = MockTrendProvider::new(0).monthly_series("Nobody", 2024).unwrap();
        assert_eq!(series, MonthlySeries::calendar(DEFAULT_BASE));
    }

    #[test]
    fn test_ledger_provider_sums_outbound_by_month() {
        let ledger = InventoryLedger::with_defaults();
        let provider = LedgerTrendProvider::new(&ledger);

        let series = provider.monthly_series("Supermarket A", 2024).unwrap();
        assert_eq!(series.get("Jan"), Some(10));
        assert_eq!(series.get("Feb"), Some(0));

        let other_year = provider.monthly_series("Supermarket A", 2023).unwrap();
        assert_eq!(other_year.total(), 0);
    }
}
