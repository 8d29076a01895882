// 📊 Inventory Ledger - append-only stock movements
//
// Records key products by id and keep the name as it was when the movement
// was recorded. Merchants are referenced by name. Cross-entity validation
// lives in store.rs.

use crate::error::InventoryError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Inbound,
    Outbound,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Inbound => "Inbound",
            Direction::Outbound => "Outbound",
        }
    }

    pub fn toggle(&self) -> Direction {
        match self {
            Direction::Inbound => Direction::Outbound,
            Direction::Outbound => Direction::Inbound,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryRecord {
    /// Stable identity (UUID v4)
    pub id: String,
    pub date: NaiveDate,
    pub product_id: u32,
    /// Product name at the time of the movement
    pub product: String,
    pub direction: Direction,
    pub quantity: u32,
    /// Set for outbound records only
    pub merchant: Option<String>,
    pub notes: String,
}

impl InventoryRecord {
    pub fn new(
        date: NaiveDate,
        product_id: u32,
        product: String,
        direction: Direction,
        quantity: u32,
        merchant: Option<String>,
        notes: String,
    ) -> Self {
        InventoryRecord {
            id: uuid::Uuid::new_v4().to_string(),
            date,
            product_id,
            product,
            direction,
            quantity,
            merchant,
            notes,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct InventoryLedger {
    records: Vec<InventoryRecord>,
}

impl InventoryLedger {
    pub fn new() -> Self {
        InventoryLedger {
            records: Vec::new(),
        }
    }

    /// Ledger pre-loaded with the January 2024 sample movements
    pub fn with_defaults() -> Self {
        let mut ledger = InventoryLedger::new();
        let samples = [
            ((2024, 1, 15), 1, "Apple", Direction::Outbound, 10, Some("Supermarket A"), "Regular sale"),
            ((2024, 1, 14), 2, "Banana", Direction::Inbound, 20, None, "New arrival"),
            ((2024, 1, 13), 3, "Orange", Direction::Outbound, 5, Some("Supermarket B"), "Promotion"),
            ((2024, 1, 12), 4, "Grape", Direction::Inbound, 15, None, "Restock"),
            ((2024, 1, 11), 5, "Strawberry", Direction::Outbound, 3, Some("Convenience Store D"), "Daily sale"),
        ];

        for ((y, m, d), product_id, product, direction, quantity, merchant, notes) in samples {
            if let Some(date) = NaiveDate::from_ymd_opt(y, m, d) {
                ledger.push(InventoryRecord::new(
                    date,
                    product_id,
                    product.to_string(),
                    direction,
                    quantity,
                    merchant.map(str::to_string),
                    notes.to_string(),
                ));
            }
        }
        ledger
    }

    pub fn push(&mut self, record: InventoryRecord) {
        log::debug!(
            "ledger: {} {} x{} on {}",
            record.direction.as_str(),
            record.product,
            record.quantity,
            record.date
        );
        self.records.push(record);
    }

    pub fn records(&self) -> &[InventoryRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records dated within `[start, end]`, newest first
    pub fn query(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<&InventoryRecord>, InventoryError> {
        if start > end {
            return Err(InventoryError::InvalidRange {
                start: start.to_string(),
                end: end.to_string(),
            });
        }

        let mut found: Vec<&InventoryRecord> = self
            .records
            .iter()
            .filter(|r| r.date >= start && r.date <= end)
            .collect();
        found.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(found)
    }

    /// Every record newest first
    pub fn newest_first(&self) -> Vec<&InventoryRecord> {
        let mut all: Vec<&InventoryRecord> = self.records.iter().collect();
        all.sort_by(|a, b| b.date.cmp(&a.date));
        all
    }

    /// Outbound quantities for one product dated on or after `since`
    pub fn outbound_since(&self, product_id: u32, since: NaiveDate) -> Vec<u32> {
        self.records
            .iter()
            .filter(|r| r.direction == Direction::Outbound && r.product_id == product_id && r.date >= since)
            .map(|r| r.quantity)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_sample_records() {
        let ledger = InventoryLedger::with_defaults();
        assert_eq!(ledger.len(), 5);
        let outbound = ledger
            .records()
            .iter()
            .filter(|r| r.direction == Direction::Outbound)
            .count();
        assert_eq!(outbound, 3);
        assert!(ledger
            .records()
            .iter()
            .filter(|r| r.direction == Direction::Inbound)
            .all(|r| r.merchant.is_none()));
    }

    #[test]
    fn test_query_inclusive_newest_first() {
        let ledger = InventoryLedger::with_defaults();
        let found = ledger.query(date(2024, 1, 12), date(2024, 1, 14)).unwrap();
        let products: Vec<&str> = found.iter().map(|r| r.product.as_str()).collect();
        assert_eq!(products, vec!["Banana", "Orange", "Grape"]);

        assert!(ledger.query(date(2023, 1, 1), date(2023, 12, 31)).unwrap().is_empty());
    }

    #[test]
    fn test_query_rejects_reversed_range() {
        let ledger = InventoryLedger::with_defaults();
        let err = ledger.query(date(2024, 2, 1), date(2024, 1, 1)).unwrap_err();
        assert!(matches!(err, InventoryError::InvalidRange { .. }));
    }

    #[test]
    fn test_ids_unique() {
        let ledger = InventoryLedger::with_defaults();
        let mut ids: Vec<&str> = ledger.records().iter().map(|r| r.id.as_str()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 5);
    }

    #[test]
    fn test_outbound_since() {
        let ledger = InventoryLedger::with_defaults();
        assert_eq!(ledger.outbound_since(1, date(2024, 1, 1)), vec![10]);
        assert!(ledger.outbound_since(1, date(2024, 2, 1)).is_empty());
        assert!(ledger.outbound_since(2, date(2024, 1, 1)).is_empty());
    }
}
