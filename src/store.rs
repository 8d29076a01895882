// CrmStore - the in-memory data set shared by every screen
//
// Owns the three registries and applies inventory operations across them.

use crate::entities::{
    Direction, InventoryLedger, InventoryRecord, MerchantRegistry, ProductRegistry, MAX_QUANTITY,
};
use crate::error::InventoryError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A validated inventory form submission
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockOperation {
    pub direction: Direction,
    pub product: String,
    pub quantity: u32,
    pub merchant: Option<String>,
    pub date: NaiveDate,
    pub notes: String,
}

#[derive(Debug, Clone, Default)]
pub struct CrmStore {
    pub products: ProductRegistry,
    pub merchants: MerchantRegistry,
    pub ledger: InventoryLedger,
}

impl CrmStore {
    pub fn new(
        products: ProductRegistry,
        merchants: MerchantRegistry,
        ledger: InventoryLedger,
    ) -> Self {
        CrmStore {
            products,
            merchants,
            ledger,
        }
    }

    /// Sample products, merchants and ledger rows
    pub fn with_mock_data() -> Self {
        CrmStore::new(
            ProductRegistry::with_defaults(),
            MerchantRegistry::with_defaults(),
            InventoryLedger::with_defaults(),
        )
    }

    /// Apply a stock movement and record it.
    ///
    /// Outbound requires a known merchant and enough stock; the merchant is
    /// dropped from inbound records.
    pub fn submit_operation(
        &mut self,
        operation: StockOperation,
    ) -> Result<InventoryRecord, InventoryError> {
        if operation.quantity == 0 || operation.quantity > MAX_QUANTITY {
            return Err(InventoryError::InvalidQuantity {
                max: MAX_QUANTITY,
                got: operation.quantity,
            });
        }

        let merchant = match operation.direction {
            Direction::Inbound => None,
            Direction::Outbound => {
                let name = operation
                    .merchant
                    .as_deref()
                    .filter(|m| !m.trim().is_empty())
                    .ok_or(InventoryError::MerchantRequired)?;
                let merchant = self
                    .merchants
                    .find_by_name(name)
                    .ok_or_else(|| InventoryError::UnknownMerchant(name.to_string()))?;
                Some(merchant.name.clone())
            }
        };

        let product = self
            .products
            .find_by_name_mut(&operation.product)
            .ok_or_else(|| InventoryError::UnknownProduct(operation.product.clone()))?;

        match operation.direction {
            Direction::Inbound => {
                product.stock = product.stock.saturating_add(operation.quantity);
            }
            Direction::Outbound => {
                if operation.quantity > product.stock {
                    return Err(InventoryError::InsufficientStock {
                        product: product.name.clone(),
                        current: product.stock,
                        requested: operation.quantity,
                    });
                }
                product.stock -= operation.quantity;
            }
        }

        let record = InventoryRecord::new(
            operation.date,
            product.id,
            product.name.clone(),
            operation.direction,
            operation.quantity,
            merchant,
            operation.notes,
        );
        log::info!(
            "{} of {} x{} accepted, stock now {}",
            record.direction.as_str(),
            record.product,
            record.quantity,
            product.stock
        );

        self.ledger.push(record.clone());
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn operation(direction: Direction, product: &str, quantity: u32, merchant: Option<&str>) -> StockOperation {
        StockOperation {
            direction,
            product: product.to_string(),
            quantity,
            merchant: merchant.map(str::to_string),
            date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            notes: String::new(),
        }
    }

    #[test]
    fn test_inbound_increases_stock() {
        let mut store = CrmStore::with_mock_data();
        let record = store
            .submit_operation(operation(Direction::Inbound, "banana", 25, Some("Mall E")))
            .unwrap();

        assert_eq!(record.product, "Banana");
        assert_eq!(record.product_id, 2);
        assert_eq!(record.merchant, None);
        assert_eq!(store.products.find_by_name("Banana").unwrap().stock, 75);
        assert_eq!(store.ledger.len(), 6);
    }

    #[test]
    fn test_outbound_decreases_stock() {
        let mut store = CrmStore::with_mock_data();
        let record = store
            .submit_operation(operation(Direction::Outbound, "Apple", 40, Some("supermarket a")))
            .unwrap();

        assert_eq!(record.merchant.as_deref(), Some("Supermarket A"));
        assert_eq!(store.products.find_by_name("Apple").unwrap().stock, 60);
    }

    #[test]
    fn test_outbound_requires_merchant() {
        let mut store = CrmStore::with_mock_data();
        let err = store
            .submit_operation(operation(Direction::Outbound, "Apple", 1, None))
            .unwrap_err();
        assert_eq!(err, InventoryError::MerchantRequired);

        let err = store
            .submit_operation(operation(Direction::Outbound, "Apple", 1, Some("  ")))
            .unwrap_err();
        assert_eq!(err, InventoryError::MerchantRequired);

        let err = store
            .submit_operation(operation(Direction::Outbound, "Apple", 1, Some("Mall Z")))
            .unwrap_err();
        assert_eq!(err, InventoryError::UnknownMerchant("Mall Z".to_string()));
    }

    #[test]
    fn test_outbound_cannot_exceed_stock() {
        let mut store = CrmStore::with_mock_data();
        let err = store
            .submit_operation(operation(Direction::Outbound, "Strawberry", 21, Some("Mall E")))
            .unwrap_err();
        assert_eq!(
            err,
            InventoryError::InsufficientStock {
                product: "Strawberry".to_string(),
                current: 20,
                requested: 21,
            }
        );
        assert_eq!(store.products.find_by_name("Strawberry").unwrap().stock, 20);
        assert_eq!(store.ledger.len(), 5);
    }

    #[test]
    fn test_quantity_and_product_validation() {
        let mut store = CrmStore::with_mock_data();
        assert!(matches!(
            store.submit_operation(operation(Direction::Inbound, "Apple", 0, None)),
            Err(InventoryError::InvalidQuantity { .. })
        ));
        assert!(matches!(
            store.submit_operation(operation(Direction::Inbound, "Apple", 10_000, None)),
            Err(InventoryError::InvalidQuantity { .. })
        ));
        assert_eq!(
            store.submit_operation(operation(Direction::Inbound, "Kiwi", 1, None)),
            Err(InventoryError::UnknownProduct("Kiwi".to_string()))
        );
    }
}
