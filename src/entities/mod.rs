// Entity Models
//
// Products, merchants and the inventory ledger. All in memory, seeded with
// sample rows; nothing is persisted.

pub mod inventory;
pub mod merchant;
pub mod product;

pub use inventory::{Direction, InventoryLedger, InventoryRecord};
pub use merchant::{Merchant, MerchantKind, MerchantRegistry, NewMerchant};
pub use product::{NewProduct, Product, ProductRegistry, MAX_QUANTITY};
