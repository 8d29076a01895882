// 🏪 Merchant Entity - customers the wholesaler ships to
//
// Merchants are looked up by name from the inventory and analysis screens,
// so lookups normalize case and whitespace ("  mall e " == "Mall E").

use crate::error::{CrmError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ============================================================================
// MERCHANT KIND
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MerchantKind {
    /// Supermarket chain store
    Supermarket,

    /// Small convenience store
    ConvenienceStore,

    /// Shopping mall
    Mall,

    /// Other / Unknown
    Other,
}

impl MerchantKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MerchantKind::Supermarket => "Supermarket",
            MerchantKind::ConvenienceStore => "Convenience Store",
            MerchantKind::Mall => "Mall",
            MerchantKind::Other => "Other",
        }
    }

    /// Guess the kind from the merchant's name
    pub fn infer(name: &str) -> Self {
        let name = normalize_name(name);
        if name.contains("supermarket") {
            MerchantKind::Supermarket
        } else if name.contains("convenience") {
            MerchantKind::ConvenienceStore
        } else if name.contains("mall") {
            MerchantKind::Mall
        } else {
            MerchantKind::Other
        }
    }
}

// ============================================================================
// MERCHANT ENTITY
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Merchant {
    pub id: u32,
    pub name: String,
    pub kind: MerchantKind,
    pub contact: String,
    pub phone: String,
    pub address: String,
    pub created_at: DateTime<Utc>,
}

/// Validated input for creating or editing a merchant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewMerchant {
    pub name: String,
    pub contact: String,
    pub phone: String,
    pub address: String,
}

impl Merchant {
    /// Case- and whitespace-insensitive name comparison
    pub fn is_named(&self, name: &str) -> bool {
        normalize_name(&self.name) == normalize_name(name)
    }

    /// Substring search across every visible column
    pub fn matches(&self, query: &str) -> bool {
        let query = normalize_name(query);
        if query.is_empty() {
            return true;
        }
        [
            self.id.to_string(),
            self.name.clone(),
            self.contact.clone(),
            self.phone.clone(),
        ]
        .iter()
        .any(|column| normalize_name(column).contains(&query))
    }
}

// ============================================================================
// MERCHANT REGISTRY
// ============================================================================

/// In-memory merchant table. Ids are sequential and never reused.
#[derive(Debug, Clone)]
pub struct MerchantRegistry {
    merchants: Vec<Merchant>,
    next_id: u32,
}

impl MerchantRegistry {
    /// Create new empty registry
    pub fn new() -> Self {
        MerchantRegistry {
            merchants: Vec::new(),
            next_id: 1,
        }
    }

    /// Create registry with the sample merchants pre-loaded
    pub fn with_defaults() -> Self {
        let mut registry = MerchantRegistry::new();
        registry.register_default_merchants();
        registry
    }

    fn register_default_merchants(&mut self) {
        let samples = [
            ("Supermarket A", "Zhang San", "13800138001"),
            ("Supermarket B", "Li Si", "13800138002"),
            ("Supermarket C", "Wang Wu", "13800138003"),
            ("Convenience Store D", "Zhao Liu", "13800138004"),
            ("Mall E", "Qian Qi", "13800138005"),
        ];

        for (name, contact, phone) in samples {
            self.add(NewMerchant {
                name: name.to_string(),
                contact: contact.to_string(),
                phone: phone.to_string(),
                address: String::new(),
            });
        }
    }

    pub fn add(&mut self, input: NewMerchant) -> &Merchant {
        let merchant = Merchant {
            id: self.next_id,
            kind: MerchantKind::infer(&input.name),
            name: input.name,
            contact: input.contact,
            phone: input.phone,
            address: input.address,
            created_at: Utc::now(),
        };
        self.next_id += 1;

        log::info!("merchant added: #{} {}", merchant.id, merchant.name);
        self.merchants.push(merchant);
        &self.merchants[self.merchants.len() - 1]
    }

    pub fn update(&mut self, id: u32, input: NewMerchant) -> Result<&Merchant> {
        let merchant = self
            .merchants
            .iter_mut()
            .find(|m| m.id == id)
            .ok_or_else(|| not_found(id))?;

        merchant.kind = MerchantKind::infer(&input.name);
        merchant.name = input.name;
        merchant.contact = input.contact;
        merchant.phone = input.phone;
        merchant.address = input.address;

        log::info!("merchant updated: #{}", id);
        Ok(&*merchant)
    }

    pub fn remove(&mut self, id: u32) -> Result<Merchant> {
        let index = self
            .merchants
            .iter()
            .position(|m| m.id == id)
            .ok_or_else(|| not_found(id))?;

        let removed = self.merchants.remove(index);
        log::info!("merchant removed: #{} {}", removed.id, removed.name);
        Ok(removed)
    }

    pub fn find_by_id(&self, id: u32) -> Option<&Merchant> {
        self.merchants.iter().find(|m| m.id == id)
    }

    pub fn find_by_name(&self, name: &str) -> Option<&Merchant> {
        self.merchants.iter().find(|m| m.is_named(name))
    }

    pub fn search(&self, query: &str) -> Vec<&Merchant> {
        self.merchants.iter().filter(|m| m.matches(query)).collect()
    }

    pub fn all(&self) -> &[Merchant] {
        &self.merchants
    }

    pub fn names(&self) -> Vec<String> {
        self.merchants.iter().map(|m| m.name.clone()).collect()
    }

    pub fn count(&self) -> usize {
        self.merchants.len()
    }
}

impl Default for MerchantRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

fn not_found(id: u32) -> CrmError {
    CrmError::NotFound {
        kind: "merchant",
        key: id.to_string(),
    }
}

/// Lowercase and collapse runs of whitespace
pub(crate) fn normalize_name(s: &str) -> String {
    s.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn new_merchant(name: &str) -> NewMerchant {
        NewMerchant {
            name: name.to_string(),
            contact: "Test Contact".to_string(),
            phone: "555-0100".to_string(),
            address: "1 Market St".to_string(),
        }
    }

    #[test]
    fn test_registry_defaults() {
        let registry = MerchantRegistry::with_defaults();
        assert_eq!(registry.count(), 5);
        assert_eq!(registry.find_by_id(1).unwrap().name, "Supermarket A");
        assert_eq!(registry.find_by_id(5).unwrap().contact, "Qian Qi");
        let kinds: Vec<MerchantKind> = registry.all().iter().map(|m| m.kind).collect();
        assert_eq!(kinds.iter().filter(|k| **k == MerchantKind::Supermarket).count(), 3);
        assert_eq!(kinds.iter().filter(|k| **k == MerchantKind::Mall).count(), 1);
    }

    #[test]
    fn test_find_by_name_normalizes() {
        let registry = MerchantRegistry::with_defaults();
        assert_eq!(registry.find_by_name("  mall   e ").unwrap().id, 5);
        assert!(registry.find_by_name("Mall F").is_none());
    }

    #[test]
    fn test_kind_inference() {
        assert_eq!(MerchantKind::infer("Convenience Store D"), MerchantKind::ConvenienceStore);
        assert_eq!(MerchantKind::infer("Corner Shop"), MerchantKind::Other);
    }

    #[test]
    fn test_add_update_remove() {
        let mut registry = MerchantRegistry::with_defaults();

        let id = registry.add(new_merchant("Fresh Mall")).id;
        assert_eq!(id, 6);
        assert_eq!(registry.find_by_id(id).unwrap().kind, MerchantKind::Mall);

        registry.update(id, new_merchant("Fresh Supermarket")).unwrap();
        assert_eq!(registry.find_by_id(id).unwrap().kind, MerchantKind::Supermarket);

        let removed = registry.remove(id).unwrap();
        assert_eq!(removed.name, "Fresh Supermarket");
        assert!(registry.find_by_id(id).is_none());

        // ids are not reused
        assert_eq!(registry.add(new_merchant("Another")).id, 7);
    }

    #[test]
    fn test_missing_id_errors() {
        let mut registry = MerchantRegistry::new();
        assert!(matches!(
            registry.remove(42),
            Err(CrmError::NotFound { kind: "merchant", .. })
        ));
        assert!(registry.update(42, new_merchant("x")).is_err());
    }

    #[test]
    fn test_search_columns() {
        let registry = MerchantRegistry::with_defaults();
        assert_eq!(registry.search("zhao").len(), 1);
        assert_eq!(registry.search("13800138").len(), 5);
        assert_eq!(registry.search("").len(), 5);
        assert!(registry.search("nothing here").is_empty());
    }
}
