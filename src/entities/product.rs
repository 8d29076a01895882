// 📦 Product Entity - goods held in stock
//
// Stock only changes through inventory operations (see store.rs) or an
// explicit edit from the product dialog.

use super::merchant::normalize_name;
use crate::error::{CrmError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Largest quantity the dialogs and inventory forms accept
pub const MAX_QUANTITY: u32 = 9999;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: u32,
    pub name: String,
    pub sku: String,
    pub description: String,
    pub stock: u32,
    pub unit: String,
    pub created_at: DateTime<Utc>,
}

/// Validated input for creating or editing a product
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewProduct {
    pub name: String,
    pub sku: String,
    pub description: String,
    pub stock: u32,
    pub unit: String,
}

impl Product {
    pub fn is_named(&self, name: &str) -> bool {
        normalize_name(&self.name) == normalize_name(name)
    }

    /// Case-insensitive substring match on any table column
    pub fn matches(&self, query: &str) -> bool {
        let query = normalize_name(query);
        if query.is_empty() {
            return true;
        }
        [
            self.id.to_string(),
            self.name.clone(),
            self.sku.clone(),
            self.stock.to_string(),
            self.unit.clone(),
        ]
        .iter()
        .any(|column| normalize_name(column).contains(&query))
    }
}

#[derive(Debug, Clone)]
pub struct ProductRegistry {
    products: Vec<Product>,
    next_id: u32,
}

impl ProductRegistry {
    pub fn new() -> Self {
        ProductRegistry {
            products: Vec::new(),
            next_id: 1,
        }
    }

    pub fn with_defaults() -> Self {
        let mut registry = ProductRegistry::new();
        let samples = [
            ("Apple", "APP001", 100, "box"),
            ("Banana", "BAN001", 50, "box"),
            ("Orange", "ORA001", 80, "box"),
            ("Grape", "GRA001", 30, "box"),
            ("Strawberry", "STR001", 20, "pack"),
        ];
        for (name, sku, stock, unit) in samples {
            registry.add(NewProduct {
                name: name.to_string(),
                sku: sku.to_string(),
                description: String::new(),
                stock,
                unit: unit.to_string(),
            });
        }
        registry
    }

    pub fn add(&mut self, input: NewProduct) -> &Product {
        let product = Product {
            id: self.next_id,
            name: input.name,
            sku: input.sku,
            description: input.description,
            stock: input.stock,
            unit: input.unit,
            created_at: Utc::now(),
        };
        self.next_id += 1;

        log::info!("product added: #{} {} ({})", product.id, product.name, product.sku);
        self.products.push(product);
        &self.products[self.products.len() - 1]
    }

    pub fn update(&mut self, id: u32, input: NewProduct) -> Result<&Product> {
        let product = self
            .products
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| not_found(id.to_string()))?;

        product.name = input.name;
        product.sku = input.sku;
        product.description = input.description;
        product.stock = input.stock;
        product.unit = input.unit;

        log::info!("product updated: #{}", id);
        Ok(&*product)
    }

    pub fn remove(&mut self, id: u32) -> Result<Product> {
        let index = self
            .products
            .iter()
            .position(|p| p.id == id)
            .ok_or_else(|| not_found(id.to_string()))?;

        let removed = self.products.remove(index);
        log::info!("product removed: #{} {}", removed.id, removed.name);
        Ok(removed)
    }

    pub fn find_by_id(&self, id: u32) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    pub fn find_by_name(&self, name: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.is_named(name))
    }

    pub(crate) fn find_by_name_mut(&mut self, name: &str) -> Option<&mut Product> {
        self.products.iter_mut().find(|p| p.is_named(name))
    }

    pub fn search(&self, query: &str) -> Vec<&Product> {
        self.products.iter().filter(|p| p.matches(query)).collect()
    }

    pub fn all(&self) -> &[Product] {
        &self.products
    }

    pub fn names(&self) -> Vec<String> {
        self.products.iter().map(|p| p.name.clone()).collect()
    }

    pub fn count(&self) -> usize {
        self.products.len()
    }

    pub fn total_stock(&self) -> u64 {
        self.products.iter().map(|p| u64::from(p.stock)).sum()
    }
}

impl Default for ProductRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

fn not_found(key: String) -> CrmError {
    CrmError::NotFound {
        kind: "product",
        key,
    }
}
