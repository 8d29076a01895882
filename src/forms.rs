// Dialog forms - editable view state for the add/edit dialogs
//
// A form is a list of fields with one focused field. Text-like fields take
// typed characters, choice fields cycle through their options. Validation
// turns a form into the entity input it describes.

use crate::entities::{Direction, Merchant, NewMerchant, NewProduct, Product, MAX_QUANTITY};
use crate::error::FormError;
use crate::store::StockOperation;
use chrono::NaiveDate;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum FieldKind {
    Text,
    Number,
    Date,
    Choice(Vec<String>),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormField {
    pub key: &'static str,
    pub label: &'static str,
    pub required: bool,
    pub kind: FieldKind,
    pub value: String,
    pub placeholder: &'static str,
}

impl FormField {
    fn text(key: &'static str, label: &'static str, placeholder: &'static str) -> Self {
        FormField {
            key,
            label,
            required: false,
            kind: FieldKind::Text,
            value: String::new(),
            placeholder,
        }
    }

    fn required(mut self) -> Self {
        self.required = true;
        self
    }

    fn kind(mut self, kind: FieldKind) -> Self {
        self.kind = kind;
        self
    }

    fn value(mut self, value: impl Into<String>) -> Self {
        self.value = value.into();
        self
    }

    fn accepts(&self, c: char) -> bool {
        match self.kind {
            FieldKind::Text => !c.is_control(),
            FieldKind::Number => c.is_ascii_digit(),
            FieldKind::Date => c.is_ascii_digit() || c == '-',
            FieldKind::Choice(_) => false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FormKind {
    Product,
    Merchant,
    Inventory,
}

/// Create a new row or edit an existing one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FormMode {
    Create,
    Edit(u32),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Form {
    pub kind: FormKind,
    pub mode: FormMode,
    pub title: String,
    pub fields: Vec<FormField>,
    pub focus: usize,
}

impl Form {
    pub fn new_product() -> Self {
        Form {
            kind: FormKind::Product,
            mode: FormMode::Create,
            title: "Add Product".to_string(),
            fields: vec![
                FormField::text("name", "Name", "Product name").required(),
                FormField::text("sku", "SKU", "SKU code"),
                FormField::text("description", "Description", "Product description"),
                FormField::text("stock", "Stock", "0").kind(FieldKind::Number).value("0"),
                FormField::text("unit", "Unit", "e.g. box, pack, piece"),
            ],
            focus: 0,
        }
    }

    pub fn edit_product(product: &Product) -> Self {
        let mut form = Form::new_product();
        form.mode = FormMode::Edit(product.id);
        form.title = format!("Edit Product #{}", product.id);
        form.set("name", &product.name);
        form.set("sku", &product.sku);
        form.set("description", &product.description);
        form.set("stock", &product.stock.to_string());
        form.set("unit", &product.unit);
        form
    }

    pub fn new_merchant() -> Self {
        Form {
            kind: FormKind::Merchant,
            mode: FormMode::Create,
            title: "Add Merchant".to_string(),
            fields: vec![
                FormField::text("name", "Name", "Merchant name").required(),
                FormField::text("contact", "Contact", "Contact person"),
                FormField::text("phone", "Phone", "Phone number"),
                FormField::text("address", "Address", "Merchant address"),
            ],
            focus: 0,
        }
    }

    pub fn edit_merchant(merchant: &Merchant) -> Self {
        let mut form = Form::new_merchant();
        form.mode = FormMode::Edit(merchant.id);
        form.title = format!("Edit Merchant #{}", merchant.id);
        form.set("name", &merchant.name);
        form.set("contact", &merchant.contact);
        form.set("phone", &merchant.phone);
        form.set("address", &merchant.address);
        form
    }

    /// Stock operation form. Product and merchant lists start with an empty
    /// "select..." option.
    pub fn inventory(products: &[String], merchants: &[String], today: NaiveDate) -> Self {
        let with_blank = |names: &[String]| {
            let mut options = vec![String::new()];
            options.extend(names.iter().cloned());
            options
        };

        Form {
            kind: FormKind::Inventory,
            mode: FormMode::Create,
            title: "Stock Operation".to_string(),
            fields: vec![
                FormField::text("direction", "Operation", "")
                    .kind(FieldKind::Choice(vec![
                        Direction::Inbound.as_str().to_string(),
                        Direction::Outbound.as_str().to_string(),
                    ]))
                    .value(Direction::Inbound.as_str())
                    .required(),
                FormField::text("product", "Product", "Select product...")
                    .kind(FieldKind::Choice(with_blank(products)))
                    .required(),
                FormField::text("quantity", "Quantity", "1")
                    .kind(FieldKind::Number)
                    .value("1")
                    .required(),
                FormField::text("merchant", "Merchant", "Select merchant...")
                    .kind(FieldKind::Choice(with_blank(merchants))),
                FormField::text("date", "Date", "YYYY-MM-DD")
                    .kind(FieldKind::Date)
                    .value(today.format("%Y-%m-%d").to_string())
                    .required(),
                FormField::text("notes", "Notes", ""),
            ],
            focus: 0,
        }
    }

    pub fn get(&self, key: &str) -> &str {
        self.fields
            .iter()
            .find(|f| f.key == key)
            .map(|f| f.value.as_str())
            .unwrap_or("")
    }

    pub fn set(&mut self, key: &str, value: &str) {
        if let Some(field) = self.fields.iter_mut().find(|f| f.key == key) {
            field.value = value.to_string();
        }
    }

    pub fn focused(&self) -> Option<&FormField> {
        self.fields.get(self.focus)
    }

    pub fn focus_next(&mut self) {
        if !self.fields.is_empty() {
            self.focus = (self.focus + 1) % self.fields.len();
        }
    }

    pub fn focus_previous(&mut self) {
        if !self.fields.is_empty() {
            self.focus = (self.focus + self.fields.len() - 1) % self.fields.len();
        }
    }

    pub fn insert_char(&mut self, c: char) {
        if let Some(field) = self.fields.get_mut(self.focus) {
            if field.accepts(c) {
                field.value.push(c);
            }
        }
    }

    pub fn backspace(&mut self) {
        if let Some(field) = self.fields.get_mut(self.focus) {
            if !matches!(field.kind, FieldKind::Choice(_)) {
                field.value.pop();
            }
        }
    }

    /// Step a choice field forward (or back). No-op on other fields.
    pub fn cycle_choice(&mut self, forward: bool) {
        let Some(field) = self.fields.get_mut(self.focus) else {
            return;
        };
        let FieldKind::Choice(options) = &field.kind else {
            return;
        };
        if options.is_empty() {
            return;
        }

        let current = options.iter().position(|o| *o == field.value).unwrap_or(0);
        let next = if forward {
            (current + 1) % options.len()
        } else {
            (current + options.len() - 1) % options.len()
        };
        field.value = options[next].clone();
    }

    fn required_text(&self, key: &'static str) -> Result<String, FormError> {
        let value = self.get(key).trim();
        if value.is_empty() {
            return Err(FormError::Required(key));
        }
        Ok(value.to_string())
    }

    fn number(&self, key: &'static str, min: u32, max: u32) -> Result<u32, FormError> {
        let out_of_range = FormError::OutOfRange {
            field: key,
            min,
            max,
        };
        let value: u32 = self
            .get(key)
            .trim()
            .parse()
            .map_err(|_| out_of_range.clone())?;
        if value < min || value > max {
            return Err(out_of_range);
        }
        Ok(value)
    }

    pub fn to_new_product(&self) -> Result<NewProduct, FormError> {
        Ok(NewProduct {
            name: self.required_text("name")?,
            sku: self.get("sku").trim().to_string(),
            description: self.get("description").trim().to_string(),
            stock: self.number("stock", 0, MAX_QUANTITY)?,
            unit: self.get("unit").trim().to_string(),
        })
    }

    pub fn to_new_merchant(&self) -> Result<NewMerchant, FormError> {
        Ok(NewMerchant {
            name: self.required_text("name")?,
            contact: self.get("contact").trim().to_string(),
            phone: self.get("phone").trim().to_string(),
            address: self.get("address").trim().to_string(),
        })
    }

    pub fn to_stock_operation(&self) -> Result<StockOperation, FormError> {
        let direction = if self.get("direction") == Direction::Outbound.as_str() {
            Direction::Outbound
        } else {
            Direction::Inbound
        };

        let product = self.required_text("product")?;
        let quantity = self.number("quantity", 1, MAX_QUANTITY)?;

        let merchant = match direction {
            Direction::Outbound => Some(self.required_text("merchant")?),
            Direction::Inbound => None,
        };

        let raw_date = self.get("date").trim();
        let date = NaiveDate::parse_from_str(raw_date, "%Y-%m-%d").map_err(|_| {
            FormError::InvalidDate {
                field: "date",
                value: raw_date.to_string(),
            }
        })?;

        Ok(StockOperation {
            direction,
            product,
            quantity,
            merchant,
            date,
            notes: self.get("notes").trim().to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn type_str(form: &mut Form, s: &str) {
        for c in s.chars() {
            form.insert_char(c);
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 20).unwrap()
    }

    #[test]
    fn test_product_form_requires_name() {
        let form = Form::new_product();
        assert_eq!(form.to_new_product(), Err(FormError::Required("name")));
    }

    #[test]
    fn test_product_form_typing_and_validation() {
        let mut form = Form::new_product();
        type_str(&mut form, "  Kiwi ");
        form.focus_next();
        type_str(&mut form, "KIW001");
        form.focus_next();
        form.focus_next();
        // numeric field ignores letters
        form.backspace();
        type_str(&mut form, "4x2");

        let product = form.to_new_product().unwrap();
        assert_eq!(product.name, "Kiwi");
        assert_eq!(product.sku, "KIW001");
        assert_eq!(product.stock, 42);
    }

    #[test]
    fn test_product_stock_range() {
        let mut form = Form::new_product();
        form.set("name", "Kiwi");
        form.set("stock", "10000");
        assert!(matches!(
            form.to_new_product(),
            Err(FormError::OutOfRange { field: "stock", .. })
        ));
    }

    #[test]
    fn test_edit_forms_prefill() {
        let products = crate::entities::ProductRegistry::with_defaults();
        let form = Form::edit_product(products.find_by_id(2).unwrap());
        assert_eq!(form.mode, FormMode::Edit(2));
        assert_eq!(form.get("name"), "Banana");
        assert_eq!(form.get("stock"), "50");

        let merchants = crate::entities::MerchantRegistry::with_defaults();
        let form = Form::edit_merchant(merchants.find_by_id(3).unwrap());
        assert_eq!(form.get("contact"), "Wang Wu");
        assert_eq!(form.to_new_merchant().unwrap().phone, "13800138003");
    }

    #[test]
    fn test_focus_wraps() {
        let mut form = Form::new_merchant();
        form.focus_previous();
        assert_eq!(form.focused().unwrap().key, "address");
        form.focus_next();
        assert_eq!(form.focused().unwrap().key, "name");
    }

    #[test]
    fn test_inventory_form_outbound_needs_merchant() {
        let products = vec!["Apple".to_string(), "Banana".to_string()];
        let merchants = vec!["Mall E".to_string()];
        let mut form = Form::inventory(&products, &merchants, today());

        assert_eq!(form.to_stock_operation(), Err(FormError::Required("product")));

        // direction -> Outbound
        form.cycle_choice(true);
        form.focus_next();
        form.cycle_choice(true);
        assert_eq!(form.get("product"), "Apple");

        assert_eq!(form.to_stock_operation(), Err(FormError::Required("merchant")));

        form.focus = 3;
        form.cycle_choice(false);
        assert_eq!(form.get("merchant"), "Mall E");

        let operation = form.to_stock_operation().unwrap();
        assert_eq!(operation.direction, Direction::Outbound);
        assert_eq!(operation.quantity, 1);
        assert_eq!(operation.merchant.as_deref(), Some("Mall E"));
        assert_eq!(operation.date, today());
    }

    #[test]
    fn test_inventory_form_bad_date_and_quantity() {
        let mut form = Form::inventory(&["Apple".to_string()], &[], today());
        form.set("product", "Apple");
        form.set("quantity", "0");
        assert!(matches!(
            form.to_stock_operation(),
            Err(FormError::OutOfRange { field: "quantity", .. })
        ));

        form.set("quantity", "3");
        form.set("date", "2024-13-01");
        assert!(matches!(
            form.to_stock_operation(),
            Err(FormError::InvalidDate { .. })
        ));

        // inbound ignores the merchant field
        form.set("date", "2024-01-02");
        assert_eq!(form.to_stock_operation().unwrap().merchant, None);
    }
}
