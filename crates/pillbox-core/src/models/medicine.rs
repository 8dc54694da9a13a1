//! Medicine cabinet models.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A single medicine registered in the user's cabinet.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Medicine {
    /// Opaque stable identifier, unique within the store
    pub id: String,
    /// Generic medicine name
    pub name: String,
    /// Manufacturer/brand
    pub brand: String,
    /// Active ingredients
    pub ingredients: String,
    /// Package specification (e.g., "0.25g x 24 capsules")
    pub specs: String,
    /// What the medicine treats
    pub indications: String,
    /// Default dosage instructions
    pub usage: String,
    /// Expiry date ("YYYY-MM-DD", empty when unknown)
    pub expiry_date: String,
    /// Optional package photo (data URL)
    pub image: Option<String>,
}

/// Partial medicine record produced by the autofill assistant.
///
/// `None` fields are left untouched on merge; the id is never overwritten.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct MedicineDetails {
    pub name: Option<String>,
    pub brand: Option<String>,
    pub ingredients: Option<String>,
    pub specs: Option<String>,
    pub indications: Option<String>,
    pub usage: Option<String>,
    pub expiry_date: Option<String>,
}

impl Medicine {
    /// Create a new medicine with a freshly minted id.
    pub fn new(name: String) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name,
            brand: String::new(),
            ingredients: String::new(),
            specs: String::new(),
            indications: String::new(),
            usage: String::new(),
            expiry_date: String::new(),
            image: None,
        }
    }

    /// Check whether the medicine is past its expiry date.
    ///
    /// An empty or unparseable expiry date counts as not expired.
    pub fn is_expired(&self, today: NaiveDate) -> bool {
        match NaiveDate::parse_from_str(&self.expiry_date, "%Y-%m-%d") {
            Ok(expiry) => expiry < today,
            Err(_) => false,
        }
    }

    /// Merge autofill details into this record, keeping the id.
    pub fn merge_details(&mut self, details: MedicineDetails) {
        if let Some(name) = details.name {
            self.name = name;
        }
        if let Some(brand) = details.brand {
            self.brand = brand;
        }
        if let Some(ingredients) = details.ingredients {
            self.ingredients = ingredients;
        }
        if let Some(specs) = details.specs {
            self.specs = specs;
        }
        if let Some(indications) = details.indications {
            self.indications = indications;
        }
        if let Some(usage) = details.usage {
            self.usage = usage;
        }
        if let Some(expiry_date) = details.expiry_date {
            self.expiry_date = expiry_date;
        }
    }
}
