//! Inventory item records.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::id::RecordId;
use crate::resource::{Resource, ResourceKind};
use crate::validate;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: RecordId,
    pub name: String,
    #[serde(default)]
    pub sku: String,
    pub quantity: i64,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warehouse_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

/// Item form values, kept as text until validated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemDraft {
    pub name: String,
    pub sku: String,
    pub quantity: String,
    pub price: String,
    pub description: String,
    pub category_id: String,
    pub warehouse_id: String,
}

impl ItemDraft {
    pub fn new(
        name: impl Into<String>,
        sku: impl Into<String>,
        quantity: impl Into<String>,
        price: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            sku: sku.into(),
            quantity: quantity.into(),
            price: price.into(),
            ..Self::default()
        }
    }
}

/// Body of `POST /items` and `PUT /items/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemPayload {
    pub name: String,
    pub sku: String,
    pub quantity: i64,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warehouse_id: Option<String>,
}

impl Resource for Item {
    type Draft = ItemDraft;
    type Payload = ItemPayload;

    const KIND: ResourceKind = ResourceKind::Item;

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn to_draft(&self) -> ItemDraft {
        ItemDraft {
            name: self.name.clone(),
            sku: self.sku.clone(),
            quantity: self.quantity.to_string(),
            price: self.price.to_string(),
            description: self.description.clone(),
            category_id: self.category_id.clone().unwrap_or_default(),
            warehouse_id: self.warehouse_id.clone().unwrap_or_default(),
        }
    }

    fn validate(draft: &ItemDraft) -> Result<ItemPayload, ValidationError> {
        let name = validate::required_name(&draft.name)?;
        let (quantity, price) = validate::quantity_and_price(&draft.quantity, &draft.price)?;
        Ok(ItemPayload {
            name,
            sku: draft.sku.trim().to_string(),
            quantity,
            price,
            description: draft.description.trim().to_string(),
            category_id: validate::optional_text(&draft.category_id),
            warehouse_id: validate::optional_text(&draft.warehouse_id),
        })
    }
}
