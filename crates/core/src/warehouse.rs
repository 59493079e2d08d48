//! Warehouse records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::id::RecordId;
use crate::resource::{Resource, ResourceKind};
use crate::validate;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Warehouse {
    pub id: RecordId,
    pub name: String,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Warehouse {
    /// Location for display; the API sends an empty string when none was given.
    pub fn location(&self) -> Option<&str> {
        self.location.as_deref().filter(|l| !l.trim().is_empty())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WarehouseDraft {
    pub name: String,
    pub location: String,
}

/// Body of `POST /warehouses` and `PUT /warehouses/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WarehousePayload {
    pub name: String,
    pub location: Option<String>,
}

impl Resource for Warehouse {
    type Draft = WarehouseDraft;
    type Payload = WarehousePayload;

    const KIND: ResourceKind = ResourceKind::Warehouse;

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn to_draft(&self) -> WarehouseDraft {
        WarehouseDraft {
            name: self.name.clone(),
            location: self.location().unwrap_or_default().to_string(),
        }
    }

    fn validate(draft: &WarehouseDraft) -> Result<WarehousePayload, ValidationError> {
        Ok(WarehousePayload {
            name: validate::required_name(&draft.name)?,
            location: validate::optional_text(&draft.location),
        })
    }
}
