//! Category records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::id::RecordId;
use crate::resource::{Resource, ResourceKind};
use crate::validate;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: RecordId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryDraft {
    pub name: String,
}

impl CategoryDraft {
    pub fn named(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Body of `POST /categories` and `PUT /categories/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryPayload {
    pub name: String,
}

impl Resource for Category {
    type Draft = CategoryDraft;
    type Payload = CategoryPayload;

    const KIND: ResourceKind = ResourceKind::Category;

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn to_draft(&self) -> CategoryDraft {
        CategoryDraft::named(self.name.clone())
    }

    fn validate(draft: &CategoryDraft) -> Result<CategoryPayload, ValidationError> {
        Ok(CategoryPayload {
            name: validate::required_name(&draft.name)?,
        })
    }

    /// Alphabetical, ignoring case.
    fn sort_for_display(records: &mut [Self]) {
        records.sort_by(|a, b| {
            a.name
                .to_lowercase()
                .cmp(&b.name.to_lowercase())
                .then_with(|| a.name.cmp(&b.name))
        });
    }
}
