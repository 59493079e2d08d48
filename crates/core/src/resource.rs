//! Resource kinds and the record interface shared by every kind.

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::ValidationError;
use crate::id::RecordId;

/// The record types managed by the dashboard, each with its own collection endpoint.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Category,
    Item,
    Warehouse,
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 3] = [
        ResourceKind::Category,
        ResourceKind::Item,
        ResourceKind::Warehouse,
    ];

    /// Collection endpoint, relative to the API base URL.
    pub fn path(self) -> &'static str {
        match self {
            ResourceKind::Category => "/categories",
            ResourceKind::Item => "/items",
            ResourceKind::Warehouse => "/warehouses",
        }
    }

    pub fn singular(self) -> &'static str {
        match self {
            ResourceKind::Category => "category",
            ResourceKind::Item => "item",
            ResourceKind::Warehouse => "warehouse",
        }
    }

    pub fn plural(self) -> &'static str {
        match self {
            ResourceKind::Category => "categories",
            ResourceKind::Item => "items",
            ResourceKind::Warehouse => "warehouses",
        }
    }

    /// Question put to the operator before a delete is issued.
    pub fn delete_prompt(self) -> String {
        format!("Delete this {}?", self.singular())
    }
}

impl core::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.plural())
    }
}

/// A server-owned record of one resource kind.
///
/// `Draft` holds the operator's in-progress form values as typed; `Payload`
/// is the validated request body sent on create and update (no `id`).
pub trait Resource: Clone + core::fmt::Debug + DeserializeOwned + Send + Sync + 'static {
    type Draft: Clone + Default + PartialEq + core::fmt::Debug + Send + Sync + 'static;
    type Payload: Serialize + core::fmt::Debug + Send + Sync;

    const KIND: ResourceKind;

    fn id(&self) -> &RecordId;

    fn name(&self) -> &str;

    /// Snapshot the persisted field values into an editable draft.
    fn to_draft(&self) -> Self::Draft;

    /// Check a draft and convert it into a request body.
    ///
    /// Pure: must not perform I/O. Runs before every create and save.
    fn validate(draft: &Self::Draft) -> Result<Self::Payload, ValidationError>;

    /// Reorder a fetched collection for display. Server order by default.
    fn sort_for_display(_records: &mut [Self]) {}
}
