//! Client (pet owner) domain model.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier for a client record.
pub type ClientId = Uuid;

/// Pet owner contact record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Client {
    pub id: ClientId,
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
    pub address: Option<String>,
}

/// Input shape for creating a client; the store assigns the identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewClient {
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
    pub address: Option<String>,
}

/// Field-level merge patch for a client.
///
/// Outer `Some` means "set this field"; `None` preserves the stored value.
/// Optional record fields take a nested `Option` so a patch can also clear
/// them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientPatch {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<Option<String>>,
    pub address: Option<Option<String>>,
}

impl Client {
    /// Creates a client record with a freshly generated stable ID.
    pub fn create(draft: NewClient) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: draft.name,
            phone: draft.phone,
            email: draft.email,
            address: draft.address,
        }
    }

    /// Shallow-merges set patch fields over this record.
    pub fn apply(&mut self, patch: ClientPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(phone) = patch.phone {
            self.phone = phone;
        }
        if let Some(email) = patch.email {
            self.email = email;
        }
        if let Some(address) = patch.address {
            self.address = address;
        }
    }
}
