//! Wire shapes. Inbound types are untrusted and validated before they reach a handler;
//! outbound types are built only from stored rows.

pub mod categories;
pub mod foods;

use serde::Serialize;

#[derive(Debug, Serialize)]
#[cfg_attr(test, derive(serde::Deserialize, PartialEq))]
pub struct HealthRead {
    pub status: String,
}

impl HealthRead {
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
        }
    }
}
