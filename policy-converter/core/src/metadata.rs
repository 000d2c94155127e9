use chrono::{offset::Utc, DateTime};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Identifies a converted resource and records the revision of the source object it was built
/// from.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub labels: BTreeMap<String, String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uid: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creation_timestamp: Option<DateTime<Utc>>,

    /// The `resourceVersion` of the source object.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revision: Option<String>,
}
