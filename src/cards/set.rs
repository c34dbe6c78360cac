use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Canonical set record from the catalog listing. Only `name` is read by the
/// tracker; every other provider field is carried through untouched so the
/// catalog dump matches what the API returned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SetDescriptor {
    pub name: String,
    #[serde(flatten)]
    pub details: Map<String, Value>,
}
