use serde::{Deserialize, Serialize};

/// The `name` key every configuration object carries.
#[derive(Clone, Serialize, Deserialize)]
pub struct NamedJsonObject {
    name: String,
}

impl NamedJsonObject {
    pub fn new(name: String) -> NamedJsonObject {
        NamedJsonObject { name }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}
