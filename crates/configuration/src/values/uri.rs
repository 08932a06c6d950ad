use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::Secret;

/// Base URL of the search cluster.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
pub struct BackendUri(pub Secret);

impl From<String> for BackendUri {
    fn from(value: String) -> Self {
        Self(value.into())
    }
}

impl From<&str> for BackendUri {
    fn from(value: &str) -> Self {
        Self::from(value.to_string())
    }
}
