//! A value that is either given in place or read from the environment.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(untagged)]
pub enum Secret {
    Plain(String),
    FromEnvironment { variable: String },
}

impl From<String> for Secret {
    fn from(value: String) -> Self {
        Secret::Plain(value)
    }
}

impl From<&str> for Secret {
    fn from(value: &str) -> Self {
        Self::from(value.to_string())
    }
}
