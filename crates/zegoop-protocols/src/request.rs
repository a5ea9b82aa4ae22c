//! Request types carried by `processText` and `showAIResponse`.

use std::fmt;

use serde::{Deserialize, Serialize};

/// What the user asked the model to do with a piece of text.
///
/// Unknown values survive a round trip through [`RequestType::Other`] so a
/// surface can label them, while prompt construction treats them as
/// [`RequestType::Explain`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RequestType {
    Explain,
    Simplify,
    Define,
    Translate,
    Tooltip,
    Other(String),
}

impl RequestType {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Explain => "explain",
            Self::Simplify => "simplify",
            Self::Define => "define",
            Self::Translate => "translate",
            Self::Tooltip => "tooltip",
            Self::Other(name) => name,
        }
    }

    /// Heading label with the first letter capitalised ("Explain").
    pub fn title(&self) -> String {
        let name = self.as_str();
        let mut chars = name.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }
}

impl From<String> for RequestType {
    fn from(value: String) -> Self {
        match value.as_str() {
            "explain" => Self::Explain,
            "simplify" => Self::Simplify,
            "define" => Self::Define,
            "translate" => Self::Translate,
            "tooltip" => Self::Tooltip,
            _ => Self::Other(value),
        }
    }
}

impl From<&str> for RequestType {
    fn from(value: &str) -> Self {
        Self::from(value.to_string())
    }
}

impl From<RequestType> for String {
    fn from(value: RequestType) -> Self {
        match value {
            RequestType::Other(name) => name,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for RequestType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
