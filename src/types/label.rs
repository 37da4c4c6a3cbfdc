use serde::{Deserialize, Serialize};

/// Label attached to a single pull request; not registered globally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Label {
    pub id: String,
    pub name: String,
    /// `#RRGGBB`
    pub color: String,
}

impl Label {
    /// Builds a label from the API's bare hex color (`RRGGBB`).
    pub fn new(id: String, name: String, hex_color: &str) -> Self {
        Self {
            id,
            name,
            color: format!("#{}", hex_color),
        }
    }
}

/// Sorts labels by name, ordinal and case-sensitive.
pub fn sort_labels(labels: &mut [Label]) {
    labels.sort_by(|a, b| a.name.cmp(&b.name));
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Milestone {
    pub id: String,
    pub title: String,
    pub url: String,
}
