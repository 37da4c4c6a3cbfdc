pub mod pager;
pub mod pull_request;
pub mod rate_limit;
mod user;

use serde::{Deserialize, Serialize};

pub use pager::*;
pub use pull_request::*;
pub use rate_limit::*;
pub use user::*;

#[derive(Debug, Clone, Serialize)]
pub struct GraphQLQuery(pub String);

#[derive(Debug, Clone, Serialize)]
pub struct GraphQLPayload<T: serde::Serialize> {
    pub query: GraphQLQuery,
    pub variables: Option<T>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphQLResponse<T> {
    pub data: Option<T>,
    pub errors: Option<Vec<GraphQLError>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphQLError {
    #[serde(rename = "type")]
    pub error_type: Option<String>,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabelsConnection {
    pub nodes: Vec<LabelNode>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabelNode {
    pub id: String,
    pub name: String,
    pub color: String,
}

impl From<LabelNode> for crate::types::Label {
    fn from(label: LabelNode) -> Self {
        crate::types::Label::new(label.id, label.name, &label.color)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MilestoneNode {
    pub id: String,
    pub title: String,
    pub url: String,
}

impl From<MilestoneNode> for crate::types::Milestone {
    fn from(milestone: MilestoneNode) -> Self {
        Self {
            id: milestone.id,
            title: milestone.title,
            url: milestone.url,
        }
    }
}
