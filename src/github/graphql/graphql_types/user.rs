use serde::{Deserialize, Serialize};

/// Actor that opened a pull request. `id` comes from the `Node` fragment and is
/// absent only for actor kinds that are not nodes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorNode {
    pub id: Option<String>,
    pub login: String,
    pub avatar_url: String,
    pub url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserReviewerNode {
    pub id: String,
    pub login: String,
    pub avatar_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamReviewerNode {
    pub id: String,
    pub name: String,
    pub slug: Option<String>,
    pub avatar_url: Option<String>,
    pub parent_team: Option<ParentTeamNode>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParentTeamNode {
    pub name: String,
    pub slug: String,
}

impl From<UserReviewerNode> for crate::types::Reviewer {
    fn from(user: UserReviewerNode) -> Self {
        crate::types::Reviewer::new(crate::types::ReviewerId(user.id), user.login, user.avatar_url)
    }
}

/// The API slug is authoritative since it is what GitHub team URLs use; the
/// name-derived slug only covers payloads that omit it.
impl From<TeamReviewerNode> for crate::types::Team {
    fn from(team: TeamReviewerNode) -> Self {
        let slug = team
            .slug
            .unwrap_or_else(|| crate::types::slugify_team_name(&team.name));
        let converted = crate::types::Team::new(
            crate::types::TeamId(team.id),
            team.name,
            team.avatar_url.unwrap_or_default(),
            slug,
        );

        match team.parent_team {
            Some(parent) => converted.with_parent(&parent.name, &parent.slug),
            None => converted,
        }
    }
}
