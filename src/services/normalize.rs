//! Folding raw pull request nodes into the snapshot model
//!
//! Each node becomes one flat [`PullRequest`]; its author, requested teams and
//! requested reviewers are registered in the run's [`Registries`] and
//! referenced by id. A node is fully decoded and validated before any registry
//! is touched, so a failing node leaves no partial counts behind.

use crate::github::graphql::graphql_types::{AuthorNode, PullRequestNode, RequestedReviewers};
use crate::types::{
    Author, AuthorId, IssueLinkExtractor, Label, PullRequest, Registries, Reviewer, Team,
    sort_labels,
};

/// Failure to fold one raw pull request node.
#[derive(Debug)]
pub enum NormalizeError {
    /// The node does not match the expected payload shape
    Decode {
        number: Option<u64>,
        source: serde_json::Error,
    },
    /// An existing author account without a node id
    MissingAuthorId { number: u64, login: String },
}

impl std::fmt::Display for NormalizeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Decode {
                number: Some(number),
                source,
            } => write!(f, "Failed to decode pull request #{}: {}", number, source),
            Self::Decode {
                number: None,
                source,
            } => write!(f, "Failed to decode pull request: {}", source),
            Self::MissingAuthorId { number, login } => write!(
                f,
                "Author '{}' of pull request #{} has no id",
                login, number
            ),
        }
    }
}

impl std::error::Error for NormalizeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Decode { source, .. } => Some(source),
            Self::MissingAuthorId { .. } => None,
        }
    }
}

pub struct EntityNormalizer {
    link_extractor: IssueLinkExtractor,
}

impl EntityNormalizer {
    pub fn new(link_extractor: IssueLinkExtractor) -> Self {
        Self { link_extractor }
    }

    pub fn normalize(
        &self,
        raw_node: serde_json::Value,
        registries: &mut Registries,
    ) -> Result<PullRequest, NormalizeError> {
        let number = raw_node.get("number").and_then(|number| number.as_u64());
        let node: PullRequestNode = serde_json::from_value(raw_node)
            .map_err(|source| NormalizeError::Decode { number, source })?;

        let author = match node.author {
            Some(author) => author_from_node(author, node.number)?,
            None => Author::ghost(),
        };

        let milestone = node.milestone.map(Into::into);

        let mut labels: Vec<Label> = node
            .labels
            .map(|labels| labels.nodes.into_iter().map(Into::into).collect())
            .unwrap_or_default();
        sort_labels(&mut labels);

        let links = self.link_extractor.extract_links(node.body.as_deref());

        let requested = RequestedReviewers::from(node.review_requests);
        let requested_teams: Vec<Team> = requested.teams.into_iter().map(Into::into).collect();
        let requested_users: Vec<Reviewer> = requested.users.into_iter().map(Into::into).collect();

        // Everything below mutates the registries and cannot fail.
        let authored_by = author.id.clone();
        registries.authors.reference(&authored_by, || author);

        let mut teams = Vec::new();
        if requested_teams.is_empty() {
            let no_team = Team::no_team();
            teams.push(no_team.id.clone());
            registries.teams.reference(&no_team.id.clone(), || no_team);
        } else {
            for team in requested_teams {
                if teams.contains(&team.id) {
                    continue;
                }
                teams.push(team.id.clone());
                registries.teams.reference(&team.id.clone(), || team);
            }
        }

        let mut reviewers = Vec::new();
        for reviewer in requested_users {
            if reviewers.contains(&reviewer.id) {
                continue;
            }
            reviewers.push(reviewer.id.clone());
            registries
                .reviewers
                .reference(&reviewer.id.clone(), || reviewer);
        }

        Ok(PullRequest {
            id: node.id,
            public_id: node.number,
            diff_url: PullRequest::diff_url_of(&node.url),
            patch_url: PullRequest::patch_url_of(&node.url),
            url: node.url,
            title: node.title,
            state: node.state,
            is_draft: node.is_draft,
            authored_by,
            created_at: node.created_at,
            updated_at: node.updated_at,
            target_branch: node.base_ref_name,
            mergeable_state: node.mergeable,
            mergeable_reason: node.merge_state_status,
            labels,
            milestone,
            links,
            teams,
            reviewers,
        })
    }
}

fn author_from_node(author: AuthorNode, number: u64) -> Result<Author, NormalizeError> {
    let Some(id) = author.id else {
        return Err(NormalizeError::MissingAuthorId {
            number,
            login: author.login,
        });
    };

    Ok(Author::new(
        AuthorId(id),
        author.login,
        author.avatar_url,
        author.url,
    ))
}
