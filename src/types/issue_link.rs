//! Closing-keyword issue references in pull request descriptions
//!
//! GitHub links a pull request to an issue when its description contains a
//! closing keyword (`close`, `fixes`, `resolved`, ...) followed by an issue
//! reference. Two textual forms are recognized:
//!
//! - short: `Fixes #42`, `closes owner/repo#7`
//! - full URL: `Resolves https://github.com/owner/repo/issues/9`
//!
//! Links are deduplicated per description by their resolved issue URL; the
//! first occurrence wins and keeps its matched text and keyword.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use super::repository::RepositoryId;

const MAGIC_KEYWORDS: &str = "close|closes|closed|fix|fixes|fixed|resolve|resolves|resolved";
const REPOSITORY_PATTERN: &str = "[a-z0-9_-]+/[a-z0-9_-]+";

static SHORT_REFERENCE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"(?i)({}) ({})?#([0-9]+)",
        MAGIC_KEYWORDS, REPOSITORY_PATTERN
    ))
    .expect("Failed to compile short issue reference regex")
});

/// Canonical closing keyword
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum IssueKeyword {
    Closes,
    Fixes,
    Resolves,
}

impl IssueKeyword {
    /// Folds an inflected keyword onto its root by prefix, so `close` and
    /// `closed` both become `closes`.
    pub fn canonicalize(matched: &str) -> Option<Self> {
        let lowered = matched.to_lowercase();
        if lowered.starts_with("clo") {
            Some(Self::Closes)
        } else if lowered.starts_with("fix") {
            Some(Self::Fixes)
        } else if lowered.starts_with("reso") {
            Some(Self::Resolves)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueLink {
    /// Text exactly as matched in the description
    pub full_match: String,
    pub keyword: IssueKeyword,
    /// `owner/name`
    pub repo: String,
    pub issue: String,
    pub url: String,
}

/// Scans pull request descriptions for closing-keyword issue references.
#[derive(Debug, Clone)]
pub struct IssueLinkExtractor {
    host: String,
    home_repository: String,
    full_reference_regex: Regex,
}

impl IssueLinkExtractor {
    /// Creates an extractor resolving short references against `home_repository`
    /// and recognizing full issue URLs on `host`.
    pub fn new(host: &str, home_repository: &RepositoryId) -> Result<Self, regex::Error> {
        let full_reference_regex = Regex::new(&format!(
            r"(?i)({}) https://{}/({})/issues/([0-9]+)",
            MAGIC_KEYWORDS,
            regex::escape(host),
            REPOSITORY_PATTERN
        ))?;

        Ok(Self {
            host: host.to_string(),
            home_repository: home_repository.full_name(),
            full_reference_regex,
        })
    }

    pub fn extract_links(&self, body: Option<&str>) -> Vec<IssueLink> {
        let mut links: Vec<IssueLink> = Vec::new();
        let Some(body) = body.filter(|body| !body.is_empty()) else {
            return links;
        };

        let matches = SHORT_REFERENCE_REGEX
            .captures_iter(body)
            .chain(self.full_reference_regex.captures_iter(body));

        for captures in matches {
            let repo = captures
                .get(2)
                .map(|m| m.as_str().to_string())
                .unwrap_or_else(|| self.home_repository.clone());
            let issue = captures[3].to_string();
            let url = format!("https://{}/{}/issues/{}", self.host, repo, issue);

            if links.iter().any(|link| link.url == url) {
                continue;
            }

            let Some(keyword) = IssueKeyword::canonicalize(&captures[1]) else {
                continue;
            };

            links.push(IssueLink {
                full_match: captures[0].to_string(),
                keyword,
                repo,
                issue,
                url,
            });
        }

        links
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extractor() -> IssueLinkExtractor {
        IssueLinkExtractor::new("github.com", &RepositoryId::new("godotengine", "godot")).unwrap()
    }

    #[test]
    fn test_empty_body_has_no_links() {
        assert!(extractor().extract_links(None).is_empty());
        assert!(extractor().extract_links(Some("")).is_empty());
        assert!(
            extractor()
                .extract_links(Some("Just a refactor, see #12"))
                .is_empty()
        );
    }

    #[test]
    fn test_short_reference_resolves_to_home_repository() {
        let links = extractor().extract_links(Some("Fixes #42"));
        assert_eq!(links.len(), 1);

        let link = &links[0];
        assert_eq!(link.keyword, IssueKeyword::Fixes);
        assert_eq!(link.issue, "42");
        assert_eq!(link.repo, "godotengine/godot");
        assert_eq!(link.full_match, "Fixes #42");
        assert!(link.url.ends_with("/issues/42"));
        assert_eq!(link.url, "https://github.com/godotengine/godot/issues/42");
    }

    #[test]
    fn test_duplicate_urls_keep_first_occurrence() {
        let links = extractor().extract_links(Some("Closes owner/repo#7 and closed owner/repo#7"));
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].keyword, IssueKeyword::Closes);
        assert_eq!(links[0].repo, "owner/repo");
        assert_eq!(links[0].full_match, "Closes owner/repo#7");
    }

    #[test]
    fn test_full_url_reference() {
        let links = extractor().extract_links(Some("Resolves https://github.com/foo/bar/issues/9"));
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].repo, "foo/bar");
        assert_eq!(links[0].issue, "9");
        assert_eq!(links[0].keyword, IssueKeyword::Resolves);
        assert_eq!(links[0].url, "https://github.com/foo/bar/issues/9");
    }

    #[test]
    fn test_short_and_full_forms_deduplicate_across_patterns() {
        let body = "Fixed https://github.com/godotengine/godot/issues/5\nAlso fixes #5 and resolve #6";
        let links = extractor().extract_links(Some(body));

        let urls: Vec<&str> = links.iter().map(|link| link.url.as_str()).collect();
        assert_eq!(
            urls,
            vec![
                "https://github.com/godotengine/godot/issues/5",
                "https://github.com/godotengine/godot/issues/6",
            ]
        );
        // Short-form matches are scanned first, so the short "fixes #5" wins.
        assert_eq!(links[0].full_match, "fixes #5");
        assert_eq!(links[1].keyword, IssueKeyword::Resolves);
    }

    #[test]
    fn test_keyword_canonicalization_is_prefix_based() {
        assert_eq!(IssueKeyword::canonicalize("close"), Some(IssueKeyword::Closes));
        assert_eq!(IssueKeyword::canonicalize("CLOSED"), Some(IssueKeyword::Closes));
        assert_eq!(IssueKeyword::canonicalize("fix"), Some(IssueKeyword::Fixes));
        assert_eq!(IssueKeyword::canonicalize("Resolved"), Some(IssueKeyword::Resolves));
        assert_eq!(IssueKeyword::canonicalize("merges"), None);
        assert_eq!(IssueKeyword::Resolves.to_string(), "resolves");
    }

    #[test]
    fn test_full_url_on_other_host_is_ignored() {
        let links = extractor().extract_links(Some("Fixes https://gitlab.com/foo/bar/issues/9"));
        assert!(links.is_empty());
    }
}
