//! Upstream repository model: where deliverables live when they are not on disk.
//!
//! Builds raw-content URLs (used by the remote fallback) and web "blob" URLs
//! (shown to readers when an asset could not be resolved).

use serde::{Deserialize, Serialize};
use url::Url;

/// Canonical upstream repository for the deliverables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Upstream {
    pub owner: String,
    pub repo: String,
    pub branch: String,
    /// Base for raw file downloads, e.g. `https://raw.githubusercontent.com`.
    pub raw_base: String,
    /// Base for browsable links, e.g. `https://github.com`.
    pub web_base: String,
}

impl Default for Upstream {
    fn default() -> Self {
        Self {
            owner: "dsd228".to_string(),
            repo: "Marketing-Performance-Dashboard".to_string(),
            branch: "arcor-marketing-analysis".to_string(),
            raw_base: "https://raw.githubusercontent.com".to_string(),
            web_base: "https://github.com".to_string(),
        }
    }
}

impl Upstream {
    /// `<raw_base>/<owner>/<repo>/<branch>/<segments...>`
    pub fn raw_url(&self, segments: &[String]) -> Result<Url, url::ParseError> {
        let prefix = [self.owner.as_str(), self.repo.as_str(), self.branch.as_str()];
        join_segments(&self.raw_base, &prefix, segments)
    }

    /// `<web_base>/<owner>/<repo>/blob/<branch>/<segments...>`
    pub fn blob_url(&self, segments: &[String]) -> Result<Url, url::ParseError> {
        let prefix = [
            self.owner.as_str(),
            self.repo.as_str(),
            "blob",
            self.branch.as_str(),
        ];
        join_segments(&self.web_base, &prefix, segments)
    }

    /// Repository landing page, used when a deliverable has no valid path.
    pub fn repo_url(&self) -> Result<Url, url::ParseError> {
        join_segments(&self.web_base, &[self.owner.as_str(), self.repo.as_str()], &[])
    }
}

fn join_segments(base: &str, prefix: &[&str], segments: &[String]) -> Result<Url, url::ParseError> {
    let mut url = Url::parse(base)?;
    {
        let mut path = url
            .path_segments_mut()
            .map_err(|_| url::ParseError::RelativeUrlWithCannotBeABaseBase)?;
        path.pop_if_empty();
        path.extend(prefix.iter().copied());
        path.extend(segments.iter().map(String::as_str));
    }
    Ok(url)
}
