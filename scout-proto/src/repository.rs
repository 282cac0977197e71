//! Repository URL normalization.
//!
//! Analyzers receive repository identifiers in whatever shape the operator
//! configured: bare `host/owner/name` strings, full https URLs with or
//! without credentials, or local `file://` paths. [`parse_repository_info`]
//! normalizes all of them into a [`RepositoryInfo`] or rejects the input
//! with a specific reason. Parsing is pure; no I/O happens here.

use thiserror::Error;
use url::Url;

/// Source-hosting domains accepted for remote repositories.
const SUPPORTED_HOSTS: [&str; 3] = ["github.com", "gitlab.com", "bitbucket.org"];

/// Normalized descriptor of a repository identifier.
///
/// Constructed once per input string and immutable afterwards. For remote
/// repositories `clone_url` is the credential-preserving https form with a
/// `.git` suffix; for `file://` inputs it is the normalized URL verbatim and
/// `host`/`owner` are empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryInfo {
    pub clone_url: String,
    pub host: String,
    pub full_name: String,
    pub owner: String,
    pub name: String,
}

/// Reasons a repository identifier is rejected.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseRepositoryError {
    #[error("host can't be empty")]
    EmptyHost,

    #[error("only https urls are supported")]
    UnsupportedScheme,

    #[error("host {0} is not supported")]
    UnsupportedHost(String),

    #[error("unsupported path {0}")]
    UnsupportedPath(String),

    #[error("{0}")]
    Malformed(#[from] url::ParseError),
}

/// Parse a raw repository identifier into a [`RepositoryInfo`].
///
/// Inputs without a scheme are treated as https. Remote repositories must
/// live on one of the supported hosts and have exactly an `owner/name` path;
/// a trailing `.git` on the name is accepted and stripped for the name
/// fields, while the clone URL always carries it.
pub fn parse_repository_info(raw: &str) -> Result<RepositoryInfo, ParseRepositoryError> {
    let input = if raw.contains("://") {
        raw.to_string()
    } else {
        format!("https://{raw}")
    };

    let url = match Url::parse(&input) {
        Ok(url) => url,
        Err(url::ParseError::EmptyHost) => return Err(ParseRepositoryError::EmptyHost),
        Err(err) => return Err(err.into()),
    };

    if url.scheme() == "file" {
        return Ok(local_repository_info(&url));
    }

    let host = url.host_str().unwrap_or_default().to_string();
    if host.is_empty() {
        return Err(ParseRepositoryError::EmptyHost);
    }

    if url.scheme() != "https" {
        return Err(ParseRepositoryError::UnsupportedScheme);
    }

    if !SUPPORTED_HOSTS.contains(&host.as_str()) {
        return Err(ParseRepositoryError::UnsupportedHost(host));
    }

    let segments: Vec<&str> = url.path().split('/').filter(|s| !s.is_empty()).collect();
    let [owner, name] = segments[..] else {
        return Err(ParseRepositoryError::UnsupportedPath(segments.join("/")));
    };

    let owner = owner.to_string();
    let name = name.strip_suffix(".git").unwrap_or(name).to_string();
    let full_name = format!("{owner}/{name}");

    // Rebuild the clone URL from the parsed form so credentials survive and
    // query/fragment noise does not.
    let mut clone = url.clone();
    clone.set_path(&format!("/{owner}/{name}.git"));
    clone.set_query(None);
    clone.set_fragment(None);

    Ok(RepositoryInfo {
        clone_url: clone.to_string(),
        host,
        full_name,
        owner,
        name,
    })
}

fn local_repository_info(url: &Url) -> RepositoryInfo {
    let path = url.path().to_string();
    let name = path
        .rsplit('/')
        .find(|segment| !segment.is_empty())
        .unwrap_or_default()
        .to_string();

    RepositoryInfo {
        clone_url: url.to_string(),
        host: String::new(),
        full_name: path,
        owner: String::new(),
        name,
    }
}
