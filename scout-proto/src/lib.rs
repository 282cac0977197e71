//! Protocol buffer definitions for the Scout analyzer services.
//!
//! Besides the generated message and service types this crate carries the
//! wire-level helpers every analyzer needs: the call-scoped log field
//! context ([`CallContext`]) and the repository URL parser
//! ([`parse_repository_info`]).

// Include the generated protobuf code
tonic::include_proto!("scout.v1");

pub mod fields;
pub mod repository;

pub use fields::{CallContext, LogFields, LogFieldsInterceptor, LOG_FIELDS_KEY};
pub use repository::{parse_repository_info, ParseRepositoryError, RepositoryInfo};

impl ReferencePointer {
    /// Create a pointer to a concrete commit on a reference.
    pub fn new(
        repository_url: impl Into<String>,
        reference_name: impl Into<String>,
        hash: impl Into<String>,
    ) -> Self {
        Self {
            internal_repository_url: repository_url.into(),
            reference_name: reference_name.into(),
            hash: hash.into(),
        }
    }

    /// Abbreviated commit hash for log lines and comments.
    pub fn short_hash(&self) -> &str {
        let end = self.hash.len().min(7);
        &self.hash[..end]
    }
}

impl Comment {
    /// Create a comment with the given text, not anchored to any file.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            file: String::new(),
            line: 0,
            text: text.into(),
            confidence: 0,
        }
    }

    /// Anchor the comment to a file.
    pub fn on_file(mut self, file: impl Into<String>) -> Self {
        self.file = file.into();
        self
    }

    /// Anchor the comment to a line; requires a file anchor to be meaningful.
    pub fn at_line(mut self, line: i32) -> Self {
        self.line = line;
        self
    }

    /// Set the analyzer's confidence in this finding (0-100).
    pub fn with_confidence(mut self, confidence: u32) -> Self {
        self.confidence = confidence.min(100);
        self
    }
}

impl EventResponse {
    /// Create a response identifying the analyzer version, with no findings.
    pub fn new(analyzer_version: impl Into<String>) -> Self {
        Self {
            analyzer_version: analyzer_version.into(),
            comments: Vec::new(),
        }
    }

    /// Append a finding to the response.
    pub fn add_comment(mut self, comment: Comment) -> Self {
        self.comments.push(comment);
        self
    }
}

impl ChangesRequest {
    /// Request the changes between two revisions, with no payload options.
    pub fn between(base: ReferencePointer, head: ReferencePointer) -> Self {
        Self {
            base: Some(base),
            head: Some(head),
            ..Default::default()
        }
    }

    /// Ask the server to include file contents in each change.
    pub fn with_contents(mut self) -> Self {
        self.want_contents = true;
        self
    }

    /// Ask the server to include the parsed syntax tree payload.
    pub fn with_uast(mut self) -> Self {
        self.want_uast = true;
        self
    }

    /// Ask the server to drop vendored files from the stream.
    pub fn excluding_vendored(mut self) -> Self {
        self.exclude_vendored = true;
        self
    }

    /// Restrict the stream to paths matching the pattern.
    pub fn including(mut self, pattern: impl Into<String>) -> Self {
        self.include_pattern = pattern.into();
        self
    }

    /// Drop paths matching the pattern from the stream.
    pub fn excluding(mut self, pattern: impl Into<String>) -> Self {
        self.exclude_pattern = pattern.into();
        self
    }
}

impl FilesRequest {
    /// Request the full file listing at a revision, with no payload options.
    pub fn at(revision: ReferencePointer) -> Self {
        Self {
            revision: Some(revision),
            ..Default::default()
        }
    }

    /// Ask the server to include file contents in each listing entry.
    pub fn with_contents(mut self) -> Self {
        self.want_contents = true;
        self
    }

    /// Ask the server to include the parsed syntax tree payload.
    pub fn with_uast(mut self) -> Self {
        self.want_uast = true;
        self
    }

    /// Ask the server to drop vendored files from the stream.
    pub fn excluding_vendored(mut self) -> Self {
        self.exclude_vendored = true;
        self
    }

    /// Restrict the stream to paths matching the pattern.
    pub fn including(mut self, pattern: impl Into<String>) -> Self {
        self.include_pattern = pattern.into();
        self
    }

    /// Drop paths matching the pattern from the stream.
    pub fn excluding(mut self, pattern: impl Into<String>) -> Self {
        self.exclude_pattern = pattern.into();
        self
    }
}
