//! Call-scoped log fields and their wire representation.
//!
//! A [`CallContext`] owns the log fields of one logical call chain. Field
//! sets are immutable once built: [`CallContext::add`] copies the parent set
//! and overlays the new entries, so concurrent sibling calls derived from the
//! same parent never observe each other's additions. On the wire the fields
//! travel as a JSON object in the `log-fields` metadata entry of every RPC.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tonic::metadata::errors::InvalidMetadataValue;
use tonic::metadata::{MetadataMap, MetadataValue};
use tonic::service::Interceptor;
use tonic::{Request, Status};

/// Metadata key carrying the serialized log fields across process boundaries.
pub const LOG_FIELDS_KEY: &str = "log-fields";

/// An ordered key/value bag attached to a logical call for observability.
///
/// Keys are unique; rendering order is deterministic (sorted by key).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LogFields(BTreeMap<String, Value>);

impl LogFields {
    /// Create an empty field set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a field, replacing any previous value under the same key.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(key.into(), value.into());
    }

    /// Look up a field by key.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over the fields in rendering order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    /// Copy-then-overlay merge: returns a new set containing `self` plus
    /// `other`, with `other` winning on key collision. Neither input changes.
    #[must_use]
    pub fn merged(&self, other: &Self) -> Self {
        let mut merged = self.0.clone();
        for (key, value) in &other.0 {
            merged.insert(key.clone(), value.clone());
        }
        Self(merged)
    }

    /// Serialize to the JSON object form used on the wire.
    pub fn to_json(&self) -> String {
        serde_json::to_string(&self.0).unwrap_or_else(|_| "{}".to_string())
    }

    /// Deserialize from the JSON object form used on the wire.
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }
}

impl fmt::Display for LogFields {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_json())
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for LogFields {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// Carrier associating one [`LogFields`] set with a logical call chain.
///
/// Contexts are explicit values threaded through call signatures rather than
/// ambient state; cloning is cheap relative to the calls they accompany.
#[derive(Debug, Clone, Default)]
pub struct CallContext {
    fields: LogFields,
}

impl CallContext {
    /// A context with no fields attached.
    pub fn new() -> Self {
        Self::default()
    }

    /// A context owning the given field set.
    pub fn with_fields(fields: LogFields) -> Self {
        Self { fields }
    }

    /// The fields attached to this context; empty if none were ever added.
    pub fn fields(&self) -> &LogFields {
        &self.fields
    }

    /// Derive a child context whose field set is this context's set plus
    /// `fields`, the new entries winning on key collision. `self` is
    /// observably unchanged, so siblings deriving from the same parent
    /// cannot see each other's keys.
    #[must_use]
    pub fn add(&self, fields: LogFields) -> Self {
        Self {
            fields: self.fields.merged(&fields),
        }
    }

    /// Pack the fields into outgoing call metadata under [`LOG_FIELDS_KEY`].
    ///
    /// Empty contexts leave the metadata untouched. Fails only when the JSON
    /// form is not a valid ascii metadata value; callers treat that as a
    /// logging problem, never as a call failure.
    pub fn inject(&self, metadata: &mut MetadataMap) -> Result<(), InvalidMetadataValue> {
        if self.fields.is_empty() {
            return Ok(());
        }
        let value = MetadataValue::try_from(self.fields.to_json().as_str())?;
        metadata.insert(LOG_FIELDS_KEY, value);
        Ok(())
    }

    /// Reconstitute a context from inbound call metadata.
    ///
    /// Missing or malformed entries yield an empty context; an inbound call
    /// is never rejected over its log fields.
    pub fn from_metadata(metadata: &MetadataMap) -> Self {
        metadata
            .get(LOG_FIELDS_KEY)
            .and_then(|value| value.to_str().ok())
            .and_then(|raw| LogFields::from_json(raw).ok())
            .map(Self::with_fields)
            .unwrap_or_default()
    }

    /// Reconstitute a context from an inbound request.
    ///
    /// Prefers the context placed in the request extensions by
    /// [`LogFieldsInterceptor`], falling back to the raw metadata when the
    /// service was built without it.
    pub fn from_request<T>(request: &Request<T>) -> Self {
        if let Some(ctx) = request.extensions().get::<Self>() {
            return ctx.clone();
        }
        Self::from_metadata(request.metadata())
    }
}

/// Server interceptor that reconstitutes the inbound [`CallContext`] and
/// stores it in the request extensions before the handler runs.
///
/// Runs once per call for unary and streaming RPCs alike, so streaming
/// handlers see a single context for the whole call rather than one per item.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogFieldsInterceptor;

impl Interceptor for LogFieldsInterceptor {
    fn call(&mut self, mut request: Request<()>) -> Result<Request<()>, Status> {
        let ctx = CallContext::from_metadata(request.metadata());
        request.extensions_mut().insert(ctx);
        Ok(request)
    }
}
