//! SDK for building Scout analysis services.
//!
//! An analyzer implements the `Analyzer` service and gets notified about
//! review and push activity; while handling an event it pulls changed files
//! and file listings from the orchestrator's `Data` service. This crate
//! provides the pieces around the generated gRPC bindings:
//!
//! - [`DataClient`]: façade over the data service returning pull-based
//!   [`StreamCursor`]s instead of raw response streams,
//! - [`logging`]: the client/server interceptor pair emitting structured
//!   start/finish events for every call,
//! - [`serve_analyzer`]: serving helper wiring the log-field interceptor and
//!   message-size limits,
//! - [`Error`]: the SDK error taxonomy.
//!
//! Log fields attached via [`CallContext::add`] on the client side cross the
//! wire as call metadata and are visible to the server handler through
//! [`CallContext::from_request`].
//!
//! [`CallContext::add`]: scout_proto::CallContext::add
//! [`CallContext::from_request`]: scout_proto::CallContext::from_request

pub mod cursor;
pub mod data;
pub mod error;
pub mod logging;
pub mod options;
pub mod server;

pub use cursor::StreamCursor;
pub use data::DataClient;
pub use error::{Error, Result};
pub use options::{ClientOptions, ServerOptions, DEFAULT_MAX_MESSAGE_SIZE};
pub use server::serve_analyzer;

pub use scout_proto as proto;
