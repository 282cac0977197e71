//! Client façade for the orchestrator's data service.

use scout_proto::data_client::DataClient as GrpcDataClient;
use scout_proto::{CallContext, Change, ChangesRequest, File, FilesRequest};
use tonic::transport::{Channel, Endpoint};
use tonic::Request;

use crate::cursor::StreamCursor;
use crate::error::Result;
use crate::logging::{log_stream_client_call, tracing_log_fn, LogFn};
use crate::options::ClientOptions;

const GET_CHANGES_METHOD: &str = "/scout.v1.Data/GetChanges";
const GET_FILES_METHOD: &str = "/scout.v1.Data/GetFiles";

/// Façade over the generated data service client.
///
/// Issues the two streaming calls and hands back a [`StreamCursor`] per
/// call. Call-establishment failures surface synchronously as
/// [`Error::Connection`](crate::Error::Connection) or
/// [`Error::Call`](crate::Error::Call); per-item failures only surface later
/// through the cursor. Each call carries the [`CallContext`]'s log fields as
/// metadata and runs under the streaming-client logging decorator.
///
/// Cloning is cheap (the underlying channel is shared), so callers issuing
/// concurrent streaming calls clone one client per task.
#[derive(Clone)]
pub struct DataClient {
    inner: GrpcDataClient<Channel>,
    log: LogFn,
}

impl std::fmt::Debug for DataClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DataClient")
            .field("inner", &self.inner)
            .finish_non_exhaustive()
    }
}

impl DataClient {
    /// Connect to the data service at `target` (e.g. `http://host:port`).
    ///
    /// Fails with [`Error::Connection`](crate::Error::Connection) when the
    /// transport cannot be established.
    pub async fn connect(target: impl Into<String>, options: ClientOptions) -> Result<Self> {
        let channel = Endpoint::from_shared(target.into())?.connect().await?;
        Ok(Self::new(channel, options))
    }

    /// Build a client over an already established channel.
    pub fn new(channel: Channel, options: ClientOptions) -> Self {
        let inner = GrpcDataClient::new(channel)
            .max_decoding_message_size(options.max_message_size)
            .max_encoding_message_size(options.max_message_size);
        Self {
            inner,
            log: tracing_log_fn(),
        }
    }

    /// Replace the logging callback used for call start/finish events.
    #[must_use]
    pub fn with_log_fn(mut self, log: LogFn) -> Self {
        self.log = log;
        self
    }

    /// Stream the changes between the request's base and head revisions.
    pub async fn get_changes(
        &mut self,
        ctx: &CallContext,
        request: ChangesRequest,
    ) -> Result<StreamCursor<Change>> {
        let request = attach_context(ctx, request);
        let inner = &mut self.inner;
        let response =
            log_stream_client_call(&self.log, ctx, GET_CHANGES_METHOD, || {
                inner.get_changes(request)
            })
            .await?;
        Ok(StreamCursor::new(response.into_inner()))
    }

    /// Stream the full file listing at the request's revision.
    pub async fn get_files(
        &mut self,
        ctx: &CallContext,
        request: FilesRequest,
    ) -> Result<StreamCursor<File>> {
        let request = attach_context(ctx, request);
        let inner = &mut self.inner;
        let response =
            log_stream_client_call(&self.log, ctx, GET_FILES_METHOD, || inner.get_files(request))
                .await?;
        Ok(StreamCursor::new(response.into_inner()))
    }
}

/// Wrap a message into a request carrying the context's log fields.
///
/// Field transmission is best-effort: a field set that cannot be represented
/// as ascii metadata is logged and dropped, never failing the call.
fn attach_context<T>(ctx: &CallContext, message: T) -> Request<T> {
    let mut request = Request::new(message);
    if let Err(err) = ctx.inject(request.metadata_mut()) {
        tracing::warn!(%err, "log fields not attached to outgoing call metadata");
    }
    request
}
