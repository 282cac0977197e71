//! Serving helper for analyzer implementations.

use std::net::SocketAddr;

use scout_proto::analyzer_server::{Analyzer, AnalyzerServer};
use scout_proto::LogFieldsInterceptor;
use tonic::service::interceptor::InterceptedService;
use tonic::transport::Server;

use crate::error::Result;
use crate::options::ServerOptions;

/// Serve an analyzer implementation until the process is stopped.
///
/// The service is wrapped with [`LogFieldsInterceptor`] so handlers can
/// reconstitute the caller's log fields via
/// [`CallContext::from_request`](scout_proto::CallContext::from_request),
/// and message-size limits come from `options`.
///
/// # Errors
/// Returns [`Error::Connection`](crate::Error::Connection) when the server
/// fails to bind or serve.
pub async fn serve_analyzer<A>(analyzer: A, addr: SocketAddr, options: ServerOptions) -> Result<()>
where
    A: Analyzer,
{
    let service = InterceptedService::new(
        AnalyzerServer::new(analyzer)
            .max_decoding_message_size(options.max_message_size)
            .max_encoding_message_size(options.max_message_size),
        LogFieldsInterceptor,
    );

    tracing::info!(%addr, "analyzer service listening");

    Server::builder().add_service(service).serve(addr).await?;

    Ok(())
}
