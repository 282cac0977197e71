//! Structured logging decorators for gRPC calls.
//!
//! Four hook points mirror the call directions: unary/streaming on the
//! client and on the server. Each decorator is a plain async function
//! composed at the call site; it tags the call with fixed fields, emits a
//! "started" event, awaits the wrapped future unchanged, then emits a
//! "finished" event carrying timing and status. Logging is best-effort and
//! never alters arguments, responses, or the error the caller observes.

use std::future::Future;
use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use scout_proto::{CallContext, LogFields};
use serde_json::Value;
use tonic::Status;

/// Callback receiving every log event: a message and the merged field set.
pub type LogFn = Arc<dyn Fn(&str, &LogFields) + Send + Sync>;

/// A [`LogFn`] emitting through `tracing` at info level, fields rendered as
/// a JSON object.
pub fn tracing_log_fn() -> LogFn {
    Arc::new(|message, fields| {
        tracing::info!(target: "scout::grpc", fields = %fields, "{message}");
    })
}

/// A [`LogFn`] that drops every event.
pub fn noop_log_fn() -> LogFn {
    Arc::new(|_, _| {})
}

/// Wrap a unary client call.
pub async fn log_unary_client_call<T, F, Fut>(
    log: &LogFn,
    ctx: &CallContext,
    full_method: &str,
    call: F,
) -> Result<T, Status>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T, Status>>,
{
    intercept(
        log,
        ctx,
        "client",
        full_method,
        "gRPC unary client call started",
        "gRPC unary client call finished",
        call,
    )
    .await
}

/// Wrap a streaming client call. The "finished" event fires when the call
/// itself resolves (stream established or refused), once per call.
pub async fn log_stream_client_call<T, F, Fut>(
    log: &LogFn,
    ctx: &CallContext,
    full_method: &str,
    call: F,
) -> Result<T, Status>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T, Status>>,
{
    intercept(
        log,
        ctx,
        "client",
        full_method,
        "gRPC streaming client call started",
        "gRPC streaming client call finished",
        call,
    )
    .await
}

/// Wrap a unary server handler. `ctx` is the inbound call context, typically
/// `CallContext::from_request(&request)`.
pub async fn log_unary_server_call<T, F, Fut>(
    log: &LogFn,
    ctx: &CallContext,
    full_method: &str,
    handler: F,
) -> Result<T, Status>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T, Status>>,
{
    intercept(
        log,
        ctx,
        "server",
        full_method,
        "gRPC unary server call started",
        "gRPC unary server call finished",
        handler,
    )
    .await
}

/// Wrap a streaming server handler. Fields are captured once per call, not
/// once per item.
pub async fn log_stream_server_call<T, F, Fut>(
    log: &LogFn,
    ctx: &CallContext,
    full_method: &str,
    handler: F,
) -> Result<T, Status>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T, Status>>,
{
    intercept(
        log,
        ctx,
        "server",
        full_method,
        "gRPC streaming server call started",
        "gRPC streaming server call finished",
        handler,
    )
    .await
}

async fn intercept<T, F, Fut>(
    log: &LogFn,
    ctx: &CallContext,
    kind: &str,
    full_method: &str,
    started_msg: &str,
    finished_msg: &str,
    call: F,
) -> Result<T, Status>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T, Status>>,
{
    let fields = request_fields(ctx, kind, full_method);
    log(started_msg, &fields);

    let start_time = Utc::now();
    let started = Instant::now();

    let out = call().await;

    let fields = response_fields(&fields, start_time, started, out.as_ref().err());
    log(finished_msg, &fields);

    out
}

/// Fixed per-call tags merged over the caller's own fields.
fn request_fields(ctx: &CallContext, kind: &str, full_method: &str) -> LogFields {
    let (service, method) = split_method(full_method);
    ctx.fields().merged(&LogFields::from_iter([
        ("system", Value::from("grpc")),
        ("span.kind", Value::from(kind)),
        ("grpc.service", Value::from(service)),
        ("grpc.method", Value::from(method)),
    ]))
}

/// Timing and status tags added once the call resolves.
fn response_fields(
    base: &LogFields,
    start_time: chrono::DateTime<Utc>,
    started: Instant,
    err: Option<&Status>,
) -> LogFields {
    let code = match err {
        None => "OK".to_string(),
        Some(status) => format!("{:?}", status.code()),
    };

    let mut extra = LogFields::from_iter([
        ("grpc.start_time", Value::from(start_time.to_rfc3339())),
        ("grpc.code", Value::from(code)),
        (
            "duration",
            Value::from(format!(
                "{:.3}ms",
                started.elapsed().as_secs_f64() * 1000.0
            )),
        ),
    ]);
    if let Some(status) = err {
        extra.insert("error", status.message());
    }

    base.merged(&extra)
}

/// Split a fully qualified method name (`/package.Service/Method`) into its
/// service and method parts.
fn split_method(full_method: &str) -> (&str, &str) {
    full_method
        .trim_start_matches('/')
        .split_once('/')
        .unwrap_or((full_method, ""))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Mutex;

    fn recording_log_fn() -> (LogFn, Arc<Mutex<Vec<(String, LogFields)>>>) {
        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&events);
        let log: LogFn = Arc::new(move |message, fields| {
            sink.lock()
                .unwrap()
                .push((message.to_string(), fields.clone()));
        });
        (log, events)
    }

    #[test]
    fn splits_fully_qualified_method_names() {
        assert_eq!(
            split_method("/scout.v1.Data/GetChanges"),
            ("scout.v1.Data", "GetChanges")
        );
        assert_eq!(
            split_method("/scout.v1.Analyzer/NotifyReviewEvent"),
            ("scout.v1.Analyzer", "NotifyReviewEvent")
        );
    }

    #[tokio::test]
    async fn successful_call_logs_started_and_finished() {
        let (log, events) = recording_log_fn();
        let ctx = CallContext::new().add(LogFields::from_iter([("k", json!("v"))]));

        let out = log_unary_client_call(&log, &ctx, "/scout.v1.Data/GetChanges", || async {
            Ok::<_, Status>(42)
        })
        .await
        .unwrap();
        assert_eq!(out, 42);

        let events = events.lock().unwrap();
        assert_eq!(events.len(), 2);

        let (message, fields) = &events[0];
        assert_eq!(message, "gRPC unary client call started");
        assert_eq!(fields.get("system"), Some(&json!("grpc")));
        assert_eq!(fields.get("span.kind"), Some(&json!("client")));
        assert_eq!(fields.get("grpc.service"), Some(&json!("scout.v1.Data")));
        assert_eq!(fields.get("grpc.method"), Some(&json!("GetChanges")));
        assert_eq!(fields.get("k"), Some(&json!("v")));

        let (message, fields) = &events[1];
        assert_eq!(message, "gRPC unary client call finished");
        assert_eq!(fields.get("grpc.code"), Some(&json!("OK")));
        assert!(fields.get("grpc.start_time").is_some());
        assert!(fields.get("duration").is_some());
        assert!(fields.get("error").is_none());
    }

    #[tokio::test]
    async fn failing_call_keeps_error_and_logs_code() {
        let (log, events) = recording_log_fn();
        let ctx = CallContext::new();

        let err = log_unary_server_call(
            &log,
            &ctx,
            "/scout.v1.Analyzer/NotifyPushEvent",
            || async { Err::<(), _>(Status::invalid_argument("bad event")) },
        )
        .await
        .unwrap_err();

        // The caller observes the handler's own error untouched.
        assert_eq!(err.code(), tonic::Code::InvalidArgument);
        assert_eq!(err.message(), "bad event");

        let events = events.lock().unwrap();
        let (_, fields) = &events[1];
        assert_eq!(fields.get("span.kind"), Some(&json!("server")));
        assert_eq!(fields.get("grpc.code"), Some(&json!("InvalidArgument")));
        assert_eq!(fields.get("error"), Some(&json!("bad event")));
    }

    #[tokio::test]
    async fn stream_server_decorator_tags_span_kind_server() {
        let (log, events) = recording_log_fn();
        let ctx = CallContext::new();

        log_stream_server_call(&log, &ctx, "/scout.v1.Data/GetChanges", || async {
            Ok::<_, Status>(())
        })
        .await
        .unwrap();

        let events = events.lock().unwrap();
        assert_eq!(events[0].0, "gRPC streaming server call started");
        assert_eq!(events[0].1.get("span.kind"), Some(&json!("server")));
        assert_eq!(events[1].0, "gRPC streaming server call finished");
        assert_eq!(events[1].1.get("grpc.code"), Some(&json!("OK")));
    }

    #[tokio::test]
    async fn caller_fields_do_not_outrank_call_tags() {
        let (log, events) = recording_log_fn();
        let ctx = CallContext::new().add(LogFields::from_iter([("system", json!("custom"))]));

        log_stream_client_call(&log, &ctx, "/scout.v1.Data/GetFiles", || async {
            Ok::<_, Status>(())
        })
        .await
        .unwrap();

        let events = events.lock().unwrap();
        let (message, fields) = &events[0];
        assert_eq!(message, "gRPC streaming client call started");
        assert_eq!(fields.get("system"), Some(&json!("grpc")));
    }
}
