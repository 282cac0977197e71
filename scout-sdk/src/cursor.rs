//! Pull-based cursor over a server-streaming response.

use tonic::{Status, Streaming};

use crate::error::Error;

/// Pull-based iterator over the items of a server-streaming call.
///
/// Turns the receive-until-end-of-stream idiom into an explicit state
/// machine: [`advance`](Self::advance) pulls the next item,
/// [`current`](Self::current) hands it over, and the terminal accessors
/// distinguish clean exhaustion from transport failure. After `advance`
/// returns `false` the cursor is terminal; further calls keep returning
/// `false` and [`last_error`](Self::last_error) stays stable.
///
/// The cursor only ever touches its own transport handle, so independent
/// cursors can be driven from concurrent tasks without shared locks.
/// Dropping a pending `advance` future (e.g. on task cancellation) cancels
/// the in-flight receive without leaking the call.
pub struct StreamCursor<T> {
    stream: Option<Streaming<T>>,
    pending: Option<T>,
    error: Option<Status>,
    finished: bool,
}

impl<T> StreamCursor<T> {
    /// Wrap an established streaming response.
    pub fn new(stream: Streaming<T>) -> Self {
        Self {
            stream: Some(stream),
            pending: None,
            error: None,
            finished: false,
        }
    }

    /// Pull the next item from the stream.
    ///
    /// Returns `true` iff an item is now available via
    /// [`current`](Self::current). Returns `false` on clean end-of-stream
    /// and on transport failure; [`last_error`](Self::last_error) tells the
    /// two apart. Any item not consumed since the previous call is
    /// discarded.
    pub async fn advance(&mut self) -> bool {
        self.pending = None;

        if self.finished {
            return false;
        }
        let Some(stream) = self.stream.as_mut() else {
            self.finished = true;
            return false;
        };

        match stream.message().await {
            Ok(Some(item)) => {
                self.pending = Some(item);
                true
            }
            Ok(None) => {
                self.finish();
                false
            }
            Err(status) => {
                self.error = Some(status);
                self.finish();
                false
            }
        }
    }

    /// Take the item made available by the last [`advance`](Self::advance).
    ///
    /// Each item is consumed exactly once; calling this without a pending
    /// item is caller misuse and fails with [`Error::InvalidCursorState`].
    pub fn current(&mut self) -> Result<T, Error> {
        self.pending.take().ok_or(Error::InvalidCursorState)
    }

    /// The transport failure that terminated the stream, if any.
    ///
    /// `None` after ordinary end-of-stream.
    pub fn last_error(&self) -> Option<&Status> {
        self.error.as_ref()
    }

    /// Release the underlying transport.
    ///
    /// Idempotent; safe mid-stream (the remote call is cancelled, no further
    /// items are delivered) and after exhaustion. Any buffered item is
    /// discarded.
    pub fn close(&mut self) {
        self.pending = None;
        self.finish();
    }

    /// Whether the cursor has reached a terminal state.
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Drain the remaining items into a vector.
    ///
    /// Convenience for callers that want the whole sequence: fails with
    /// [`Error::Stream`] if the transport failed anywhere before the end.
    pub async fn collect(mut self) -> Result<Vec<T>, Error> {
        let mut items = Vec::new();
        while self.advance().await {
            items.push(self.current()?);
        }
        match self.error.take() {
            Some(status) => Err(Error::Stream(status)),
            None => Ok(items),
        }
    }

    fn finish(&mut self) {
        // Dropping the Streaming tears down the underlying call.
        self.stream = None;
        self.finished = true;
    }
}
