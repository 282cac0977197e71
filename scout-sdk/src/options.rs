//! Explicit configuration for SDK clients and servers.
//!
//! There is no package-level default address or size; everything a
//! constructor needs arrives through these structs.

/// Maximum gRPC message size applied by default, 100 MiB. File contents and
/// syntax-tree payloads routinely exceed the tonic default of 4 MiB.
pub const DEFAULT_MAX_MESSAGE_SIZE: usize = 100 * 1024 * 1024;

/// Options for [`DataClient`](crate::DataClient) construction.
#[derive(Debug, Clone, Copy)]
pub struct ClientOptions {
    /// Limit applied to both encoding and decoding of messages.
    pub max_message_size: usize,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            max_message_size: DEFAULT_MAX_MESSAGE_SIZE,
        }
    }
}

/// Options for [`serve_analyzer`](crate::serve_analyzer).
#[derive(Debug, Clone, Copy)]
pub struct ServerOptions {
    /// Limit applied to both encoding and decoding of messages.
    pub max_message_size: usize,
}

impl Default for ServerOptions {
    fn default() -> Self {
        Self {
            max_message_size: DEFAULT_MAX_MESSAGE_SIZE,
        }
    }
}
