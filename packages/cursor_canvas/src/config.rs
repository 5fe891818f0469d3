//! Runtime configuration.
//!
//! Host/port/debug come from the CLI; the knobs below have sensible
//! defaults and can be overridden via environment variables.

/// Server runtime tunables.
#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// WebSocket-related settings
    pub websocket: WebSocketConfig,
}

#[derive(Clone, Debug)]
pub struct WebSocketConfig {
    /// Capacity of each session's outbound channel. A recipient that falls
    /// this far behind is treated as unreachable and evicted on the next
    /// send.
    pub send_channel_capacity: usize,
}

const DEFAULT_SEND_CHANNEL_CAPACITY: usize = 100;

impl ServerConfig {
    /// Defaults, with `CURSOR_CANVAS_SEND_CAPACITY` honored if set to a
    /// positive integer.
    pub fn from_env() -> Self {
        let send_channel_capacity = std::env::var("CURSOR_CANVAS_SEND_CAPACITY")
            .ok()
            .and_then(|v| v.parse().ok())
            .filter(|&c| c > 0)
            .unwrap_or(DEFAULT_SEND_CHANNEL_CAPACITY);

        Self {
            websocket: WebSocketConfig {
                send_channel_capacity,
            },
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            websocket: WebSocketConfig {
                send_channel_capacity: DEFAULT_SEND_CHANNEL_CAPACITY,
            },
        }
    }
}
