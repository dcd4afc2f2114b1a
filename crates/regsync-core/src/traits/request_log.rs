// # Request Log
//
// Capability handed to registrar clients for logging outgoing requests.
//
// Clients receive it explicitly at construction; there is no process-wide
// debug switch. Implementations MUST NOT receive credentials: clients pass
// the request body only, never the security header.

/// Sink for outgoing registrar requests
pub trait RequestLog: Send + Sync {
    /// Record a request about to be sent
    fn log_request(&self, method: &str, body: &str);
}

/// Request log writing to `tracing` at debug level, target `regsync::wire`
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingRequestLog {
    enabled: bool,
}

impl TracingRequestLog {
    /// Log every request
    pub fn enabled() -> Self {
        Self { enabled: true }
    }

    /// Log nothing
    pub fn disabled() -> Self {
        Self { enabled: false }
    }

    /// Whether requests are logged
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }
}

impl RequestLog for TracingRequestLog {
    fn log_request(&self, method: &str, body: &str) {
        if self.enabled {
            tracing::debug!(target: "regsync::wire", method, "Request for method '{}': {}", method, body);
        }
    }
}
