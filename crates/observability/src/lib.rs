//! Tracing and logging setup shared by the binaries.

pub use self::tracing::{LogFormat, ParseLogFormatError};

/// Initialize process-wide tracing.
///
/// Safe to call multiple times; subsequent calls are no-ops.
pub fn init(format: LogFormat) {
    tracing::init(format);
}

/// Subscriber configuration (filters, output format).
pub mod tracing;
