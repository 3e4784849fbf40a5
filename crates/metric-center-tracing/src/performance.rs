//! Performance instrumentation: timed spans and standard metric events.
//!
//! ```rust
//! use metric_center_tracing::performance::{record_transfer, PerformanceSpan};
//!
//! let span = PerformanceSpan::new("upload_points", Some(100));
//! // ... copy points to the backend ...
//! drop(span); // logged only if it took at least 100µs
//!
//! record_transfer(16 * 1024, "H2D", 40);
//! ```

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Instant;
use tracing::Level;

static ENABLED: AtomicBool = AtomicBool::new(cfg!(debug_assertions));
// u64::MAX means "no global threshold".
static GLOBAL_THRESHOLD_US: AtomicU64 = AtomicU64::new(u64::MAX);

/// Apply the process-wide performance-span switches.
///
/// Called by [`crate::init_global_tracing`]; tests may call it directly.
pub fn configure(enabled: bool, threshold_us: Option<u64>) {
    ENABLED.store(enabled, Ordering::Relaxed);
    GLOBAL_THRESHOLD_US.store(threshold_us.unwrap_or(u64::MAX), Ordering::Relaxed);
}

/// Whether performance spans currently log on drop.
pub fn is_enabled() -> bool {
    ENABLED.load(Ordering::Relaxed)
}

fn global_threshold() -> Option<u64> {
    match GLOBAL_THRESHOLD_US.load(Ordering::Relaxed) {
        u64::MAX => None,
        us => Some(us),
    }
}

/// RAII guard that times a region and logs its duration when dropped.
///
/// Nothing is logged when performance tracing is disabled or when the
/// duration stays under the span's threshold (or the global one, whichever
/// is larger).
pub struct PerformanceSpan {
    name: String,
    threshold_us: Option<u64>,
    start_time: Instant,
    span: tracing::Span,
}

impl PerformanceSpan {
    /// Create a debug-level span with an optional threshold in microseconds.
    pub fn new(name: impl Into<String>, threshold_us: Option<u64>) -> Self {
        Self::with_level(Level::DEBUG, name, threshold_us)
    }

    /// Create a span at the given level.
    pub fn with_level(level: Level, name: impl Into<String>, threshold_us: Option<u64>) -> Self {
        let name = name.into();
        let span = match level {
            Level::TRACE => tracing::trace_span!("perf", name = %name),
            Level::DEBUG => tracing::debug_span!("perf", name = %name),
            Level::INFO => tracing::info_span!("perf", name = %name),
            Level::WARN => tracing::warn_span!("perf", name = %name),
            Level::ERROR => tracing::error_span!("perf", name = %name),
        };

        Self {
            name,
            threshold_us,
            start_time: Instant::now(),
            span,
        }
    }

    /// Name given at construction.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Microseconds since the span was created.
    pub fn elapsed_us(&self) -> u64 {
        self.start_time.elapsed().as_micros() as u64
    }

    fn effective_threshold(&self) -> Option<u64> {
        match (self.threshold_us, global_threshold()) {
            (Some(local), Some(global)) => Some(local.max(global)),
            (local, global) => local.or(global),
        }
    }
}

impl Drop for PerformanceSpan {
    fn drop(&mut self) {
        if !is_enabled() {
            return;
        }
        let elapsed_us = self.elapsed_us();
        if self.effective_threshold().map_or(true, |t| elapsed_us >= t) {
            let _entered = self.span.enter();
            tracing::debug!(
                duration_us = elapsed_us,
                duration_ms = elapsed_us as f64 / 1000.0,
                "performance_span_complete"
            );
        }
    }
}

/// Record a host/backend data transfer with its bandwidth.
///
/// `direction` is `"H2D"` (host to device) or `"D2H"`.
pub fn record_transfer(bytes: usize, direction: &str, duration_us: u64) {
    let bandwidth_mbps = if duration_us > 0 {
        (bytes as f64 / duration_us as f64) * 1_000_000.0 / (1024.0 * 1024.0)
    } else {
        0.0
    };

    tracing::debug!(
        event = "transfer",
        bytes = bytes,
        direction = direction,
        duration_us = duration_us,
        bandwidth_mbps = bandwidth_mbps,
        "data_transfer"
    );
}

/// Record how many elements an operation processed per second.
pub fn record_throughput(operation: &str, elements: usize, duration_us: u64) {
    let elements_per_sec = per_second(elements as f64, duration_us);

    tracing::debug!(
        event = "throughput",
        operation = operation,
        elements = elements,
        duration_us = duration_us,
        elements_per_sec = elements_per_sec,
        "operation_throughput"
    );
}

/// Record the all-pairs distance workload of a launch.
///
/// A launch over `points` points evaluates `points * (points - 1)` ordered
/// distances.
pub fn record_distance_evaluations(points: usize, duration_us: u64) {
    let evaluations = points.saturating_mul(points.saturating_sub(1));
    let per_sec = per_second(evaluations as f64, duration_us);

    tracing::debug!(
        event = "distance_evaluations",
        points = points,
        evaluations = evaluations,
        duration_us = duration_us,
        evaluations_per_sec = per_sec,
        "all_pairs_workload"
    );
}

fn per_second(count: f64, duration_us: u64) -> f64 {
    if duration_us > 0 {
        count / duration_us as f64 * 1_000_000.0
    } else {
        0.0
    }
}
