//! Convenience macros for performance tracing.

/// Create a [`crate::performance::PerformanceSpan`], optionally recording fields.
///
/// ```rust
/// use metric_center_tracing::perf_span;
///
/// {
///     let _span = perf_span!("radius_launch", units = 4, lanes = 256);
///     // ... launch ...
/// } // logs the duration on drop
/// ```
#[macro_export]
macro_rules! perf_span {
    ($name:expr) => {{
        $crate::performance::PerformanceSpan::new($name, None)
    }};
    ($name:expr, $($field:tt = $value:expr),+ $(,)?) => {{
        let _span = ::tracing::debug_span!("perf", name = $name, $($field = $value),+).entered();
        $crate::performance::PerformanceSpan::new($name, None)
    }};
}

/// Emit a debug-level event tagged with `event = name`.
///
/// ```rust
/// use metric_center_tracing::perf_event;
///
/// perf_event!("unit_reduced", unit = 3, lanes = 1024);
/// ```
#[macro_export]
macro_rules! perf_event {
    ($name:expr, $($field:tt = $value:expr),+ $(,)?) => {
        ::tracing::debug!(event = $name, $($field = $value),+);
    };
}

#[cfg(test)]
mod tests {
    use std::thread;
    use std::time::Duration;

    #[test]
    fn perf_span_with_fields() {
        let span = perf_span!("upload", bytes = 1024, points = 64);
        assert_eq!(span.name(), "upload");
    }

    #[test]
    fn perf_event_compiles_with_mixed_fields() {
        perf_event!("unit_reduced", unit = 1, label = "radius");
    }

    #[test]
    fn perf_span_fields_attach_to_a_span() {
        let _ = tracing_subscriber::fmt()
            .with_test_writer()
            .with_max_level(tracing::Level::DEBUG)
            .try_init();

        let span = perf_span!("reduce", units = 4);
        thread::sleep(Duration::from_millis(1));
        assert!(span.elapsed_us() >= 1_000);
    }
}
