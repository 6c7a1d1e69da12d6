//! Logging macros.

/// Evaluates the given expression and logs how long the evaluation took at the
/// debug level.
#[macro_export]
macro_rules! with_timing_debug_logging {
    ($message:expr $(,$arg:expr)*; $expression:expr) => {{
        let _start_time = ::std::time::Instant::now();
        let _result = $expression;
        let _duration = _start_time.elapsed();
        $crate::debug!(
            concat!($message, " took {:.3} ms")$(,$arg)*,
            _duration.as_secs_f64() * 1e3,
        );
        _result
    }};
}
