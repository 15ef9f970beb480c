use jiff::{SignedDuration, Timestamp};

/// Evaluates `$block` and logs how long it took at debug level.
#[macro_export]
macro_rules! timer_debug {
    ($msg:literal, $block:expr) => {{
        let (result, elapsed) = $crate::utils::time::measure(|| $block);
        tracing::debug!(?elapsed, $msg);
        result
    }};
}

/// Runs `f` and returns its output together with the wall-clock time it took.
pub fn measure<T>(f: impl FnOnce() -> T) -> (T, SignedDuration) {
    let start = Timestamp::now();
    let output = f();
    (output, Timestamp::now().duration_since(start))
}
