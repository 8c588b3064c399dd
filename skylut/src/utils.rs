use std::time::{Duration, Instant};

pub fn measure<T>(f: impl FnOnce() -> T) -> (T, Duration) {
    let tt = Instant::now();
    let val = f();

    (val, tt.elapsed())
}

#[cfg(feature = "metrics")]
pub fn format_duration(tt: Duration) -> String {
    // Sub-millisecond noise only makes the logs harder to read
    let tt = Duration::from_millis(tt.as_millis() as u64);

    humantime::format_duration(tt).to_string()
}

#[cfg(not(feature = "metrics"))]
pub fn format_duration(tt: Duration) -> String {
    format!("{:?}", tt)
}
