//! Display formatting for tracker read-outs.

/// Format milliseconds as `MM:SS.mmm`.
///
/// Negative input clamps to zero. Minutes are padded to two digits but are
/// never folded into hours, so long runs read `100:00.000`.
pub fn format_duration(ms: i64) -> String {
    let ms = ms.max(0) as u64;
    let total_secs = ms / 1000;
    let minutes = total_secs / 60;
    let seconds = total_secs % 60;
    let millis = ms % 1000;
    format!("{minutes:02}:{seconds:02}.{millis:03}")
}
