//! Duration probing via ffprobe.

use std::path::Path;

use crate::tools::{commands, ToolOutcome, ToolRunner};

/// Get the container duration of `input` in seconds.
///
/// Returns `0.0` ("unknown") when the probe fails or its output is not a
/// usable number. Duration only steers frame sampling, so it never fails.
pub async fn probe_duration(runner: &dyn ToolRunner, ffprobe: &str, input: &Path) -> f64 {
    let command = commands::probe_duration(ffprobe, input);

    match runner.run(&command).await {
        ToolOutcome::Success { stdout, .. } => match parse_duration(&stdout) {
            Some(seconds) => {
                tracing::debug!("Probed duration {:.3}s for {}", seconds, input.display());
                seconds
            }
            None => {
                tracing::warn!(
                    "Unparsable duration from {}: {:?}; treating as unknown",
                    ffprobe,
                    stdout.trim()
                );
                0.0
            }
        },
        outcome => {
            tracing::warn!(
                "Duration probe failed ({}); treating as unknown",
                outcome.failure_summary().unwrap_or_default()
            );
            0.0
        }
    }
}

/// Parse the single numeric token ffprobe prints for `format=duration`.
///
/// `N/A`, NaN, infinities and negative values are all rejected.
pub fn parse_duration(stdout: &str) -> Option<f64> {
    let token = stdout.split_whitespace().next()?;
    let value: f64 = token.parse().ok()?;
    if value.is_finite() && value >= 0.0 {
        Some(value)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeRunner;

    #[test]
    fn parses_plain_number() {
        assert_eq!(parse_duration("12.345000\n"), Some(12.345));
        assert_eq!(parse_duration("  7 \n"), Some(7.0));
        assert_eq!(parse_duration("0.000000"), Some(0.0));
    }

    #[test]
    fn takes_first_token_only() {
        assert_eq!(parse_duration("30.5\n30.5\n"), Some(30.5));
    }

    #[test]
    fn rejects_non_numeric() {
        assert_eq!(parse_duration("N/A\n"), None);
        assert_eq!(parse_duration(""), None);
        assert_eq!(parse_duration("nan"), None);
        assert_eq!(parse_duration("inf"), None);
        assert_eq!(parse_duration("-3.0"), None);
    }

    #[tokio::test]
    async fn probe_returns_parsed_duration() {
        let runner = FakeRunner::healthy(12.0);
        let d = probe_duration(&runner, "ffprobe", Path::new("/ws/input.mp4")).await;
        assert_eq!(d, 12.0);
        assert_eq!(runner.calls().len(), 1);
    }

    #[tokio::test]
    async fn probe_failure_is_zero() {
        let runner = FakeRunner::healthy(12.0).with_probe(ToolOutcome::ExitFailure {
            code: 1,
            stderr: "input.mp4: Invalid data found when processing input".to_string(),
        });
        assert_eq!(
            probe_duration(&runner, "ffprobe", Path::new("/ws/input.mp4")).await,
            0.0
        );
    }

    #[tokio::test]
    async fn probe_launch_failure_is_zero() {
        let runner = FakeRunner::healthy(12.0).with_probe(ToolOutcome::LaunchFailure {
            reason: "not found".to_string(),
        });
        assert_eq!(
            probe_duration(&runner, "ffprobe", Path::new("/ws/input.mp4")).await,
            0.0
        );
    }

    #[tokio::test]
    async fn probe_garbage_is_zero() {
        let runner = FakeRunner::healthy(0.0).with_probe_stdout("N/A\n");
        assert_eq!(
            probe_duration(&runner, "ffprobe", Path::new("/ws/input.mp4")).await,
            0.0
        );
    }
}
