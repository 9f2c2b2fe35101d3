//! Interpretation of the push status stream

use crate::engine::stream::StatusStream;
use crate::error::{PusherError, Result};
use crate::output::OutputManager;
use futures::Stream;

/// Outcome of a successful push
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PushReport {
    pub image: String,
    /// Manifest digest, when the engine reported one
    pub digest: Option<String>,
    pub status_lines: usize,
}

/// Read status records until the stream ends or reports an error.
///
/// Progress updates are not logged. The first error record ends the push with
/// [`PusherError::PushFailed`] without reading further. The stream is dropped,
/// and its connection released, on every return path.
pub async fn interpret<S, B>(mut stream: StatusStream<S>, image: &str, output: &OutputManager) -> Result<PushReport>
where
    S: Stream<Item = Result<B>> + Unpin,
    B: AsRef<[u8]>,
{
    let mut report = PushReport {
        image: image.to_string(),
        digest: None,
        status_lines: 0,
    };

    while let Some(record) = stream.next_record().await {
        let record = record?;

        if let Some(message) = record.error_message() {
            output.error(message);
            return Err(PusherError::PushFailed {
                image: image.to_string(),
            });
        }

        if let Some(digest) = record.pushed_digest() {
            output.debug(&format!("Pushed manifest digest: {}", digest));
            report.digest = Some(digest.to_string());
        }

        if record.is_progress() {
            continue;
        }
        if let Some(line) = record.status_line() {
            output.info(&line);
            report.status_lines += 1;
        }
    }

    output.success(&format!("Push image '{}' SUCCESS", image));
    Ok(report)
}
