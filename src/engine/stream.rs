//! Decoding of the engine's push status stream
//!
//! The engine answers a push with a body of JSON objects, one per status
//! update, usually newline separated. [`StatusStream`] turns the raw body into
//! [`StatusRecord`]s one at a time, independent of how the transport chunks
//! the bytes.

use crate::error::{PusherError, Result};
use futures::stream::{BoxStream, Stream, StreamExt};
use serde::Deserialize;

/// Raw response body of a push request
pub type ByteStream = BoxStream<'static, Result<Vec<u8>>>;

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ProgressDetail {
    #[serde(default)]
    pub current: i64,
    #[serde(default)]
    pub total: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ErrorDetail {
    #[serde(default)]
    pub code: Option<i64>,
    #[serde(default)]
    pub message: String,
}

/// One status update from the engine
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusRecord {
    pub id: Option<String>,
    pub status: Option<String>,
    pub progress: Option<String>,
    pub progress_detail: Option<ProgressDetail>,
    pub error: Option<String>,
    pub error_detail: Option<ErrorDetail>,
    pub aux: Option<serde_json::Value>,
}

impl StatusRecord {
    pub fn is_error(&self) -> bool {
        self.error.is_some() || self.error_detail.is_some()
    }

    pub fn error_message(&self) -> Option<&str> {
        if !self.is_error() {
            return None;
        }
        let message = self
            .error
            .as_deref()
            .filter(|m| !m.is_empty())
            .or_else(|| self.error_detail.as_ref().map(|d| d.message.as_str()))
            .filter(|m| !m.is_empty());
        Some(message.unwrap_or("unknown error"))
    }

    /// Bandwidth/percentage updates for a single layer, recognised by their
    /// progress bar text
    pub fn is_progress(&self) -> bool {
        self.progress.as_deref().is_some_and(|p| !p.is_empty())
    }

    /// `id: status`, or just the status when there is no id
    pub fn status_line(&self) -> Option<String> {
        let status = self.status.as_deref().filter(|s| !s.is_empty())?;
        match self.id.as_deref().filter(|id| !id.is_empty()) {
            Some(id) => Some(format!("{}: {}", id, status)),
            None => Some(status.to_string()),
        }
    }

    /// Manifest digest from the final `aux` record of a push
    pub fn pushed_digest(&self) -> Option<&str> {
        self.aux.as_ref()?.get("Digest")?.as_str()
    }
}

enum Decoded {
    Record(StatusRecord),
    Failed(PusherError),
    NeedMore,
}

/// Consume-once sequence of status records over a byte stream.
///
/// `next_record` yields `None` at a clean end of input and `Some(Err(_))` for
/// malformed or truncated data; after an error the stream is finished.
pub struct StatusStream<S = ByteStream> {
    inner: S,
    buffer: Vec<u8>,
    exhausted: bool,
    finished: bool,
}

impl<S, B> StatusStream<S>
where
    S: Stream<Item = Result<B>> + Unpin,
    B: AsRef<[u8]>,
{
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            buffer: Vec::new(),
            exhausted: false,
            finished: false,
        }
    }

    pub async fn next_record(&mut self) -> Option<Result<StatusRecord>> {
        loop {
            if self.finished {
                return None;
            }

            match self.try_decode() {
                Decoded::Record(record) => return Some(Ok(record)),
                Decoded::Failed(err) => return Some(Err(self.fail(err))),
                Decoded::NeedMore => {}
            }

            if self.exhausted {
                self.finished = true;
                if self.buffer.is_empty() {
                    return None;
                }
                return Some(Err(PusherError::Decode(format!(
                    "Status stream ended inside a record ({} bytes left)",
                    self.buffer.len()
                ))));
            }

            match self.inner.next().await {
                Some(Ok(chunk)) => self.buffer.extend_from_slice(chunk.as_ref()),
                Some(Err(err)) => {
                    let err = PusherError::Decode(format!("Failed to read status stream: {}", err));
                    return Some(Err(self.fail(err)));
                }
                None => self.exhausted = true,
            }
        }
    }

    fn try_decode(&mut self) -> Decoded {
        let Some(start) = self.buffer.iter().position(|b| !b.is_ascii_whitespace()) else {
            self.buffer.clear();
            return Decoded::NeedMore;
        };

        let (next, consumed) = {
            let mut values =
                serde_json::Deserializer::from_slice(&self.buffer[start..]).into_iter::<StatusRecord>();
            let next = values.next();
            (next, start + values.byte_offset())
        };

        match next {
            Some(Ok(record)) => {
                self.buffer.drain(..consumed);
                Decoded::Record(record)
            }
            Some(Err(err)) if err.is_eof() => Decoded::NeedMore,
            Some(Err(err)) => Decoded::Failed(PusherError::Decode(err.to_string())),
            None => {
                self.buffer.clear();
                Decoded::NeedMore
            }
        }
    }

    fn fail(&mut self, err: PusherError) -> PusherError {
        self.finished = true;
        self.buffer.clear();
        err
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::stream;

    fn chunks(parts: &[&str]) -> StatusStream<impl Stream<Item = Result<Vec<u8>>> + Unpin> {
        let parts: Vec<Result<Vec<u8>>> = parts.iter().map(|p| Ok(p.as_bytes().to_vec())).collect();
        StatusStream::new(stream::iter(parts))
    }

    async fn collect(mut stream: StatusStream<impl Stream<Item = Result<Vec<u8>>> + Unpin>) -> Vec<Result<StatusRecord>> {
        let mut out = Vec::new();
        while let Some(item) = stream.next_record().await {
            out.push(item);
        }
        out
    }

    #[tokio::test]
    async fn test_newline_delimited_records() {
        let records = collect(chunks(&[
            "{\"status\":\"The push refers to repository [localhost:5000/app]\"}\r\n",
            "{\"status\":\"Preparing\",\"progressDetail\":{},\"id\":\"a1b2\"}\r\n",
        ]))
        .await;

        assert_eq!(records.len(), 2);
        let second = records[1].as_ref().unwrap();
        assert_eq!(second.id.as_deref(), Some("a1b2"));
        assert_eq!(second.status_line().as_deref(), Some("a1b2: Preparing"));
        assert!(!second.is_progress());
    }

    #[tokio::test]
    async fn test_records_split_across_chunks() {
        let records = collect(chunks(&["{\"sta", "tus\":\"Pus", "hed\",\"id\":\"x\"}", "\n{\"status\"", ":\"done\"}"])).await;

        let lines: Vec<_> = records
            .into_iter()
            .map(|r| r.unwrap().status_line().unwrap())
            .collect();
        assert_eq!(lines, vec!["x: Pushed".to_string(), "done".to_string()]);
    }

    #[tokio::test]
    async fn test_concatenated_records_without_separator() {
        let records = collect(chunks(&["{\"status\":\"a\"}{\"status\":\"b\"}"])).await;
        assert_eq!(records.len(), 2);
    }

    #[tokio::test]
    async fn test_empty_stream_ends_cleanly() {
        assert!(collect(chunks(&[])).await.is_empty());
        assert!(collect(chunks(&["\n", "  \r\n"])).await.is_empty());
    }

    #[tokio::test]
    async fn test_truncated_record_is_decode_error() {
        let records = collect(chunks(&["{\"status\":\"ok\"}\n{\"status\":\"Pu"])).await;
        assert_eq!(records.len(), 2);
        assert!(records[0].is_ok());
        assert!(matches!(records[1], Err(PusherError::Decode(_))));
    }

    #[tokio::test]
    async fn test_malformed_record_stops_stream() {
        let records = collect(chunks(&["not json\n{\"status\":\"never\"}\n"])).await;
        assert_eq!(records.len(), 1);
        assert!(matches!(records[0], Err(PusherError::Decode(_))));
    }

    #[tokio::test]
    async fn test_transport_error_is_decode_error() {
        let parts: Vec<Result<Vec<u8>>> = vec![
            Ok(b"{\"status\":\"a\"}\n".to_vec()),
            Err(PusherError::Connection("connection reset by peer".to_string())),
        ];
        let records = collect(StatusStream::new(stream::iter(parts))).await;
        assert_eq!(records.len(), 2);
        assert!(matches!(records[1], Err(PusherError::Decode(_))));
    }

    #[test]
    fn test_error_fields() {
        let only_string: StatusRecord = serde_json::from_str(r#"{"error":"denied"}"#).unwrap();
        assert_eq!(only_string.error_message(), Some("denied"));

        let only_detail: StatusRecord =
            serde_json::from_str(r#"{"errorDetail":{"message":"unauthorized: authentication required"}}"#).unwrap();
        assert_eq!(only_detail.error_message(), Some("unauthorized: authentication required"));

        let plain: StatusRecord = serde_json::from_str(r#"{"status":"Pushed"}"#).unwrap();
        assert!(!plain.is_error());
        assert_eq!(plain.error_message(), None);
    }

    #[test]
    fn test_progress_detection() {
        let progress: StatusRecord = serde_json::from_str(
            r#"{"status":"Pushing","progressDetail":{"current":512,"total":2048},"progress":"[=====>   ]  512B/2.048kB","id":"a1"}"#,
        )
        .unwrap();
        assert!(progress.is_progress());

        let detail_only: StatusRecord = serde_json::from_str(
            r#"{"status":"Pushing","progressDetail":{"current":5,"total":10},"id":"a1"}"#,
        )
        .unwrap();
        assert!(!detail_only.is_progress());

        let waiting: StatusRecord =
            serde_json::from_str(r#"{"status":"Waiting","progressDetail":{},"id":"a1"}"#).unwrap();
        assert!(!waiting.is_progress());
    }

    #[test]
    fn test_pushed_digest_from_aux() {
        let record: StatusRecord = serde_json::from_str(
            r#"{"progressDetail":{},"aux":{"Tag":"v1","Digest":"sha256:0123","Size":528}}"#,
        )
        .unwrap();
        assert_eq!(record.pushed_digest(), Some("sha256:0123"));
        assert_eq!(record.status_line(), None);
    }
}
