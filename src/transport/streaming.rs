//! Streaming response decoding.
//!
//! The wire format is a sequence of SSE-style lines, `data: <json>\n`,
//! terminated by `data: [DONE]\n`. [`ChatStream`] turns the response byte
//! stream into typed chunks: a lazy, forward-only, single-pass sequence.
//! Dropping the stream at any point, including after an error, releases the
//! underlying connection.

use bytes::Bytes;
use futures::{Stream, StreamExt};
use pin_project_lite::pin_project;
use std::collections::{HashMap, VecDeque};
use std::pin::Pin;
use std::task::{Context, Poll};

use super::TransportError;
use crate::errors::{GroqError, GroqResult};
use crate::types::chat::{ChatChunk, ChatResponse};

/// Terminal sentinel ending a stream. Never yielded as an event.
const DONE_SENTINEL: &str = "[DONE]";

/// Streaming HTTP response.
pub struct StreamingResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response headers.
    pub headers: HashMap<String, String>,
    /// Byte stream.
    pub stream: Pin<Box<dyn Stream<Item = Result<Bytes, TransportError>> + Send>>,
}

/// Incremental line decoder for `data:`-prefixed event payloads.
///
/// Event boundaries are newline-delimited, not length-prefixed, so bytes are
/// buffered until a full line is available. Lines without the `data:` prefix
/// (SSE comments, keepalives, blank separators) are discarded.
#[derive(Debug, Default)]
pub struct SseLineDecoder {
    buffer: Vec<u8>,
}

impl SseLineDecoder {
    /// Creates an empty decoder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds a chunk of bytes, returning the data payloads of every complete
    /// line seen so far. Payloads are trimmed; the `[DONE]` sentinel is
    /// returned verbatim for the caller to interpret.
    pub fn feed(&mut self, chunk: &[u8]) -> GroqResult<Vec<String>> {
        self.buffer.extend_from_slice(chunk);

        let mut payloads = Vec::new();
        while let Some(pos) = self.buffer.iter().position(|&b| b == b'\n') {
            let line: Vec<u8> = self.buffer.drain(..=pos).collect();
            if let Some(payload) = Self::parse_line(&line)? {
                payloads.push(payload);
            }
        }
        Ok(payloads)
    }

    /// Flushes a trailing line that was not newline-terminated.
    pub fn flush(&mut self) -> GroqResult<Option<String>> {
        if self.buffer.is_empty() {
            return Ok(None);
        }
        let line = std::mem::take(&mut self.buffer);
        Self::parse_line(&line)
    }

    fn parse_line(line: &[u8]) -> GroqResult<Option<String>> {
        // Lines only ever split on ASCII newlines, so UTF-8 sequences are
        // never cut; a decode failure here means the wire data is broken.
        let line = std::str::from_utf8(line).map_err(|e| {
            GroqError::chat_completion(format!("Invalid UTF-8 in stream: {e}"))
        })?;
        let line = line.trim_end_matches(['\n', '\r']);

        let Some(payload) = line.strip_prefix("data:") else {
            return Ok(None);
        };
        Ok(Some(payload.trim().to_string()))
    }
}

/// One step of payload interpretation.
enum Decoded {
    /// A well-formed event.
    Event(ChatChunk),
    /// The terminal sentinel; iteration ends without an event.
    Done,
    /// A fatal stream error; iteration ends after surfacing it.
    Fatal(GroqError),
}

/// Interprets one `data:` payload.
///
/// Decode failures are fatal, not skipped: a stream that emits unparseable
/// JSON is broken, and continuing would silently drop output. An event
/// carrying an `error` key aborts with a typed error; events already yielded
/// to the caller remain valid.
fn decode_payload(payload: &str) -> Decoded {
    if payload == DONE_SENTINEL {
        return Decoded::Done;
    }

    let value: serde_json::Value = match serde_json::from_str(payload) {
        Ok(value) => value,
        Err(e) => {
            return Decoded::Fatal(GroqError::chat_completion(format!(
                "Failed to decode stream event: {e}"
            )));
        }
    };

    if let Some(error) = value.get("error") {
        let message = match error {
            serde_json::Value::String(s) => s.clone(),
            other => other
                .get("message")
                .and_then(serde_json::Value::as_str)
                .map_or_else(|| other.to_string(), str::to_string),
        };
        return Decoded::Fatal(GroqError::chat_completion(message).with_response_body(value));
    }

    match serde_json::from_value::<ChatChunk>(value) {
        Ok(chunk) => Decoded::Event(chunk),
        Err(e) => Decoded::Fatal(GroqError::chat_completion(format!(
            "Malformed stream event: {e}"
        ))),
    }
}

pin_project! {
    /// Chat completion stream.
    ///
    /// Consumption is single-pass: iterate once, forward only. After the
    /// `[DONE]` sentinel, a stream error, or caller drop, no further events
    /// arrive and the connection is released.
    pub struct ChatStream {
        #[pin]
        inner: Pin<Box<dyn Stream<Item = Result<Bytes, TransportError>> + Send>>,
        decoder: SseLineDecoder,
        ready: VecDeque<GroqResult<ChatChunk>>,
        done: bool,
    }
}

impl std::fmt::Debug for ChatStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatStream")
            .field("ready", &self.ready.len())
            .field("done", &self.done)
            .finish_non_exhaustive()
    }
}

impl ChatStream {
    /// Creates a new chat stream from a streaming response.
    ///
    /// Non-200 responses are rejected here; services normalize the error
    /// body before ever constructing a stream.
    pub fn new(response: StreamingResponse) -> GroqResult<Self> {
        if response.status != 200 {
            return Err(GroqError::api(format!(
                "Unexpected status code for stream: {}",
                response.status
            ))
            .with_headers(response.headers));
        }

        Ok(Self {
            inner: response.stream,
            decoder: SseLineDecoder::new(),
            ready: VecDeque::new(),
            done: false,
        })
    }

    /// Collects all chunks into a complete response.
    pub async fn collect(self) -> GroqResult<ChatResponse> {
        use futures::TryStreamExt;

        let chunks: Vec<ChatChunk> = self.try_collect().await?;
        ChatResponse::from_chunks(chunks)
    }

    /// Queues decoded payloads, stopping at the first terminal condition.
    fn enqueue(
        ready: &mut VecDeque<GroqResult<ChatChunk>>,
        done: &mut bool,
        payloads: Vec<String>,
    ) {
        for payload in payloads {
            match decode_payload(&payload) {
                Decoded::Event(chunk) => ready.push_back(Ok(chunk)),
                Decoded::Done => {
                    *done = true;
                    break;
                }
                Decoded::Fatal(err) => {
                    ready.push_back(Err(err));
                    *done = true;
                    break;
                }
            }
        }
    }
}

impl Stream for ChatStream {
    type Item = GroqResult<ChatChunk>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let mut this = self.project();

        loop {
            // Drain events decoded so far before touching the wire again;
            // events queued ahead of an error stay valid partial output.
            if let Some(item) = this.ready.pop_front() {
                return Poll::Ready(Some(item));
            }

            if *this.done {
                return Poll::Ready(None);
            }

            match this.inner.as_mut().poll_next(cx) {
                Poll::Ready(Some(Ok(bytes))) => match this.decoder.feed(&bytes) {
                    Ok(payloads) => Self::enqueue(this.ready, this.done, payloads),
                    Err(e) => {
                        this.ready.push_back(Err(e));
                        *this.done = true;
                    }
                },
                Poll::Ready(Some(Err(e))) => {
                    *this.done = true;
                    return Poll::Ready(Some(Err(e.into())));
                }
                Poll::Ready(None) => {
                    *this.done = true;
                    match this.decoder.flush() {
                        Ok(Some(payload)) => {
                            let mut trailing_done = true;
                            Self::enqueue(this.ready, &mut trailing_done, vec![payload]);
                        }
                        Ok(None) => {}
                        Err(e) => this.ready.push_back(Err(e)),
                    }
                }
                Poll::Pending => return Poll::Pending,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn byte_stream(
        chunks: Vec<&'static str>,
    ) -> Pin<Box<dyn Stream<Item = Result<Bytes, TransportError>> + Send>> {
        Box::pin(futures::stream::iter(
            chunks.into_iter().map(|c| Ok(Bytes::from_static(c.as_bytes()))),
        ))
    }

    fn stream_from(chunks: Vec<&'static str>) -> ChatStream {
        ChatStream::new(StreamingResponse {
            status: 200,
            headers: HashMap::new(),
            stream: byte_stream(chunks),
        })
        .unwrap()
    }

    const CHUNK: &str = r#"{"id":"cmpl-1","object":"chat.completion.chunk","created":1,"model":"m","choices":[{"index":0,"delta":{"content":"hi"}}]}"#;
    const FINAL_CHUNK: &str = r#"{"id":"cmpl-1","object":"chat.completion.chunk","created":1,"model":"m","choices":[{"index":0,"delta":{},"finish_reason":"stop"}]}"#;

    #[test]
    fn decoder_splits_lines_across_chunks() {
        let mut decoder = SseLineDecoder::new();
        assert!(decoder.feed(b"data: {\"a\":").unwrap().is_empty());
        let payloads = decoder.feed(b"1}\n").unwrap();
        assert_eq!(payloads, vec!["{\"a\":1}".to_string()]);
    }

    #[test]
    fn decoder_skips_non_data_lines() {
        let mut decoder = SseLineDecoder::new();
        let payloads = decoder
            .feed(b": keepalive\n\nevent: ping\ndata: {\"a\":1}\n")
            .unwrap();
        assert_eq!(payloads, vec!["{\"a\":1}".to_string()]);
    }

    #[test]
    fn decoder_tolerates_crlf() {
        let mut decoder = SseLineDecoder::new();
        let payloads = decoder.feed(b"data: {\"a\":1}\r\n").unwrap();
        assert_eq!(payloads, vec!["{\"a\":1}".to_string()]);
    }

    #[test]
    fn decoder_flushes_trailing_line() {
        let mut decoder = SseLineDecoder::new();
        assert!(decoder.feed(b"data: [DONE]").unwrap().is_empty());
        assert_eq!(decoder.flush().unwrap(), Some(DONE_SENTINEL.to_string()));
        assert_eq!(decoder.flush().unwrap(), None);
    }

    #[tokio::test]
    async fn stream_yields_chunks_and_stops_at_done() {
        let mut stream = stream_from(vec![
            "data: ",
            CHUNK,
            "\n\ndata: ",
            FINAL_CHUNK,
            "\n\ndata: [DONE]\n\n",
        ]);

        let first = stream.next().await.unwrap().unwrap();
        assert_eq!(first.choices[0].delta.content.as_deref(), Some("hi"));

        let second = stream.next().await.unwrap().unwrap();
        assert!(second.choices[0].finish_reason.is_some());

        // [DONE] terminates without being yielded.
        assert!(stream.next().await.is_none());
        assert!(stream.next().await.is_none());
    }

    #[tokio::test]
    async fn events_after_done_are_ignored() {
        let mut stream = stream_from(vec!["data: [DONE]\n", "data: ", CHUNK, "\n"]);
        assert!(stream.next().await.is_none());
    }

    #[tokio::test]
    async fn error_event_aborts_with_typed_error() {
        let mut stream = stream_from(vec![
            "data: ",
            CHUNK,
            "\ndata: {\"error\":\"boom\"}\ndata: ",
            CHUNK,
            "\n",
        ]);

        // Output yielded before the error remains valid.
        assert!(stream.next().await.unwrap().is_ok());

        let err = stream.next().await.unwrap().unwrap_err();
        assert_eq!(err.kind(), crate::errors::ErrorKind::ChatCompletionError);
        assert_eq!(err.message(), "boom");

        // Nothing after the error, including the well-formed third event.
        assert!(stream.next().await.is_none());
    }

    #[tokio::test]
    async fn error_object_event_uses_its_message() {
        let mut stream =
            stream_from(vec!["data: {\"error\":{\"message\":\"overloaded\"}}\n"]);
        let err = stream.next().await.unwrap().unwrap_err();
        assert_eq!(err.message(), "overloaded");
        assert!(err.response_body().is_some());
    }

    #[tokio::test]
    async fn decode_failure_is_fatal() {
        let mut stream = stream_from(vec!["data: {not json}\ndata: ", CHUNK, "\n"]);
        let err = stream.next().await.unwrap().unwrap_err();
        assert_eq!(err.kind(), crate::errors::ErrorKind::ChatCompletionError);
        assert!(stream.next().await.is_none());
    }

    #[tokio::test]
    async fn trailing_unterminated_line_is_processed() {
        let mut stream = stream_from(vec!["data: ", CHUNK]);
        assert!(stream.next().await.unwrap().is_ok());
        assert!(stream.next().await.is_none());
    }

    #[test]
    fn non_200_response_is_rejected() {
        let result = ChatStream::new(StreamingResponse {
            status: 429,
            headers: HashMap::new(),
            stream: byte_stream(vec![]),
        });
        assert!(result.is_err());
    }
}
