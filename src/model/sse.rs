//! SSE frame decoder: raw response bytes → JSON payloads.
//!
//! Frames are split on blank lines; within a frame only `data:` lines carry
//! payload (`event:` lines and `:` comments are framing). The `[DONE]`
//! sentinel ends the stream.

use bytes::Bytes;
use futures::{stream, Stream, StreamExt};
use serde_json::Value;

use crate::error::Error;
use crate::BoxStream;

const FRAME_DELIMITER: &[u8] = b"\n\n";
const DONE_SIGNAL: &str = "[DONE]";

/// Decode an SSE byte stream into JSON values, one per data frame.
///
/// Buffering and frame splitting happen on raw bytes; text is decoded one
/// whole frame at a time, so a multi-byte character split across network
/// chunks survives intact.
pub fn frames<S>(input: S) -> BoxStream<'static, Value>
where
    S: Stream<Item = reqwest::Result<Bytes>> + Send + 'static,
{
    let stream = stream::unfold(
        (Box::pin(input), Vec::<u8>::new(), false),
        |(mut input, mut buf, mut eof)| async move {
            loop {
                if let Some(idx) = find_delimiter(&buf) {
                    let frame = String::from_utf8_lossy(&buf[..idx]).into_owned();
                    buf.drain(..idx + FRAME_DELIMITER.len());
                    match parse_frame(&frame) {
                        FrameData::Payload(v) => return Some((Ok(v), (input, buf, eof))),
                        FrameData::Done => return None,
                        FrameData::Empty => continue,
                    }
                }

                if eof {
                    // Trailing bytes without a final delimiter.
                    let rest = std::mem::take(&mut buf);
                    let frame = String::from_utf8_lossy(&rest).into_owned();
                    return match parse_frame(&frame) {
                        FrameData::Payload(v) => Some((Ok(v), (input, buf, eof))),
                        _ => None,
                    };
                }

                match input.next().await {
                    Some(Ok(bytes)) => buf.extend_from_slice(&bytes),
                    Some(Err(e)) => {
                        let err = Error::model(format!("stream transport error: {e}"));
                        return Some((Err(err), (input, buf, eof)));
                    }
                    None => eof = true,
                }
            }
        },
    );

    Box::pin(stream)
}

fn find_delimiter(buf: &[u8]) -> Option<usize> {
    buf.windows(FRAME_DELIMITER.len())
        .position(|w| w == FRAME_DELIMITER)
}

enum FrameData {
    Payload(Value),
    Done,
    Empty,
}

fn parse_frame(frame: &str) -> FrameData {
    let mut data = String::new();
    for line in frame.lines() {
        let line = line.trim_start();
        if line.starts_with(':') {
            continue;
        }
        if let Some(rest) = line.strip_prefix("data:") {
            if !data.is_empty() {
                data.push('\n');
            }
            data.push_str(rest.trim_start());
        }
    }

    let data = data.trim();
    if data.is_empty() {
        return FrameData::Empty;
    }
    if data == DONE_SIGNAL {
        return FrameData::Done;
    }
    match serde_json::from_str(data) {
        Ok(v) => FrameData::Payload(v),
        Err(_) => FrameData::Empty,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::stream;

    fn byte_stream(parts: Vec<&'static str>) -> impl Stream<Item = reqwest::Result<Bytes>> {
        stream::iter(parts.into_iter().map(|p| Ok(Bytes::from(p))))
    }

    #[tokio::test]
    async fn decodes_frames_split_across_chunks() {
        let input = byte_stream(vec![
            "event: content_block_delta\ndata: {\"a\"",
            ":1}\n\ndata: {\"b\":2}\n\n",
        ]);
        let values: Vec<_> = frames(input).collect::<Vec<_>>().await;
        assert_eq!(values.len(), 2);
        assert_eq!(values[0].as_ref().unwrap()["a"], 1);
        assert_eq!(values[1].as_ref().unwrap()["b"], 2);
    }

    #[tokio::test]
    async fn done_sentinel_ends_stream() {
        let input = byte_stream(vec!["data: {\"a\":1}\n\ndata: [DONE]\n\ndata: {\"b\":2}\n\n"]);
        let values: Vec<_> = frames(input).collect::<Vec<_>>().await;
        assert_eq!(values.len(), 1);
    }

    #[tokio::test]
    async fn multibyte_character_split_across_chunks_survives() {
        let body = "data: {\"t\":\"na\u{ef}ve \u{1f600}\"}\n\n".as_bytes();
        // Cut inside the emoji's four-byte encoding.
        let cut = body.len() - 6;
        let input = stream::iter(vec![
            reqwest::Result::Ok(Bytes::copy_from_slice(&body[..cut])),
            Ok(Bytes::copy_from_slice(&body[cut..])),
        ]);
        let values: Vec<_> = frames(input).collect::<Vec<_>>().await;
        assert_eq!(values.len(), 1);
        assert_eq!(values[0].as_ref().unwrap()["t"], "na\u{ef}ve \u{1f600}");
    }

    #[tokio::test]
    async fn comments_and_event_lines_are_framing_only() {
        let input = byte_stream(vec![": keepalive\n\nevent: ping\ndata: {\"ok\":true}\n\n"]);
        let values: Vec<_> = frames(input).collect::<Vec<_>>().await;
        assert_eq!(values.len(), 1);
        assert_eq!(values[0].as_ref().unwrap()["ok"], true);
    }
}
