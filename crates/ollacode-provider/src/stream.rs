//! Streaming response types and the NDJSON decoder for `/api/chat`.

use crate::error::{ProviderError, ProviderResult};
use futures::stream::BoxStream;
use serde::Deserialize;
use tracing::debug;

/// A streamed model reply: text fragments in arrival order.
pub type TextStream = BoxStream<'static, ProviderResult<String>>;

/// One line of a streamed `/api/chat` response.
#[derive(Debug, Default, Deserialize)]
struct ChatChunk {
    #[serde(default)]
    message: Option<ChunkMessage>,
    #[serde(default)]
    done: bool,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct ChunkMessage {
    #[serde(default)]
    content: String,
}

/// Incremental decoder for newline-delimited JSON chat chunks.
///
/// Bytes may arrive split anywhere, including inside a UTF-8 sequence, so
/// the buffer holds raw bytes until a full line is available. Lines that do
/// not decode are skipped.
#[derive(Debug, Default)]
pub struct NdjsonDecoder {
    buffer: Vec<u8>,
    done: bool,
}

impl NdjsonDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a chunk with `done: true` has been seen.
    pub fn is_done(&self) -> bool {
        self.done
    }

    /// Feed raw bytes; returns the text fragments of every completed line.
    pub fn push(&mut self, bytes: &[u8]) -> ProviderResult<Vec<String>> {
        if self.done {
            return Ok(Vec::new());
        }
        self.buffer.extend_from_slice(bytes);

        let mut fragments = Vec::new();
        while let Some(newline) = self.buffer.iter().position(|b| *b == b'\n') {
            let line: Vec<u8> = self.buffer.drain(..=newline).collect();
            self.process_line(&line, &mut fragments)?;
            if self.done {
                self.buffer.clear();
                break;
            }
        }
        Ok(fragments)
    }

    /// Decode whatever is left in the buffer once the byte stream has ended.
    pub fn finish(&mut self) -> ProviderResult<Vec<String>> {
        let mut fragments = Vec::new();
        if !self.done {
            let rest = std::mem::take(&mut self.buffer);
            self.process_line(&rest, &mut fragments)?;
        }
        self.buffer.clear();
        Ok(fragments)
    }

    fn process_line(&mut self, line: &[u8], fragments: &mut Vec<String>) -> ProviderResult<()> {
        let text = String::from_utf8_lossy(line);
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Ok(());
        }

        let chunk: ChatChunk = match serde_json::from_str(trimmed) {
            Ok(chunk) => chunk,
            Err(e) => {
                debug!(error = %e, line = %trimmed, "Skipping undecodable stream line");
                return Ok(());
            }
        };

        if let Some(error) = chunk.error {
            return Err(ProviderError::Stream(error));
        }

        if let Some(message) = chunk.message {
            if !message.content.is_empty() {
                fragments.push(message.content);
            }
        }

        if chunk.done {
            self.done = true;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(content: &str, done: bool) -> String {
        format!(
            "{}\n",
            serde_json::json!({"message": {"role": "assistant", "content": content}, "done": done})
        )
    }

    #[test]
    fn test_decodes_complete_lines_in_order() {
        let mut decoder = NdjsonDecoder::new();
        let input = format!("{}{}", line("Hel", false), line("lo", false));
        assert_eq!(decoder.push(input.as_bytes()).unwrap(), vec!["Hel", "lo"]);
        assert!(!decoder.is_done());
    }

    #[test]
    fn test_line_split_across_pushes() {
        let mut decoder = NdjsonDecoder::new();
        let input = line("split", false);
        let (a, b) = input.as_bytes().split_at(10);
        assert!(decoder.push(a).unwrap().is_empty());
        assert_eq!(decoder.push(b).unwrap(), vec!["split"]);
    }

    #[test]
    fn test_utf8_sequence_split_across_pushes() {
        let mut decoder = NdjsonDecoder::new();
        let input = line("héllo", false);
        let bytes = input.as_bytes();
        let cut = input.find('é').unwrap() + 1;
        assert!(decoder.push(&bytes[..cut]).unwrap().is_empty());
        assert_eq!(decoder.push(&bytes[cut..]).unwrap(), vec!["héllo"]);
    }

    #[test]
    fn test_undecodable_line_is_skipped() {
        let mut decoder = NdjsonDecoder::new();
        let input = format!("not json at all\n{}", line("ok", false));
        assert_eq!(decoder.push(input.as_bytes()).unwrap(), vec!["ok"]);
    }

    #[test]
    fn test_stops_at_done() {
        let mut decoder = NdjsonDecoder::new();
        let input = format!("{}{}{}", line("a", false), line("", true), line("late", false));
        assert_eq!(decoder.push(input.as_bytes()).unwrap(), vec!["a"]);
        assert!(decoder.is_done());
        assert!(decoder.push(line("later", false).as_bytes()).unwrap().is_empty());
    }

    #[test]
    fn test_finish_decodes_unterminated_tail() {
        let mut decoder = NdjsonDecoder::new();
        let input = line("tail", true);
        decoder.push(input.trim_end().as_bytes()).unwrap();
        assert_eq!(decoder.finish().unwrap(), vec!["tail"]);
    }

    #[test]
    fn test_error_object_surfaces() {
        let mut decoder = NdjsonDecoder::new();
        let err = decoder
            .push(b"{\"error\":\"model runner crashed\"}\n")
            .unwrap_err();
        assert!(matches!(err, ProviderError::Stream(ref m) if m == "model runner crashed"));
    }
}
