//! Incremental byte-to-line decoding.
//!
//! Transport chunks arrive with boundaries unrelated to the text they carry:
//! a chunk may end in the middle of a line or in the middle of a UTF-8
//! sequence. [`StreamDecoder`] keeps both kinds of leftovers between calls.

/// Turns arbitrary byte chunks into complete `'\n'`-terminated lines.
///
/// Decoding is non-fatal: an invalid UTF-8 sequence becomes U+FFFD. Text
/// after the last newline is held back until more bytes arrive, and is
/// dropped by [`StreamDecoder::finish`] if the stream ends first.
#[derive(Debug, Default)]
pub struct StreamDecoder {
    /// Trailing bytes of an incomplete UTF-8 sequence (at most 3)
    pending: Vec<u8>,
    /// Decoded text after the last newline seen
    buffer: String,
}

impl StreamDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode `chunk` and return every line it completes, without the newline.
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<String> {
        self.decode(chunk);

        let Some(last_newline) = self.buffer.rfind('\n') else {
            return Vec::new();
        };
        let rest = self.buffer.split_off(last_newline + 1);
        let complete = std::mem::replace(&mut self.buffer, rest);
        complete[..last_newline].split('\n').map(str::to_owned).collect()
    }

    /// Text received after the last newline.
    pub fn buffered(&self) -> &str {
        &self.buffer
    }

    /// End the stream. Unterminated text is discarded, never emitted.
    ///
    /// Returns the number of bytes thrown away.
    pub fn finish(self) -> usize {
        let discarded = self.buffer.len() + self.pending.len();
        if discarded > 0 {
            tracing::debug!(discarded, "Dropping unterminated line at end of stream");
        }
        discarded
    }

    fn decode(&mut self, chunk: &[u8]) {
        let joined;
        let mut input: &[u8] = if self.pending.is_empty() {
            chunk
        } else {
            self.pending.extend_from_slice(chunk);
            joined = std::mem::take(&mut self.pending);
            &joined
        };

        loop {
            match std::str::from_utf8(input) {
                Ok(text) => {
                    self.buffer.push_str(text);
                    return;
                }
                Err(err) => {
                    let valid = err.valid_up_to();
                    self.buffer
                        .push_str(&String::from_utf8_lossy(&input[..valid]));
                    match err.error_len() {
                        Some(invalid) => {
                            self.buffer.push(char::REPLACEMENT_CHARACTER);
                            input = &input[valid + invalid..];
                        }
                        None => {
                            // Sequence cut by the chunk boundary; wait for the rest.
                            self.pending = input[valid..].to_vec();
                            return;
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode_all(chunks: &[&[u8]]) -> (Vec<String>, usize) {
        let mut decoder = StreamDecoder::new();
        let mut lines = Vec::new();
        for chunk in chunks {
            lines.extend(decoder.feed(chunk));
        }
        (lines, decoder.finish())
    }

    #[test]
    fn test_single_chunk_multiple_lines() {
        let (lines, discarded) = decode_all(&[b"one\ntwo\n\nthree\n"]);
        assert_eq!(lines, vec!["one", "two", "", "three"]);
        assert_eq!(discarded, 0);
    }

    #[test]
    fn test_line_split_across_chunks() {
        let mut decoder = StreamDecoder::new();
        assert!(decoder.feed(b"data: {\"st").is_empty());
        assert_eq!(decoder.buffered(), "data: {\"st");
        assert_eq!(decoder.feed(b"ep\":1}\nnext"), vec!["data: {\"step\":1}"]);
        assert_eq!(decoder.buffered(), "next");
    }

    #[test]
    fn test_multibyte_char_split_across_chunks() {
        let text = "café ✓\n".as_bytes();
        // Split inside the 3-byte check mark.
        let cut = text.len() - 2;
        let (lines, _) = decode_all(&[&text[..cut], &text[cut..]]);
        assert_eq!(lines, vec!["café ✓"]);
    }

    #[test]
    fn test_multibyte_char_split_byte_by_byte() {
        let text = "→é🙂\n".as_bytes();
        let chunks: Vec<&[u8]> = text.chunks(1).collect();
        let (lines, _) = decode_all(&chunks);
        assert_eq!(lines, vec!["→é🙂"]);
    }

    #[test]
    fn test_unterminated_tail_is_discarded() {
        let (lines, discarded) = decode_all(&[b"complete\npartial"]);
        assert_eq!(lines, vec!["complete"]);
        assert_eq!(discarded, "partial".len());
    }

    #[test]
    fn test_incomplete_utf8_at_eof_is_discarded() {
        let (lines, discarded) = decode_all(&[b"ok\n", &[0xE2, 0x9C]]);
        assert_eq!(lines, vec!["ok"]);
        assert_eq!(discarded, 2);
    }

    #[test]
    fn test_invalid_utf8_is_replaced() {
        let (lines, _) = decode_all(&[b"a\xFFb\n"]);
        assert_eq!(lines, vec!["a\u{FFFD}b"]);
    }

    #[test]
    fn test_carriage_return_is_kept() {
        let (lines, _) = decode_all(&[b"data: x\r\n"]);
        assert_eq!(lines, vec!["data: x\r"]);
    }

    #[test]
    fn test_empty_chunks() {
        let (lines, discarded) = decode_all(&[b"", b"a", b"", b"\n", b""]);
        assert_eq!(lines, vec!["a"]);
        assert_eq!(discarded, 0);
    }

    /// Every two-way and three-way split of the input yields the same lines.
    #[test]
    fn test_chunk_invariance() {
        let text = "data: {\"step\":\"converting\",\"message\":\"Conversión ✓\"}\n\n: ping\ndata: {\"step\":\"done\"}\ntrailing é".as_bytes();
        let (expected, _) = decode_all(&[text]);
        assert_eq!(expected.len(), 4);

        for i in 0..=text.len() {
            let (lines, _) = decode_all(&[&text[..i], &text[i..]]);
            assert_eq!(lines, expected, "split at {}", i);
        }

        for i in (0..=text.len()).step_by(3) {
            for j in (i..=text.len()).step_by(5) {
                let (lines, _) = decode_all(&[&text[..i], &text[i..j], &text[j..]]);
                assert_eq!(lines, expected, "split at {} and {}", i, j);
            }
        }
    }
}
