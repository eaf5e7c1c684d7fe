//! Chunker — recursive character splitting with overlap.
//!
//! Splits text into segments of at most `chunk_size` characters with
//! `chunk_overlap` characters of overlap between neighbors, preferring to
//! break at paragraph, then line, then sentence, then word boundaries
//! before falling back to a hard character cut. Stateless and
//! deterministic: the same input always yields the same chunk sequence.

/// Default chunk size in characters.
pub const CHUNK_SIZE: usize = 1000;
/// Default overlap between neighboring chunks in characters.
pub const CHUNK_OVERLAP: usize = 200;

/// Boundary preference order. The empty separator is the hard-cut fallback.
const SEPARATORS: [&str; 5] = ["\n\n", "\n", ". ", " ", ""];

pub struct RecursiveCharacterSplitter {
    chunk_size: usize,
    chunk_overlap: usize,
}

impl Default for RecursiveCharacterSplitter {
    fn default() -> Self {
        Self::new(CHUNK_SIZE, CHUNK_OVERLAP)
    }
}

impl RecursiveCharacterSplitter {
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Self {
        Self {
            chunk_size,
            chunk_overlap,
        }
    }

    /// Splits `text` into ordered, overlapping chunks.
    pub fn split(&self, text: &str) -> Vec<String> {
        let text = text.trim();
        if text.is_empty() {
            return Vec::new();
        }
        self.split_with(text, &SEPARATORS)
    }

    fn split_with(&self, text: &str, separators: &[&str]) -> Vec<String> {
        let (separator, rest) = match separators.split_first() {
            Some((s, rest)) => (*s, rest),
            None => return vec![text.to_string()],
        };

        if separator.is_empty() {
            return self.hard_cut(text);
        }

        let mut chunks = Vec::new();
        let mut pending: Vec<String> = Vec::new();

        for piece in split_keep_separator(text, separator) {
            if char_len(&piece) <= self.chunk_size {
                pending.push(piece);
            } else {
                if !pending.is_empty() {
                    chunks.extend(self.merge(&pending));
                    pending.clear();
                }
                // Piece too large for one chunk: recurse with finer boundaries.
                chunks.extend(self.split_with(&piece, rest));
            }
        }
        if !pending.is_empty() {
            chunks.extend(self.merge(&pending));
        }

        chunks
    }

    /// Greedily packs pieces into chunks of at most `chunk_size` characters,
    /// carrying a trailing window of at most `chunk_overlap` characters into
    /// the next chunk.
    fn merge(&self, pieces: &[String]) -> Vec<String> {
        let mut out = Vec::new();
        let mut window: Vec<&String> = Vec::new();
        let mut total = 0usize;

        for piece in pieces {
            let len = char_len(piece);
            if total + len > self.chunk_size && !window.is_empty() {
                push_joined(&mut out, &window);
                while total > self.chunk_overlap
                    || (total + len > self.chunk_size && total > 0)
                {
                    total -= char_len(window.remove(0));
                }
            }
            window.push(piece);
            total += len;
        }
        push_joined(&mut out, &window);

        out
    }

    /// Fixed-size sliding window over characters; last resort when no
    /// separator produces pieces small enough.
    fn hard_cut(&self, text: &str) -> Vec<String> {
        let chars: Vec<char> = text.chars().collect();
        let step = if self.chunk_size > self.chunk_overlap {
            self.chunk_size - self.chunk_overlap
        } else {
            self.chunk_size
        };

        let mut chunks = Vec::new();
        let mut offset = 0;
        while offset < chars.len() {
            let end = (offset + self.chunk_size).min(chars.len());
            chunks.push(chars[offset..end].iter().collect());
            if end == chars.len() {
                break;
            }
            offset += step;
        }
        chunks
    }
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// Splits on `sep`, keeping the separator attached to the preceding piece so
/// that rejoining pieces reproduces the original text.
fn split_keep_separator(text: &str, sep: &str) -> Vec<String> {
    let mut out = Vec::new();
    let mut rest = text;
    while let Some(idx) = rest.find(sep) {
        let end = idx + sep.len();
        out.push(rest[..end].to_string());
        rest = &rest[end..];
    }
    if !rest.is_empty() {
        out.push(rest.to_string());
    }
    out
}

fn push_joined(out: &mut Vec<String>, window: &[&String]) {
    let joined: String = window.iter().map(|s| s.as_str()).collect();
    let joined = joined.trim();
    if !joined.is_empty() {
        out.push(joined.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input_yields_no_chunks() {
        let splitter = RecursiveCharacterSplitter::default();
        assert!(splitter.split("").is_empty());
        assert!(splitter.split("   \n\n  ").is_empty());
    }

    #[test]
    fn test_short_input_is_single_chunk() {
        let splitter = RecursiveCharacterSplitter::default();
        let chunks = splitter.split("  A short resume.  ");
        assert_eq!(chunks, vec!["A short resume.".to_string()]);
    }

    #[test]
    fn test_chunks_respect_size_bound() {
        let splitter = RecursiveCharacterSplitter::default();
        let text = "Experience with distributed systems. ".repeat(200);
        let chunks = splitter.split(&text);
        assert!(chunks.len() > 1);
        for chunk in &chunks {
            assert!(chunk.chars().count() <= CHUNK_SIZE);
        }
    }

    #[test]
    fn test_splitting_is_deterministic() {
        let splitter = RecursiveCharacterSplitter::default();
        let text = "Led a platform team.\n\nShipped a search service. ".repeat(100);
        assert_eq!(splitter.split(&text), splitter.split(&text));
    }

    #[test]
    fn test_prefers_paragraph_boundaries() {
        let para1 = "a".repeat(80);
        let para2 = "b".repeat(80);
        let text = format!("{para1}\n\n{para2}");
        let splitter = RecursiveCharacterSplitter::new(100, 0);
        let chunks = splitter.split(&text);
        assert_eq!(chunks, vec![para1, para2]);
    }

    #[test]
    fn test_hard_cut_when_no_separators_present() {
        let splitter = RecursiveCharacterSplitter::new(10, 2);
        let chunks = splitter.split("abcdefghijklmnopqrstuvwxyz");
        assert_eq!(chunks, vec!["abcdefghij", "ijklmnopqr", "qrstuvwxyz"]);
    }

    #[test]
    fn test_neighboring_chunks_overlap() {
        let words: Vec<String> = (0..40).map(|i| format!("w{i:02}")).collect();
        let text = words.join(" ");
        let splitter = RecursiveCharacterSplitter::new(40, 12);
        let chunks = splitter.split(&text);
        assert!(chunks.len() > 1);
        for pair in chunks.windows(2) {
            let last_word = pair[0].split_whitespace().last().unwrap();
            assert!(
                pair[1].contains(last_word),
                "chunk {:?} does not overlap {:?}",
                pair[1],
                pair[0]
            );
        }
    }

    #[test]
    fn test_every_word_survives_chunking() {
        let words: Vec<String> = (0..100).map(|i| format!("token{i}")).collect();
        let text = words.join(" ");
        let splitter = RecursiveCharacterSplitter::new(50, 10);
        let chunks = splitter.split(&text);
        for word in &words {
            assert!(
                chunks.iter().any(|c| c.contains(word)),
                "{word} missing from all chunks"
            );
        }
    }
}
