use std::collections::VecDeque;

use super::types::{Chunk, Document};

/// Separator ladder: paragraph, line, word, then a hard character cut.
const SEPARATORS: [&str; 4] = ["\n\n", "\n", " ", ""];

#[derive(Debug, Clone)]
pub struct SplitterConfig {
    /// Maximum chunk length in characters.
    pub chunk_size: usize,
    /// Characters shared between consecutive chunks; must be below `chunk_size`.
    pub chunk_overlap: usize,
}

impl Default for SplitterConfig {
    fn default() -> Self {
        Self {
            chunk_size: 1000,
            chunk_overlap: 200,
        }
    }
}

/// Recursive character splitter.
///
/// Text is split on the coarsest separator present, pieces shorter than
/// `chunk_size` are merged back into windows, and oversized pieces are split
/// again with the next separator down the ladder. When a window is closed, the
/// next one starts with the trailing pieces that fit within `chunk_overlap`.
pub struct TextSplitter {
    config: SplitterConfig,
}

impl TextSplitter {
    #[must_use]
    pub fn new(config: SplitterConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn split(&self, document: &Document) -> Vec<Chunk> {
        self.split_text(&document.content)
            .into_iter()
            .enumerate()
            .map(|(i, text)| Chunk {
                text,
                metadata: document.metadata.clone(),
                chunk_index: i,
            })
            .collect()
    }

    #[must_use]
    pub fn split_text(&self, text: &str) -> Vec<String> {
        if text.trim().is_empty() {
            return Vec::new();
        }
        split_recursive(
            text,
            &SEPARATORS,
            self.config.chunk_size,
            self.config.chunk_overlap,
        )
    }
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}

fn split_on<'a>(text: &'a str, separator: &str) -> Vec<&'a str> {
    if separator.is_empty() {
        text.char_indices()
            .map(|(i, c)| &text[i..i + c.len_utf8()])
            .collect()
    } else {
        text.split(separator).filter(|s| !s.is_empty()).collect()
    }
}

fn split_recursive(
    text: &str,
    separators: &[&str],
    chunk_size: usize,
    chunk_overlap: usize,
) -> Vec<String> {
    let mut separator = separators.last().copied().unwrap_or("");
    let mut finer: &[&str] = &[];
    for (i, sep) in separators.iter().enumerate() {
        if sep.is_empty() {
            separator = sep;
            break;
        }
        if text.contains(sep) {
            separator = sep;
            finer = &separators[i + 1..];
            break;
        }
    }

    let mut chunks = Vec::new();
    let mut fitting: Vec<&str> = Vec::new();

    for piece in split_on(text, separator) {
        if char_len(piece) < chunk_size {
            fitting.push(piece);
            continue;
        }

        if !fitting.is_empty() {
            chunks.extend(merge_pieces(&fitting, separator, chunk_size, chunk_overlap));
            fitting.clear();
        }
        if finer.is_empty() {
            if !piece.trim().is_empty() {
                chunks.push(piece.to_owned());
            }
        } else {
            chunks.extend(split_recursive(piece, finer, chunk_size, chunk_overlap));
        }
    }

    if !fitting.is_empty() {
        chunks.extend(merge_pieces(&fitting, separator, chunk_size, chunk_overlap));
    }

    chunks
}

/// Merge pieces into windows of at most `chunk_size` characters, carrying the
/// trailing pieces (up to `chunk_overlap` characters) into the next window.
fn merge_pieces(
    pieces: &[&str],
    separator: &str,
    chunk_size: usize,
    chunk_overlap: usize,
) -> Vec<String> {
    let sep_len = char_len(separator);
    let mut chunks = Vec::new();
    let mut window: VecDeque<&str> = VecDeque::new();
    let mut total = 0usize;

    for &piece in pieces {
        let len = char_len(piece);

        if !window.is_empty() && total + len + sep_len > chunk_size {
            if let Some(chunk) = join_window(&window, separator) {
                chunks.push(chunk);
            }
            while total > chunk_overlap
                || (total > 0 && total + len + joiner(&window, sep_len) > chunk_size)
            {
                let Some(first) = window.pop_front() else {
                    break;
                };
                total = total.saturating_sub(char_len(first) + joiner(&window, sep_len));
            }
        }

        window.push_back(piece);
        total += len + if window.len() > 1 { sep_len } else { 0 };
    }

    if let Some(chunk) = join_window(&window, separator) {
        chunks.push(chunk);
    }

    chunks
}

fn joiner(window: &VecDeque<&str>, sep_len: usize) -> usize {
    if window.is_empty() {
        0
    } else {
        sep_len
    }
}

fn join_window(window: &VecDeque<&str>, separator: &str) -> Option<String> {
    let joined = window.iter().copied().collect::<Vec<_>>().join(separator);
    let trimmed = joined.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_owned())
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::document::types::DocumentMetadata;

    fn make_doc(content: &str) -> Document {
        Document {
            content: content.to_owned(),
            metadata: DocumentMetadata {
                source: "/course/notes.pdf".to_owned(),
                content_type: "application/pdf".to_owned(),
                extra: HashMap::new(),
            },
        }
    }

    fn splitter(chunk_size: usize, chunk_overlap: usize) -> TextSplitter {
        TextSplitter::new(SplitterConfig {
            chunk_size,
            chunk_overlap,
        })
    }

    #[test]
    fn default_config_matches_course_defaults() {
        let cfg = SplitterConfig::default();
        assert_eq!(cfg.chunk_size, 1000);
        assert_eq!(cfg.chunk_overlap, 200);
    }

    #[test]
    fn empty_document() {
        assert!(splitter(100, 10).split(&make_doc("")).is_empty());
    }

    #[test]
    fn whitespace_only_document() {
        assert!(splitter(100, 10).split(&make_doc(" \n\n\t \n")).is_empty());
    }

    #[test]
    fn small_document_is_one_chunk() {
        let chunks = splitter(1000, 200).split(&make_doc(
            "Photosynthesis converts light into chemical energy.",
        ));
        assert_eq!(chunks.len(), 1);
        assert_eq!(
            chunks[0].text,
            "Photosynthesis converts light into chemical energy."
        );
        assert_eq!(chunks[0].chunk_index, 0);
    }

    #[test]
    fn metadata_preserved() {
        let chunks = splitter(10, 2).split(&make_doc("one two three four five six"));
        assert!(chunks.len() > 1);
        for (i, chunk) in chunks.iter().enumerate() {
            assert_eq!(chunk.source(), "/course/notes.pdf");
            assert_eq!(chunk.chunk_index, i);
        }
    }

    #[test]
    fn prefers_paragraph_boundaries() {
        let text = "Cells are the unit of life.\n\nMitochondria produce ATP.";
        let chunks = splitter(30, 0).split_text(text);
        assert_eq!(
            chunks,
            ["Cells are the unit of life.", "Mitochondria produce ATP."]
        );
    }

    #[test]
    fn words_are_not_truncated() {
        let chunks = splitter(11, 0).split_text("alpha beta gamma delta");
        assert_eq!(chunks, ["alpha beta", "gamma delta"]);
    }

    #[test]
    fn word_overlap_carries_trailing_pieces() {
        let chunks = splitter(11, 5).split_text("alpha beta gamma delta");
        assert_eq!(chunks, ["alpha beta", "beta gamma", "gamma delta"]);
    }

    #[test]
    fn hard_cut_overlaps_exactly() {
        let chunks = splitter(4, 1).split_text("abcdefghij");
        assert_eq!(chunks, ["abcd", "defg", "ghij"]);
    }

    #[test]
    fn hard_cut_without_overlap() {
        let chunks = splitter(4, 0).split_text("abcdefghij");
        assert_eq!(chunks, ["abcd", "efgh", "ij"]);
    }

    #[test]
    fn long_word_inside_paragraph_is_hard_cut() {
        let chunks = splitter(5, 0).split_text("ab\n\nabcdefghij");
        assert_eq!(chunks, ["ab", "abcde", "fghij"]);
    }

    #[test]
    fn multibyte_text_is_measured_in_chars() {
        let chunks = splitter(2, 0).split_text("ééééé");
        assert_eq!(chunks, ["éé", "éé", "é"]);
    }

    #[test]
    fn chunk_size_one_still_makes_progress() {
        let chunks = splitter(1, 0).split_text("abc");
        assert_eq!(chunks, ["a", "b", "c"]);
    }

    mod proptest_splitter {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig::with_cases(500))]

            #[test]
            fn split_never_panics(
                content in "\\PC{0,3000}",
                chunk_size in 1usize..400,
                raw_overlap in 0usize..400,
            ) {
                let s = splitter(chunk_size, raw_overlap % chunk_size);
                let _ = s.split(&make_doc(&content));
            }

            #[test]
            fn chunks_never_exceed_size(
                content in "[a-zé \n.]{0,2000}",
                chunk_size in 1usize..300,
                raw_overlap in 0usize..300,
            ) {
                let s = splitter(chunk_size, raw_overlap % chunk_size);
                for chunk in s.split(&make_doc(&content)) {
                    prop_assert!(chunk.text.chars().count() <= chunk_size);
                    prop_assert!(!chunk.text.trim().is_empty());
                }
            }

            #[test]
            fn chunk_indices_contiguous(
                content in "[a-z. \n]{1,1000}",
                chunk_size in 5usize..100,
            ) {
                let chunks = splitter(chunk_size, chunk_size / 4).split(&make_doc(&content));
                for (i, chunk) in chunks.iter().enumerate() {
                    prop_assert_eq!(chunk.chunk_index, i);
                }
            }

            #[test]
            fn hard_cut_windows_share_exactly_overlap(
                content in "[a-z]{1,400}",
                chunk_size in 2usize..60,
                raw_overlap in 0usize..60,
            ) {
                let overlap = raw_overlap % chunk_size;
                let chunks = splitter(chunk_size, overlap).split_text(&content);
                for pair in chunks.windows(2) {
                    let prev: Vec<char> = pair[0].chars().collect();
                    let next: Vec<char> = pair[1].chars().collect();
                    prop_assert_eq!(&prev[prev.len() - overlap..], &next[..overlap]);
                }
            }

            #[test]
            fn non_blank_text_yields_chunks(
                content in "[a-z]{1,50}[ \n]{0,5}[a-z]{0,50}",
                chunk_size in 1usize..100,
            ) {
                prop_assert!(!splitter(chunk_size, 0).split_text(&content).is_empty());
            }
        }
    }
}
