use std::collections::HashMap;
use std::path::Path;
use std::pin::Pin;

use super::super::{
    DEFAULT_MAX_FILE_SIZE, Document, DocumentError, DocumentLoader, DocumentMetadata,
};
use super::resolve_within_limit;

/// Course notes in plain text or markdown, one document per file.
///
/// Content is decoded as UTF-8 with any byte-order mark dropped, and CRLF
/// line endings become LF so the splitter sees paragraph breaks.
pub struct TextLoader {
    pub max_file_size: u64,
}

impl Default for TextLoader {
    fn default() -> Self {
        Self {
            max_file_size: DEFAULT_MAX_FILE_SIZE,
        }
    }
}

fn content_type_for(path: &Path) -> &'static str {
    let is_markdown = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("md") || e.eq_ignore_ascii_case("markdown"));
    if is_markdown {
        "text/markdown"
    } else {
        "text/plain"
    }
}

fn decode_notes(bytes: Vec<u8>) -> Result<String, DocumentError> {
    let text = String::from_utf8(bytes).map_err(|_| DocumentError::NotUtf8)?;
    let text = text.strip_prefix('\u{feff}').unwrap_or(&text);
    Ok(text.replace("\r\n", "\n"))
}

impl DocumentLoader for TextLoader {
    fn load(
        &self,
        path: &Path,
    ) -> Pin<Box<dyn std::future::Future<Output = Result<Vec<Document>, DocumentError>> + Send + '_>>
    {
        let path = path.to_path_buf();
        Box::pin(async move {
            let path = resolve_within_limit(&path, self.max_file_size).await?;
            let content = decode_notes(tokio::fs::read(&path).await?)?;

            Ok(vec![Document {
                content,
                metadata: DocumentMetadata {
                    content_type: content_type_for(&path).to_owned(),
                    source: path.display().to_string(),
                    extra: HashMap::new(),
                },
            }])
        })
    }

    fn supported_extensions(&self) -> &[&str] {
        &["txt", "md", "markdown"]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn load_one(name: &str, bytes: &[u8]) -> Result<Document, DocumentError> {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join(name);
        std::fs::write(&file, bytes).unwrap();
        let mut docs = TextLoader::default().load(&file).await?;
        assert_eq!(docs.len(), 1);
        Ok(docs.remove(0))
    }

    #[tokio::test]
    async fn plain_notes_keep_their_text() {
        let doc = load_one("lecture.txt", b"osmosis is diffusion of water")
            .await
            .unwrap();
        assert_eq!(doc.content, "osmosis is diffusion of water");
        assert_eq!(doc.metadata.content_type, "text/plain");
        assert!(doc.metadata.extra.is_empty());
    }

    #[tokio::test]
    async fn markdown_extension_is_case_insensitive() {
        let doc = load_one("Syllabus.MD", b"# Week 1").await.unwrap();
        assert_eq!(doc.metadata.content_type, "text/markdown");
    }

    #[tokio::test]
    async fn byte_order_mark_is_dropped() {
        let doc = load_one("notes.txt", b"\xEF\xBB\xBFMeiosis halves the chromosome count")
            .await
            .unwrap();
        assert_eq!(doc.content, "Meiosis halves the chromosome count");
    }

    #[tokio::test]
    async fn windows_line_endings_become_paragraph_breaks() {
        let doc = load_one("notes.txt", b"Week 1\r\n\r\nCell theory\r\n")
            .await
            .unwrap();
        assert_eq!(doc.content, "Week 1\n\nCell theory\n");
    }

    #[tokio::test]
    async fn invalid_utf8_is_reported() {
        let err = load_one("notes.txt", b"caf\xE9").await.unwrap_err();
        assert!(matches!(err, DocumentError::NotUtf8));
        assert_eq!(err.to_string(), "file is not valid UTF-8 text");
    }

    #[tokio::test]
    async fn missing_file_is_an_io_error() {
        let result = TextLoader::default()
            .load(Path::new("/nonexistent/file.txt"))
            .await;
        assert!(matches!(result, Err(DocumentError::Io(_))));
    }

    #[tokio::test]
    async fn source_is_the_canonical_path() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("week1")).unwrap();
        std::fs::write(dir.path().join("notes.txt"), "data").unwrap();

        let docs = TextLoader::default()
            .load(&dir.path().join("week1/../notes.txt"))
            .await
            .unwrap();
        let canonical = std::fs::canonicalize(dir.path().join("notes.txt")).unwrap();
        assert_eq!(docs[0].metadata.source, canonical.display().to_string());
    }

    #[tokio::test]
    async fn size_limit_reports_size_and_limit() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("big.txt");
        std::fs::write(&file, "xy").unwrap();

        let err = TextLoader { max_file_size: 1 }.load(&file).await.unwrap_err();
        assert!(matches!(err, DocumentError::FileTooLarge { size: 2, limit: 1 }));
        assert_eq!(err.to_string(), "file is 2 bytes, over the 1 byte limit");
    }
}
