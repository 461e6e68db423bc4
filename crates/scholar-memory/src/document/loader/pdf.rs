use std::collections::HashMap;
use std::path::Path;
use std::pin::Pin;

use super::super::{
    DEFAULT_MAX_FILE_SIZE, Document, DocumentError, DocumentLoader, DocumentMetadata, PAGE_KEY,
};
use super::resolve_within_limit;

/// Extracts the text layer of a PDF, one document per page.
///
/// Every page document shares the file's canonical path as its source and
/// records its page number under [`PAGE_KEY`]. Pages without a text layer
/// load as empty documents and produce no chunks downstream.
pub struct PdfLoader {
    pub max_file_size: u64,
}

impl Default for PdfLoader {
    fn default() -> Self {
        Self {
            max_file_size: DEFAULT_MAX_FILE_SIZE,
        }
    }
}

impl DocumentLoader for PdfLoader {
    fn load(
        &self,
        path: &Path,
    ) -> Pin<Box<dyn std::future::Future<Output = Result<Vec<Document>, DocumentError>> + Send + '_>>
    {
        let path = path.to_path_buf();
        Box::pin(async move {
            let path = resolve_within_limit(&path, self.max_file_size).await?;
            let source = path.display().to_string();

            let pages = tokio::task::spawn_blocking(move || {
                pdf_extract::extract_text_by_pages(&path)
                    .map_err(|e| DocumentError::Pdf(e.to_string()))
            })
            .await
            .map_err(|e| DocumentError::Io(std::io::Error::other(e)))??;

            tracing::debug!(%source, pages = pages.len(), "extracted pdf text");
            Ok(pages
                .into_iter()
                .enumerate()
                .map(|(i, content)| Document {
                    content,
                    metadata: DocumentMetadata {
                        source: source.clone(),
                        content_type: "application/pdf".to_owned(),
                        extra: HashMap::from([(PAGE_KEY.to_owned(), (i + 1).to_string())]),
                    },
                })
                .collect())
        })
    }

    fn supported_extensions(&self) -> &[&str] {
        &["pdf"]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{write_pdf, write_pdf_pages};

    #[tokio::test]
    async fn extracts_text_layer() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("biology.pdf");
        write_pdf(&file, "Photosynthesis converts light into chemical energy.").unwrap();

        let docs = PdfLoader::default().load(&file).await.unwrap();
        assert_eq!(docs.len(), 1);
        assert!(docs[0].content.contains("Photosynthesis"));
        assert_eq!(docs[0].metadata.content_type, "application/pdf");
        assert_eq!(docs[0].metadata.extra[PAGE_KEY], "1");
        let canonical = std::fs::canonicalize(&file).unwrap();
        assert_eq!(docs[0].metadata.source, canonical.display().to_string());
    }

    #[tokio::test]
    async fn each_page_is_its_own_document() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("lecture.pdf");
        write_pdf_pages(&file, &["Mitosis overview", "Meiosis overview"]).unwrap();

        let docs = PdfLoader::default().load(&file).await.unwrap();
        assert_eq!(docs.len(), 2);
        assert!(docs[0].content.contains("Mitosis"));
        assert!(docs[1].content.contains("Meiosis"));
        assert_eq!(docs[0].metadata.extra[PAGE_KEY], "1");
        assert_eq!(docs[1].metadata.extra[PAGE_KEY], "2");
        assert_eq!(docs[0].metadata.source, docs[1].metadata.source);
    }

    #[tokio::test]
    async fn corrupt_pdf_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("broken.pdf");
        std::fs::write(&file, b"not a pdf").unwrap();

        let err = PdfLoader::default().load(&file).await.unwrap_err();
        assert!(matches!(err, DocumentError::Pdf(_)));
        assert!(err.to_string().starts_with("could not extract PDF text"));
    }

    #[tokio::test]
    async fn file_too_large_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("big.pdf");
        std::fs::write(&file, b"%PDF-1.5").unwrap();

        let loader = PdfLoader { max_file_size: 1 };
        let result = loader.load(&file).await;
        assert!(matches!(
            result,
            Err(DocumentError::FileTooLarge { size: 8, limit: 1 })
        ));
    }
}
