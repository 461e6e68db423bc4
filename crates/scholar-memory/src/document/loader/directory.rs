use std::path::{Path, PathBuf};

#[cfg(feature = "pdf")]
use super::PdfLoader;
use super::TextLoader;
use crate::document::{DEFAULT_MAX_FILE_SIZE, Document, DocumentError, DocumentLoader};

#[derive(Debug, Clone)]
pub struct SkippedFile {
    pub path: PathBuf,
    pub reason: String,
}

/// Outcome of a directory scan.
#[derive(Debug, Clone, Default)]
pub struct LoadReport {
    /// Files matching the extension filter.
    pub files_seen: usize,
    pub documents_loaded: usize,
    pub skipped: Vec<SkippedFile>,
}

/// Recursively loads every supported file under a directory.
///
/// Files are visited in sorted path order. A file that fails to load is logged,
/// recorded in the [`LoadReport`] and skipped; the scan continues.
pub struct DirectoryLoader {
    extensions: Vec<String>,
    max_file_size: u64,
}

impl DirectoryLoader {
    #[must_use]
    pub fn new<I, S>(extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            extensions: extensions
                .into_iter()
                .map(|e| e.as_ref().trim_start_matches('.').to_lowercase())
                .collect(),
            max_file_size: DEFAULT_MAX_FILE_SIZE,
        }
    }

    #[must_use]
    pub fn with_max_file_size(mut self, max_file_size: u64) -> Self {
        self.max_file_size = max_file_size;
        self
    }

    /// Paths under `root` whose extension is in the filter, sorted.
    ///
    /// Hidden files and directories are skipped. `.gitignore`, `.ignore` and
    /// similar files are not consulted.
    ///
    /// # Errors
    ///
    /// Returns an error if `root` is missing or not a directory.
    pub fn discover(&self, root: &Path) -> Result<Vec<PathBuf>, DocumentError> {
        if !root.is_dir() {
            return Err(DocumentError::SourceDirMissing(root.to_path_buf()));
        }

        // ignore files in or above the course folder must not hide material;
        // only dotfiles are skipped
        let mut paths: Vec<PathBuf> = ignore::WalkBuilder::new(root)
            .standard_filters(false)
            .hidden(true)
            .build()
            .flatten()
            .filter(|e| e.file_type().is_some_and(|ft| ft.is_file()))
            .map(ignore::DirEntry::into_path)
            .filter(|p| self.accepts(p))
            .collect();
        paths.sort();
        Ok(paths)
    }

    /// Load every discovered file.
    ///
    /// # Errors
    ///
    /// Returns an error only if `root` cannot be scanned; per-file failures are
    /// reported in [`LoadReport::skipped`].
    pub async fn load_all(
        &self,
        root: &Path,
    ) -> Result<(Vec<Document>, LoadReport), DocumentError> {
        let paths = self.discover(root)?;
        let mut report = LoadReport {
            files_seen: paths.len(),
            ..LoadReport::default()
        };
        let mut documents = Vec::new();

        for path in paths {
            match self.load_file(&path).await {
                Ok(docs) => {
                    report.documents_loaded += docs.len();
                    documents.extend(docs);
                }
                Err(e) => {
                    tracing::warn!(path = %path.display(), "skipping file: {e}");
                    report.skipped.push(SkippedFile {
                        path,
                        reason: e.to_string(),
                    });
                }
            }
        }

        tracing::info!(
            documents = report.documents_loaded,
            skipped = report.skipped.len(),
            "loaded {} documents from {}",
            report.documents_loaded,
            root.display()
        );
        Ok((documents, report))
    }

    fn loaders(&self) -> Vec<Box<dyn DocumentLoader>> {
        let mut loaders: Vec<Box<dyn DocumentLoader>> = Vec::new();
        #[cfg(feature = "pdf")]
        loaders.push(Box::new(PdfLoader {
            max_file_size: self.max_file_size,
        }));
        loaders.push(Box::new(TextLoader {
            max_file_size: self.max_file_size,
        }));
        loaders
    }

    async fn load_file(&self, path: &Path) -> Result<Vec<Document>, DocumentError> {
        let ext = extension_of(path);
        let loader = self
            .loaders()
            .into_iter()
            .find(|l| l.supported_extensions().contains(&ext.as_str()))
            .ok_or_else(|| DocumentError::UnsupportedFormat(ext.clone()))?;
        loader.load(path).await
    }

    fn accepts(&self, path: &Path) -> bool {
        let ext = extension_of(path);
        !ext.is_empty() && self.extensions.iter().any(|e| *e == ext)
    }
}

fn extension_of(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
        .unwrap_or_default()
}
