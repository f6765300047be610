use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

// @module: File and directory utilities

/// Leading bytes of every ZIP-based Office document
const ZIP_MAGIC: &[u8] = b"PK\x03\x04";

/// Enum representing the document kinds the pipeline accepts
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum DocumentKind {
    /// Word document (.docx)
    Docx,
    /// Plain text file
    Text,
    /// Unknown file type
    Unknown,
}

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @checks: File existence
    pub fn file_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_file()
    }

    // @checks: Directory existence
    pub fn dir_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_dir()
    }

    // @creates: Directory and parents if needed
    pub fn ensure_dir<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        if !path.exists() {
            fs::create_dir_all(path)?;
        }
        Ok(())
    }

    // @generates: Output path for a translated document
    // @params: input_file, target_language
    pub fn generate_output_path<P: AsRef<Path>>(input_file: P, target_language: &str) -> PathBuf {
        let input_file = input_file.as_ref();

        let stem = input_file.file_stem().unwrap_or_default();
        let extension = input_file
            .extension()
            .map(|ext| ext.to_string_lossy().to_string())
            .unwrap_or_else(|| "txt".to_string());

        let mut output_filename = stem.to_string_lossy().to_string();
        output_filename.push('.');
        output_filename.push_str(target_language);
        output_filename.push('.');
        output_filename.push_str(&extension);

        match input_file.parent() {
            Some(parent) => parent.join(output_filename),
            None => PathBuf::from(output_filename),
        }
    }

    /// Find files with a specific extension in a directory
    pub fn find_files<P: AsRef<Path>>(dir: P, extension: &str) -> Result<Vec<PathBuf>> {
        let mut result = Vec::new();
        let normalized_ext = extension.trim_start_matches('.');

        for entry in WalkDir::new(dir.as_ref()).follow_links(true) {
            let entry = entry.context("Failed to read directory entry")?;
            let path = entry.path();

            if path.is_file() {
                if let Some(ext) = path.extension() {
                    if ext.to_string_lossy().eq_ignore_ascii_case(normalized_ext) {
                        result.push(path.to_path_buf());
                    }
                }
            }
        }

        Ok(result)
    }

    /// Read a file to a string
    pub fn read_to_string<P: AsRef<Path>>(path: P) -> Result<String> {
        fs::read_to_string(&path)
            .with_context(|| format!("Failed to read file: {:?}", path.as_ref()))
    }

    /// Write a string to a file
    pub fn write_to_file<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
        // Ensure the parent directory exists
        if let Some(parent) = path.as_ref().parent() {
            Self::ensure_dir(parent)?;
        }

        fs::write(&path, content)
            .with_context(|| format!("Failed to write to file: {:?}", path.as_ref()))?;

        Ok(())
    }

    /// Detect whether a file is a Word document or plain text.
    ///
    /// Extension wins; extensionless files are sniffed by content
    /// (ZIP magic containing a Word body, otherwise valid UTF-8 text).
    pub fn detect_document_kind<P: AsRef<Path>>(path: P) -> Result<DocumentKind> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(anyhow::anyhow!("File does not exist: {:?}", path));
        }

        if let Some(ext) = path.extension() {
            let ext_str = ext.to_string_lossy().to_lowercase();

            if ext_str == "docx" {
                return Ok(DocumentKind::Docx);
            }

            let text_extensions = ["txt", "text", "md", "markdown"];
            if text_extensions.contains(&ext_str.as_str()) {
                return Ok(DocumentKind::Text);
            }
        }

        // No recognized extension, examine the content
        let bytes = fs::read(path).with_context(|| format!("Failed to read file: {:?}", path))?;

        if bytes.starts_with(ZIP_MAGIC) && Self::zip_contains_word_body(&bytes) {
            return Ok(DocumentKind::Docx);
        }

        if std::str::from_utf8(&bytes).is_ok() {
            return Ok(DocumentKind::Text);
        }

        Ok(DocumentKind::Unknown)
    }

    fn zip_contains_word_body(bytes: &[u8]) -> bool {
        let cursor = std::io::Cursor::new(bytes);
        match zip::ZipArchive::new(cursor) {
            Ok(mut archive) => archive.by_name("word/document.xml").is_ok(),
            Err(_) => false,
        }
    }
}
