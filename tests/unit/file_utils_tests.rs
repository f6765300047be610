/*!
 * Tests for file and directory utilities
 */

use std::path::PathBuf;

use doctran::file_utils::{DocumentKind, FileManager};

use crate::common::{SAMPLE_DOCUMENT_XML, create_temp_dir, create_test_docx, create_test_file};

#[test]
fn test_detect_document_kind_withDocxExtension_shouldBeDocx() {
    let dir = create_temp_dir().unwrap();
    let path = create_test_docx(&dir.path().to_path_buf(), "sample.docx", SAMPLE_DOCUMENT_XML).unwrap();
    assert_eq!(FileManager::detect_document_kind(&path).unwrap(), DocumentKind::Docx);
}

#[test]
fn test_detect_document_kind_withTextExtension_shouldBeText() {
    let dir = create_temp_dir().unwrap();
    let path = create_test_file(&dir.path().to_path_buf(), "notes.txt", "hello").unwrap();
    assert_eq!(FileManager::detect_document_kind(&path).unwrap(), DocumentKind::Text);
}

#[test]
fn test_detect_document_kind_withExtensionlessDocx_shouldSniffContent() {
    let dir = create_temp_dir().unwrap();
    let path = create_test_docx(&dir.path().to_path_buf(), "document", SAMPLE_DOCUMENT_XML).unwrap();
    assert_eq!(FileManager::detect_document_kind(&path).unwrap(), DocumentKind::Docx);
}

#[test]
fn test_detect_document_kind_withExtensionlessText_shouldSniffContent() {
    let dir = create_temp_dir().unwrap();
    let path = create_test_file(&dir.path().to_path_buf(), "README", "plain words").unwrap();
    assert_eq!(FileManager::detect_document_kind(&path).unwrap(), DocumentKind::Text);
}

#[test]
fn test_detect_document_kind_withMissingFile_shouldFail() {
    assert!(FileManager::detect_document_kind("/no/such/file").is_err());
}

#[test]
fn test_generate_output_path_shouldInsertTargetLanguage() {
    let output = FileManager::generate_output_path(PathBuf::from("/docs/report.docx"), "en");
    assert_eq!(output, PathBuf::from("/docs/report.en.docx"));

    let output = FileManager::generate_output_path(PathBuf::from("notes.txt"), "fr");
    assert_eq!(output, PathBuf::from("notes.fr.txt"));
}

#[test]
fn test_find_files_shouldMatchExtensionCaseInsensitively() {
    let dir = create_temp_dir().unwrap();
    let base = dir.path().to_path_buf();
    create_test_file(&base, "a.txt", "x").unwrap();
    create_test_file(&base, "b.TXT", "x").unwrap();
    create_test_file(&base, "c.docx", "x").unwrap();

    let found = FileManager::find_files(&base, "txt").unwrap();
    assert_eq!(found.len(), 2);

    let found = FileManager::find_files(&base, ".docx").unwrap();
    assert_eq!(found.len(), 1);
}

#[test]
fn test_ensure_dir_withNestedPath_shouldCreateAll() {
    let dir = create_temp_dir().unwrap();
    let nested = dir.path().join("a/b/c");
    FileManager::ensure_dir(&nested).unwrap();
    assert!(FileManager::dir_exists(&nested));
}
