//! In-memory file handle passed to generators

use std::path::{Path, PathBuf};

/// A file read into memory as UTF-8 text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VFile {
   /// Resolved location of the file
   pub path:  PathBuf,
   /// Decoded text content
   pub value: String,
}

impl VFile {
   /// Create a file handle from a path and its contents
   pub fn new(path: impl Into<PathBuf>, value: impl Into<String>) -> Self {
      Self { path: path.into(), value: value.into() }
   }

   /// Read a file from disk as UTF-8
   pub async fn read(path: impl Into<PathBuf>) -> std::io::Result<Self> {
      let path = path.into();
      let value = tokio::fs::read_to_string(&path).await?;
      Ok(Self { path, value })
   }

   pub fn path(&self) -> &Path {
      &self.path
   }
}

impl std::fmt::Display for VFile {
   fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
      f.write_str(&self.value)
   }
}

#[cfg(test)]
mod tests {
   use super::*;

   #[tokio::test]
   async fn test_read_keeps_path_and_text() {
      let dir = tempfile::tempdir().unwrap();
      let path = dir.path().join("input.md");
      std::fs::write(&path, "# title\n").unwrap();

      let file = VFile::read(&path).await.unwrap();
      assert_eq!(file.path(), path.as_path());
      assert_eq!(file.value, "# title\n");
      assert_eq!(file.to_string(), "# title\n");
   }

   #[tokio::test]
   async fn test_read_missing_file_fails() {
      let dir = tempfile::tempdir().unwrap();
      let err = VFile::read(dir.path().join("nope")).await.unwrap_err();
      assert_eq!(err.kind(), std::io::ErrorKind::NotFound);
   }
}
