use std::path::{Path, PathBuf};

use bytes::Bytes;
use tokio::fs;

use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadKind {
    Avatar,
    Resume,
}

impl UploadKind {
    pub fn allowed_extensions(self) -> &'static [&'static str] {
        match self {
            UploadKind::Avatar => &["jpg", "jpeg", "png", "gif"],
            UploadKind::Resume => &["pdf", "doc", "docx"],
        }
    }

    pub fn max_bytes(self) -> usize {
        match self {
            UploadKind::Avatar => 5 * 1024 * 1024,
            UploadKind::Resume => 10 * 1024 * 1024,
        }
    }

    fn subdir(self) -> &'static str {
        match self {
            UploadKind::Avatar => "avatars",
            UploadKind::Resume => "resumes",
        }
    }
}

/// A validated file ready to be written.
#[derive(Debug, Clone)]
pub struct Upload {
    pub kind: UploadKind,
    pub original_name: String,
    pub extension: String,
    pub data: Bytes,
}

impl Upload {
    pub fn new(kind: UploadKind, original_name: &str, data: Bytes) -> Result<Self> {
        let extension = Path::new(original_name)
            .extension()
            .and_then(|s| s.to_str())
            .map(|s| s.to_lowercase())
            .unwrap_or_default();

        if !kind.allowed_extensions().contains(&extension.as_str()) {
            return Err(Error::BadRequest(format!(
                "File type not allowed. Allowed: {}",
                kind.allowed_extensions().join(", ")
            )));
        }
        if data.is_empty() {
            return Err(Error::BadRequest("Uploaded file is empty".into()));
        }
        if data.len() > kind.max_bytes() {
            return Err(Error::BadRequest(format!(
                "File is too large, maximum is {} MB",
                kind.max_bytes() / (1024 * 1024)
            )));
        }

        Ok(Self {
            kind,
            original_name: original_name.to_string(),
            extension,
            data,
        })
    }

    pub fn size(&self) -> i64 {
        self.data.len() as i64
    }

    /// Writes under `root` and returns the path relative to it (served at `/uploads/<path>`).
    pub async fn save(&self, root: &str) -> Result<String> {
        let dir = PathBuf::from(root).join(self.kind.subdir());
        fs::create_dir_all(&dir).await?;
        let file_name = format!("{}.{}", uuid::Uuid::new_v4(), self.extension);
        fs::write(dir.join(&file_name), &self.data).await.map_err(|e| {
            tracing::error!(error = %e, "failed to write upload");
            Error::Io(e)
        })?;
        Ok(format!("{}/{}", self.kind.subdir(), file_name))
    }
}

/// Removes a stored file; a file that is already gone is not an error.
pub async fn remove(root: &str, relative: &str) -> Result<()> {
    match fs::remove_file(PathBuf::from(root).join(relative)).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(Error::Io(e)),
    }
}

/// Removes a just-saved file when the database write that should reference it failed.
pub async fn discard_on_error<T>(root: &str, relative: &str, outcome: Result<T>) -> Result<T> {
    if outcome.is_err() {
        if let Err(e) = remove(root, relative).await {
            tracing::error!(error = %e, file = relative, "failed to discard orphaned upload");
        }
    }
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resume_allow_list() {
        let ok = Upload::new(UploadKind::Resume, "CV.PDF", Bytes::from_static(b"%PDF-1.4"));
        assert_eq!(ok.unwrap().extension, "pdf");
        assert!(Upload::new(UploadKind::Resume, "cv.exe", Bytes::from_static(b"x")).is_err());
        assert!(Upload::new(UploadKind::Resume, "noext", Bytes::from_static(b"x")).is_err());
    }

    #[test]
    fn avatar_size_limit() {
        let big = Bytes::from(vec![0u8; UploadKind::Avatar.max_bytes() + 1]);
        assert!(matches!(
            Upload::new(UploadKind::Avatar, "me.png", big),
            Err(Error::BadRequest(_))
        ));
        let fits = Bytes::from(vec![0u8; 1024]);
        assert!(Upload::new(UploadKind::Avatar, "me.gif", fits).is_ok());
        assert!(Upload::new(UploadKind::Avatar, "me.pdf", Bytes::from_static(b"x")).is_err());
    }

    #[tokio::test]
    async fn save_then_remove() {
        let root = std::env::temp_dir().join(format!("uploads-{}", uuid::Uuid::new_v4()));
        let root = root.to_string_lossy().to_string();
        let upload = Upload::new(UploadKind::Resume, "cv.docx", Bytes::from_static(b"doc")).unwrap();
        let relative = upload.save(&root).await.unwrap();
        assert!(relative.starts_with("resumes/"));
        assert!(PathBuf::from(&root).join(&relative).exists());
        tokio_test::assert_ok!(remove(&root, &relative).await);
        // Already gone.
        tokio_test::assert_ok!(remove(&root, &relative).await);
        let _ = std::fs::remove_dir_all(&root);
    }

    #[tokio::test]
    async fn failed_write_discards_the_file() {
        let root = std::env::temp_dir().join(format!("uploads-{}", uuid::Uuid::new_v4()));
        let root = root.to_string_lossy().to_string();
        let upload = Upload::new(UploadKind::Resume, "cv.pdf", Bytes::from_static(b"%PDF")).unwrap();

        let kept = upload.save(&root).await.unwrap();
        let outcome = discard_on_error(&root, &kept, Ok(1)).await;
        assert_eq!(outcome.unwrap(), 1);
        assert!(PathBuf::from(&root).join(&kept).exists());

        let dropped = upload.save(&root).await.unwrap();
        let outcome: Result<()> =
            discard_on_error(&root, &dropped, Err(Error::Conflict("taken".into()))).await;
        assert!(matches!(outcome, Err(Error::Conflict(_))));
        assert!(!PathBuf::from(&root).join(&dropped).exists());
        let _ = std::fs::remove_dir_all(&root);
    }
}
