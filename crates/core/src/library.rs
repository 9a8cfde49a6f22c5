//! Read-only access to the video directory for the streaming server.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::LibraryConfig;

#[derive(Debug, Error)]
pub enum LibraryError {
    /// The name points outside the video directory.
    #[error("Access denied: {0}")]
    Forbidden(String),

    #[error("Video not found: {0}")]
    NotFound(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// File details served by `/api/video-info`.
#[derive(Debug, Clone, Serialize)]
pub struct VideoInfo {
    pub filename: String,
    pub size: u64,
    pub modified: DateTime<Utc>,
    pub content_type: &'static str,
}

/// MIME type for a video file name. Unknown extensions are served as MP4.
pub fn content_type(filename: &str) -> &'static str {
    let ext = Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();
    match ext.as_str() {
        "mp4" => "video/mp4",
        "mkv" => "video/x-matroska",
        "avi" => "video/x-msvideo",
        "mov" => "video/quicktime",
        "wmv" => "video/x-ms-wmv",
        _ => "video/mp4",
    }
}

/// The configured video directory.
#[derive(Debug, Clone)]
pub struct VideoLibrary {
    root: PathBuf,
    extensions: Vec<String>,
}

impl VideoLibrary {
    pub fn new(root: impl Into<PathBuf>, extensions: &[String]) -> Self {
        Self {
            root: root.into(),
            extensions: extensions.to_vec(),
        }
    }

    pub fn from_config(config: &LibraryConfig) -> Self {
        Self::new(config.videos_dir.clone(), &config.extensions)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Create the directory if it is missing. Returns true when created.
    pub async fn ensure_exists(&self) -> Result<bool, LibraryError> {
        if tokio::fs::try_exists(&self.root).await? {
            return Ok(false);
        }
        tokio::fs::create_dir_all(&self.root).await?;
        Ok(true)
    }

    fn is_video(&self, name: &str) -> bool {
        let lower = name.to_lowercase();
        self.extensions
            .iter()
            .any(|ext| lower.ends_with(&ext.to_lowercase()) && lower.len() > ext.len())
    }

    /// Recognised video file names, sorted. A missing directory is empty.
    pub async fn list_videos(&self) -> Result<Vec<String>, LibraryError> {
        let mut read_dir = match tokio::fs::read_dir(&self.root).await {
            Ok(rd) => rd,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut names = Vec::new();
        while let Some(entry) = read_dir.next_entry().await? {
            let file_name = entry.file_name();
            let Some(name) = file_name.to_str().map(str::to_string) else {
                warn!(
                    "Not serving {}: file name is not valid UTF-8",
                    file_name.to_string_lossy()
                );
                continue;
            };
            if !self.is_video(&name) {
                continue;
            }
            if tokio::fs::metadata(entry.path())
                .await
                .map(|m| m.is_file())
                .unwrap_or(false)
            {
                names.push(name);
            }
        }

        names.sort();
        Ok(names)
    }

    /// Resolve a client-supplied file name to a file inside the directory.
    ///
    /// Only a single plain path component is accepted, and the resolved
    /// file (after following symlinks) must still live under the root.
    pub async fn resolve(&self, filename: &str) -> Result<PathBuf, LibraryError> {
        let mut components = Path::new(filename).components();
        let single_normal = matches!(
            (components.next(), components.next()),
            (Some(Component::Normal(_)), None)
        );
        if !single_normal || filename.contains('\\') {
            debug!("Rejected video name {:?}", filename);
            return Err(LibraryError::Forbidden(filename.to_string()));
        }

        let path = self.root.join(filename);
        let canonical = match tokio::fs::canonicalize(&path).await {
            Ok(p) => p,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(LibraryError::NotFound(filename.to_string()))
            }
            Err(e) => return Err(e.into()),
        };
        let root = tokio::fs::canonicalize(&self.root).await?;
        if !canonical.starts_with(&root) {
            debug!("{:?} resolves outside the video directory", filename);
            return Err(LibraryError::Forbidden(filename.to_string()));
        }

        if !tokio::fs::metadata(&canonical).await?.is_file() {
            return Err(LibraryError::NotFound(filename.to_string()));
        }

        Ok(canonical)
    }

    pub async fn video_info(&self, filename: &str) -> Result<VideoInfo, LibraryError> {
        let path = self.resolve(filename).await?;
        let meta = tokio::fs::metadata(&path).await?;

        Ok(VideoInfo {
            filename: filename.to_string(),
            size: meta.len(),
            modified: meta.modified().map(DateTime::<Utc>::from)?,
            content_type: content_type(filename),
        })
    }

    /// File name of the video for a catalog ID, trying each configured
    /// extension in order. Extensions compare case-insensitively, so a file
    /// renamed to `550.MKV` is found and returned under its on-disk name.
    pub async fn find_movie_video(&self, movie_id: u64) -> Result<Option<String>, LibraryError> {
        let videos = self.list_videos().await?;

        for ext in &self.extensions {
            let wanted = format!("{}{}", movie_id, ext).to_lowercase();
            if let Some(name) = videos.iter().find(|name| name.to_lowercase() == wanted) {
                return Ok(Some(name.clone()));
            }
        }
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::fixtures;
    use tempfile::TempDir;

    fn library(dir: &Path) -> VideoLibrary {
        VideoLibrary::from_config(&LibraryConfig {
            videos_dir: dir.to_path_buf(),
            ..Default::default()
        })
    }

    #[test]
    fn test_content_type() {
        assert_eq!(content_type("550.mp4"), "video/mp4");
        assert_eq!(content_type("550.MKV"), "video/x-matroska");
        assert_eq!(content_type("a.avi"), "video/x-msvideo");
        assert_eq!(content_type("a.mov"), "video/quicktime");
        assert_eq!(content_type("a.wmv"), "video/x-ms-wmv");
        assert_eq!(content_type("a.webm"), "video/mp4");
        assert_eq!(content_type("noext"), "video/mp4");
    }

    #[tokio::test]
    async fn test_list_videos() {
        let dir = TempDir::new().unwrap();
        fixtures::video_dir(dir.path(), &["b.mkv", "a.MP4", "notes.txt", ".mp4"]);
        std::fs::create_dir(dir.path().join("folder.mp4")).unwrap();

        let names = library(dir.path()).list_videos().await.unwrap();
        assert_eq!(names, vec!["a.MP4", "b.mkv"]);
    }

    #[tokio::test]
    async fn test_list_missing_directory_is_empty() {
        let dir = TempDir::new().unwrap();
        let names = library(&dir.path().join("absent")).list_videos().await.unwrap();
        assert!(names.is_empty());
    }

    #[tokio::test]
    async fn test_resolve_rejects_traversal() {
        let dir = TempDir::new().unwrap();
        let videos = dir.path().join("videos");
        std::fs::create_dir(&videos).unwrap();
        std::fs::write(dir.path().join("secret.txt"), "x").unwrap();
        let lib = library(&videos);

        for name in ["../secret.txt", "..", "/etc/passwd", "sub/x.mp4", "", "."] {
            assert!(
                matches!(lib.resolve(name).await, Err(LibraryError::Forbidden(_))),
                "{:?} was not rejected",
                name
            );
        }
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_resolve_rejects_symlink_escape() {
        let dir = TempDir::new().unwrap();
        let videos = dir.path().join("videos");
        std::fs::create_dir(&videos).unwrap();
        std::fs::write(dir.path().join("outside.mp4"), "x").unwrap();
        std::os::unix::fs::symlink(dir.path().join("outside.mp4"), videos.join("link.mp4"))
            .unwrap();

        let result = library(&videos).resolve("link.mp4").await;
        assert!(matches!(result, Err(LibraryError::Forbidden(_))));
    }

    #[tokio::test]
    async fn test_resolve_missing_and_present() {
        let dir = TempDir::new().unwrap();
        fixtures::video_dir(dir.path(), &["550.mp4"]);
        let lib = library(dir.path());

        assert!(lib.resolve("550.mp4").await.unwrap().ends_with("550.mp4"));
        assert!(matches!(
            lib.resolve("603.mp4").await,
            Err(LibraryError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_video_info() {
        let dir = TempDir::new().unwrap();
        fixtures::video_dir(dir.path(), &["550.mkv"]);

        let info = library(dir.path()).video_info("550.mkv").await.unwrap();
        assert_eq!(info.filename, "550.mkv");
        assert_eq!(info.size, "550.mkv".len() as u64);
        assert_eq!(info.content_type, "video/x-matroska");
    }

    #[tokio::test]
    async fn test_find_movie_video_follows_extension_order() {
        let dir = TempDir::new().unwrap();
        fixtures::video_dir(dir.path(), &["550.avi", "550.mkv", "603.wmv"]);
        let lib = library(dir.path());

        assert_eq!(lib.find_movie_video(550).await.unwrap().as_deref(), Some("550.mkv"));
        assert_eq!(lib.find_movie_video(603).await.unwrap().as_deref(), Some("603.wmv"));
        assert_eq!(lib.find_movie_video(13).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_find_movie_video_ignores_extension_case() {
        let dir = TempDir::new().unwrap();
        fixtures::video_dir(dir.path(), &["550.MKV", "5500.mkv"]);
        let lib = library(dir.path());

        assert_eq!(lib.list_videos().await.unwrap(), vec!["550.MKV", "5500.mkv"]);
        assert_eq!(lib.find_movie_video(550).await.unwrap().as_deref(), Some("550.MKV"));
        assert_eq!(lib.find_movie_video(55).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_find_movie_video_in_missing_directory() {
        let dir = TempDir::new().unwrap();
        let lib = library(&dir.path().join("absent"));
        assert_eq!(lib.find_movie_video(550).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_ensure_exists() {
        let dir = TempDir::new().unwrap();
        let lib = library(&dir.path().join("a").join("b"));
        assert!(lib.ensure_exists().await.unwrap());
        assert!(!lib.ensure_exists().await.unwrap());
    }
}
