//! Image storage for admin avatars
//!
//! Accepts a remote `http(s)` URL or a `data:` URI, checks that the bytes are
//! an image and writes them under the storage root. File names are derived
//! from the content hash, matching how the rest of the storefront caches
//! artwork.

use std::path::PathBuf;

use async_trait::async_trait;
use base64::Engine;
use sha2::{Digest, Sha256};
use tracing::{debug, info};

use crate::error::{AppError, AppResult};

/// Largest image accepted from any source
pub const DEFAULT_MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

/// The record an image belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageOwner<'a> {
    pub kind: &'a str,
    pub id: i64,
}

/// Image bytes that passed the content check and are ready to be written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUpload {
    pub bytes: Vec<u8>,
    pub extension: &'static str,
}

/// Where an image ended up and which owner field should point at it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredImage {
    pub field: String,
    pub path: String,
}

#[async_trait]
pub trait ImageStore: Send + Sync {
    /// Fetch `source` and check that it is an image. A blank source yields
    /// `None`. Nothing is written.
    async fn load(&self, source: &str) -> AppResult<Option<ImageUpload>>;

    /// Write a loaded image for `owner` under `prefix`, replacing whatever
    /// was stored for it before.
    async fn attach(
        &self,
        owner: ImageOwner<'_>,
        image: ImageUpload,
        prefix: &str,
        field: &str,
    ) -> AppResult<StoredImage>;
}

/// Filesystem-backed [`ImageStore`]
pub struct LocalImageStore {
    root: PathBuf,
    max_bytes: usize,
    http_client: reqwest::Client,
}

impl LocalImageStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            max_bytes: DEFAULT_MAX_IMAGE_BYTES,
            http_client: reqwest::Client::new(),
        }
    }

    pub fn with_max_bytes(mut self, max_bytes: usize) -> Self {
        self.max_bytes = max_bytes;
        self
    }

    fn too_large(&self) -> AppError {
        AppError::validation(format!(
            "The image may not be greater than {} kilobytes.",
            self.max_bytes / 1024
        ))
    }

    async fn fetch(&self, source: &str) -> AppResult<Vec<u8>> {
        if let Some(rest) = source.strip_prefix("data:") {
            let bytes = decode_data_uri(rest)?;
            if bytes.len() > self.max_bytes {
                return Err(self.too_large());
            }
            return Ok(bytes);
        }

        if source.starts_with("http://") || source.starts_with("https://") {
            debug!(url = %source, "Downloading image");
            let mut response = self.http_client.get(source).send().await?;
            if !response.status().is_success() {
                return Err(AppError::Internal(format!(
                    "Failed to download image: {}",
                    response.status()
                )));
            }
            if let Some(length) = response.content_length()
                && length > self.max_bytes as u64
            {
                return Err(self.too_large());
            }

            let mut bytes = Vec::new();
            while let Some(chunk) = response.chunk().await? {
                if bytes.len() + chunk.len() > self.max_bytes {
                    return Err(self.too_large());
                }
                bytes.extend_from_slice(&chunk);
            }
            return Ok(bytes);
        }

        Err(AppError::validation(
            "The image must be an http(s) URL or a base64 data URI.",
        ))
    }
}

fn decode_data_uri(rest: &str) -> AppResult<Vec<u8>> {
    let (meta, payload) = rest
        .split_once(',')
        .ok_or_else(|| AppError::validation("The image data URI is malformed."))?;

    if !meta.ends_with(";base64") {
        return Err(AppError::validation("The image data URI must be base64 encoded."));
    }

    base64::engine::general_purpose::STANDARD
        .decode(payload.trim())
        .map_err(|e| AppError::validation(format!("The image data URI is malformed: {}", e)))
}

/// Content-addressed file name: first 16 hex chars of SHA-256 plus extension.
fn file_name(bytes: &[u8], extension: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    let hash = format!("{:x}", hasher.finalize());
    format!("{}.{}", &hash[..16], extension)
}

#[async_trait]
impl ImageStore for LocalImageStore {
    async fn load(&self, source: &str) -> AppResult<Option<ImageUpload>> {
        let source = source.trim();
        if source.is_empty() {
            return Ok(None);
        }

        let bytes = self.fetch(source).await?;
        let kind = infer::get(&bytes)
            .filter(|k| k.matcher_type() == infer::MatcherType::Image)
            .ok_or_else(|| AppError::validation("The image must be an image."))?;

        Ok(Some(ImageUpload {
            bytes,
            extension: kind.extension(),
        }))
    }

    async fn attach(
        &self,
        owner: ImageOwner<'_>,
        image: ImageUpload,
        prefix: &str,
        field: &str,
    ) -> AppResult<StoredImage> {
        let dir = format!("{}{}", prefix, owner.id);
        let relative = format!("{}/{}", dir, file_name(&image.bytes, image.extension));
        let target_dir = self.root.join(&dir);

        // One image per owner field: clear whatever was stored before
        if tokio::fs::try_exists(&target_dir).await? {
            tokio::fs::remove_dir_all(&target_dir).await?;
        }
        tokio::fs::create_dir_all(&target_dir).await?;
        tokio::fs::write(self.root.join(&relative), &image.bytes).await?;

        info!(
            owner = owner.kind,
            owner_id = owner.id,
            path = %relative,
            size = image.bytes.len(),
            "Image stored"
        );

        Ok(StoredImage {
            field: field.to_string(),
            path: relative,
        })
    }
}
