use crate::config::storage::StorageConfig;
use crate::error::{AppError, AppResult};
use aws_sdk_s3::config::{BehaviorVersion, Credentials, Region};
use aws_sdk_s3::presigning::PresigningConfig;
use aws_sdk_s3::Client as S3Client;
use std::time::Duration;
use uuid::Uuid;

pub const MAX_FILE_SIZE: i64 = 200 * 1024 * 1024; // 200 MB

/// Allowed evidence MIME types.
pub const ALLOWED_CONTENT_TYPES: &[&str] = &[
    "application/pdf",
    "image/jpeg",
    "image/png",
    "image/webp",
    "video/mp4",
    "audio/mpeg",
    "application/msword",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
];

/// Presigned-URL indirection over an S3-compatible store. The API never
/// proxies file bytes: clients upload and download directly against the
/// object store with time-limited URLs.
#[derive(Clone)]
pub struct StorageService {
    client: S3Client,
    bucket: String,
    presign_expiry: Duration,
}

pub struct PresignedUpload {
    pub object_key: String,
    pub url: String,
    pub expires_in_secs: u64,
}

impl StorageService {
    pub async fn new(config: &StorageConfig) -> Self {
        let credentials = Credentials::new(
            &config.access_key,
            &config.secret_key,
            None,
            None,
            "denuncias",
        );

        let s3_config = aws_sdk_s3::Config::builder()
            .behavior_version(BehaviorVersion::latest())
            .endpoint_url(&config.endpoint)
            .region(Region::new(config.region.clone()))
            .credentials_provider(credentials)
            .force_path_style(true)
            .build();

        let client = S3Client::from_conf(s3_config);

        // Ensure bucket exists; already-owned errors are fine.
        let _ = client.create_bucket().bucket(&config.bucket).send().await;

        tracing::info!(
            endpoint = %config.endpoint,
            bucket = %config.bucket,
            "Object storage client initialized"
        );

        Self {
            client,
            bucket: config.bucket.clone(),
            presign_expiry: Duration::from_secs(config.presign_expiry_secs),
        }
    }

    /// Validate metadata and issue a presigned PUT URL. The object key is
    /// `<uuid>-<sanitized-original-name>`.
    pub async fn presign_upload(
        &self,
        original_name: &str,
        content_type: &str,
        size_bytes: i64,
    ) -> AppResult<PresignedUpload> {
        if size_bytes <= 0 {
            return Err(AppError::Validation("File size must be positive".to_string()));
        }
        if size_bytes > MAX_FILE_SIZE {
            return Err(AppError::PayloadTooLarge);
        }
        if !ALLOWED_CONTENT_TYPES.contains(&content_type) {
            return Err(AppError::Validation(format!(
                "Unsupported file type: {}",
                content_type
            )));
        }

        let sanitized = sanitize_file_name(original_name);
        if sanitized.is_empty() {
            return Err(AppError::Validation("Invalid file name".to_string()));
        }

        let object_key = format!("{}-{}", Uuid::new_v4(), sanitized);

        let presign_config = self.presigning_config()?;
        let url = self
            .client
            .put_object()
            .bucket(&self.bucket)
            .key(&object_key)
            .content_type(content_type)
            .presigned(presign_config)
            .await
            .map_err(|e| AppError::Internal(anyhow::anyhow!("presign error: {e}")))?
            .uri()
            .to_string();

        Ok(PresignedUpload {
            object_key,
            url,
            expires_in_secs: self.presign_expiry.as_secs(),
        })
    }

    /// Issue a presigned GET URL for an existing object.
    pub async fn presign_download(&self, object_key: &str) -> AppResult<String> {
        let presign_config = self.presigning_config()?;
        let url = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(object_key)
            .presigned(presign_config)
            .await
            .map_err(|e| AppError::Internal(anyhow::anyhow!("presign error: {e}")))?
            .uri()
            .to_string();

        Ok(url)
    }

    pub async fn delete(&self, object_key: &str) -> AppResult<()> {
        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(object_key)
            .send()
            .await
            .map_err(|e| AppError::Internal(anyhow::anyhow!("delete failed: {e}")))?;

        Ok(())
    }

    fn presigning_config(&self) -> AppResult<PresigningConfig> {
        PresigningConfig::builder()
            .expires_in(self.presign_expiry)
            .build()
            .map_err(|e| AppError::Internal(anyhow::anyhow!("presign config error: {e}")))
    }
}

/// Keep letters, digits, dot, dash and underscore; everything else
/// becomes an underscore. Leading dots are stripped so a key can never
/// start a hidden path segment.
pub fn sanitize_file_name(name: &str) -> String {
    name.trim()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect::<String>()
        .trim_start_matches('.')
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_keeps_safe_chars() {
        assert_eq!(sanitize_file_name("informe-2024_v1.pdf"), "informe-2024_v1.pdf");
    }

    #[test]
    fn sanitize_replaces_spaces_and_slashes() {
        assert_eq!(sanitize_file_name("mi archivo/final.pdf"), "mi_archivo_final.pdf");
    }

    #[test]
    fn sanitize_strips_leading_dots() {
        assert_eq!(sanitize_file_name("..secreto.txt"), "secreto.txt");
    }

    #[test]
    fn sanitize_handles_accents() {
        assert_eq!(sanitize_file_name("declaración.pdf"), "declaraci_n.pdf");
    }

    #[test]
    fn allow_list_includes_pdf_and_images() {
        assert!(ALLOWED_CONTENT_TYPES.contains(&"application/pdf"));
        assert!(ALLOWED_CONTENT_TYPES.contains(&"image/jpeg"));
        assert!(!ALLOWED_CONTENT_TYPES.contains(&"application/x-msdownload"));
    }
}
