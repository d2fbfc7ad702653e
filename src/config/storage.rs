use anyhow::Result;
use std::env;

#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub endpoint: String,
    pub access_key: String,
    pub secret_key: String,
    pub bucket: String,
    pub region: String,
    pub presign_expiry_secs: u64,
}

impl StorageConfig {
    pub fn from_env() -> Result<Self> {
        let endpoint = env::var("S3_ENDPOINT")
            .map_err(|_| anyhow::anyhow!("S3_ENDPOINT environment variable must be set"))?;
        let access_key = env::var("S3_ACCESS_KEY")
            .map_err(|_| anyhow::anyhow!("S3_ACCESS_KEY environment variable must be set"))?;
        let secret_key = env::var("S3_SECRET_KEY")
            .map_err(|_| anyhow::anyhow!("S3_SECRET_KEY environment variable must be set"))?;
        let bucket = env::var("S3_BUCKET").unwrap_or_else(|_| "denuncias".to_string());
        let region = env::var("S3_REGION").unwrap_or_else(|_| "us-east-1".to_string());

        let presign_expiry_secs = env::var("S3_PRESIGN_EXPIRY_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(900); // 15 minutes

        Ok(Self {
            endpoint,
            access_key,
            secret_key,
            bucket,
            region,
            presign_expiry_secs,
        })
    }
}
