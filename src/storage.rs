use std::env;

use aws_sdk_s3::config::Credentials;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::types::{CompletedMultipartUpload, CompletedPart};
use aws_sdk_s3::Client;
use aws_types::region::Region;
use bytes::Bytes;
use log::{error, info};

use crate::error::{ServiceError, ServiceResult};

// S3 rejects non-final multipart parts below 5 MiB.
const PART_SIZE: usize = 5 * 1024 * 1024;

/// Blob storage over an S3-compatible endpoint (MinIO in development).
/// Uploads report a completed fraction per part so the admin console can
/// render a progress bar.
#[derive(Clone)]
pub struct BlobStore {
    client: Client,
    bucket: String,
    public_base: String,
}

impl BlobStore {
    pub async fn from_env() -> Self {
        let sdk_config = aws_config::from_env().load().await;
        let mut s3_config_builder = aws_sdk_s3::config::Builder::from(&sdk_config);

        let endpoint = env::var("MINIO_ENDPOINT").unwrap_or_else(|_| "http://localhost:9000".to_string());
        s3_config_builder = s3_config_builder.endpoint_url(endpoint.clone()).force_path_style(true);

        let access_key = env::var("MINIO_ACCESS_KEY").unwrap_or_else(|_| "minio".to_string());
        let secret_key = env::var("MINIO_SECRET_KEY").unwrap_or_else(|_| "minio123".to_string());
        let credentials = Credentials::new(access_key, secret_key, None, None, "env");
        s3_config_builder = s3_config_builder.credentials_provider(credentials);

        if let Some(region) = sdk_config.region() {
            s3_config_builder = s3_config_builder.region(region.clone());
        } else {
            s3_config_builder = s3_config_builder.region(Region::new("us-east-1"));
        }

        let bucket = env::var("MINIO_BUCKET").unwrap_or_else(|_| "course-content".to_string());
        let public_base = format!("{}/{}", endpoint.trim_end_matches('/'), bucket);

        BlobStore {
            client: Client::from_conf(s3_config_builder.build()),
            bucket,
            public_base,
        }
    }

    pub async fn ensure_bucket(&self) {
        if self.client.head_bucket().bucket(&self.bucket).send().await.is_ok() {
            return;
        }
        match self.client.create_bucket().bucket(&self.bucket).send().await {
            Ok(_) => info!("created bucket {}", self.bucket),
            Err(e) => error!("failed to create bucket {}: {:?}", self.bucket, e),
        }
    }

    /// Uploads `data` under `key`, invoking `on_progress` with the completed
    /// fraction (0.0..=1.0) after every part, and returns the download URL.
    pub async fn upload_with_progress<F>(&self, key: &str, data: Bytes, on_progress: F) -> ServiceResult<String>
    where
        F: Fn(f32),
    {
        if data.len() <= PART_SIZE {
            self.client
                .put_object()
                .bucket(&self.bucket)
                .key(key)
                .body(ByteStream::from(data))
                .send()
                .await
                .map_err(|e| ServiceError::Backend(format!("upload failed: {}", e)))?;
            on_progress(1.0);
            return Ok(self.download_url(key));
        }

        let multipart = self
            .client
            .create_multipart_upload()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| ServiceError::Backend(format!("upload init failed: {}", e)))?;
        let upload_id = multipart
            .upload_id()
            .ok_or_else(|| ServiceError::Backend("upload init returned no id".to_string()))?
            .to_string();

        let total = data.len();
        let mut completed_parts = Vec::new();
        let mut offset = 0usize;
        let mut part_number = 1i32;

        while offset < total {
            let end = (offset + PART_SIZE).min(total);
            let chunk = data.slice(offset..end);
            let part = self
                .client
                .upload_part()
                .bucket(&self.bucket)
                .key(key)
                .upload_id(&upload_id)
                .part_number(part_number)
                .body(ByteStream::from(chunk))
                .send()
                .await
                .map_err(|e| ServiceError::Backend(format!("upload part {} failed: {}", part_number, e)))?;

            completed_parts.push(
                CompletedPart::builder()
                    .set_e_tag(part.e_tag().map(String::from))
                    .part_number(part_number)
                    .build(),
            );
            on_progress(end as f32 / total as f32);
            offset = end;
            part_number += 1;
        }

        self.client
            .complete_multipart_upload()
            .bucket(&self.bucket)
            .key(key)
            .upload_id(&upload_id)
            .multipart_upload(
                CompletedMultipartUpload::builder()
                    .set_parts(Some(completed_parts))
                    .build(),
            )
            .send()
            .await
            .map_err(|e| ServiceError::Backend(format!("upload completion failed: {}", e)))?;

        Ok(self.download_url(key))
    }

    pub fn download_url(&self, key: &str) -> String {
        format!("{}/{}", self.public_base, key)
    }
}
