/**
 * Cloudinary Media Store
 *
 * Uploads attachments through Cloudinary's signed upload API with
 * `resource_type = auto`, so images, video and audio share one endpoint.
 *
 * # Signing
 *
 * Every request carries `api_key`, `timestamp` and `signature`, where the
 * signature is the hex SHA-1 of the signed parameters sorted by name,
 * joined as `k=v` pairs with `&`, with the API secret appended.
 */

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use sha1::{Digest, Sha1};

use crate::backend::media::{Attachment, MediaStore, MediaStoreError, StoredMedia};
use crate::backend::server::config::MediaStoreSettings;

#[derive(Debug, Deserialize)]
struct UploadResponse {
    secure_url: String,
    public_id: String,
    resource_type: String,
}

#[derive(Debug, Deserialize)]
struct DestroyResponse {
    result: String,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

/// Sign `params` with `api_secret`
pub fn sign_params(params: &[(&str, String)], api_secret: &str) -> String {
    let mut sorted: Vec<&(&str, String)> = params.iter().collect();
    sorted.sort_by(|a, b| a.0.cmp(b.0));

    let to_sign = sorted
        .iter()
        .map(|(key, value)| format!("{}={}", key, value))
        .collect::<Vec<_>>()
        .join("&");

    let mut hasher = Sha1::new();
    hasher.update(to_sign.as_bytes());
    hasher.update(api_secret.as_bytes());
    hex::encode(hasher.finalize())
}

#[derive(Debug, Clone)]
pub struct CloudinaryStore {
    client: reqwest::Client,
    base_url: String,
    cloud_name: String,
    api_key: String,
    api_secret: String,
}

impl CloudinaryStore {
    pub fn new(settings: &MediaStoreSettings) -> Result<Self, MediaStoreError> {
        let client = reqwest::Client::builder()
            .timeout(settings.timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            cloud_name: settings.cloud_name.clone(),
            api_key: settings.api_key.clone(),
            api_secret: settings.api_secret.clone(),
        })
    }

    fn endpoint(&self, resource_type: &str, action: &str) -> String {
        format!(
            "{}/v1_1/{}/{}/{}",
            self.base_url, self.cloud_name, resource_type, action
        )
    }

    async fn rejection(response: reqwest::Response) -> MediaStoreError {
        let status = response.status().as_u16();
        let message = match response.json::<ErrorEnvelope>().await {
            Ok(envelope) => envelope.error.message,
            Err(_) => format!("Media store returned status {}", status),
        };
        MediaStoreError::Rejected { status, message }
    }
}

#[async_trait]
impl MediaStore for CloudinaryStore {
    async fn upload(&self, attachment: &Attachment) -> Result<StoredMedia, MediaStoreError> {
        let timestamp = chrono::Utc::now().timestamp().to_string();
        let signature = sign_params(&[("timestamp", timestamp.clone())], &self.api_secret);

        let file = Part::bytes(attachment.bytes.to_vec())
            .file_name(attachment.file_name.clone())
            .mime_str(&attachment.content_type)?;

        let form = Form::new()
            .part("file", file)
            .text("api_key", self.api_key.clone())
            .text("timestamp", timestamp)
            .text("signature", signature);

        tracing::debug!(
            file_name = %attachment.file_name,
            bytes = attachment.len(),
            "Uploading media"
        );

        let response = self
            .client
            .post(self.endpoint("auto", "upload"))
            .multipart(form)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::rejection(response).await);
        }

        let body: UploadResponse = response
            .json()
            .await
            .map_err(|e| MediaStoreError::Malformed(e.to_string()))?;

        tracing::info!(public_id = %body.public_id, "Media uploaded");

        Ok(StoredMedia {
            url: body.secure_url,
            public_id: body.public_id,
            resource_type: body.resource_type,
        })
    }

    async fn delete(&self, media: &StoredMedia) -> Result<(), MediaStoreError> {
        let timestamp = chrono::Utc::now().timestamp().to_string();
        let signature = sign_params(
            &[
                ("public_id", media.public_id.clone()),
                ("timestamp", timestamp.clone()),
            ],
            &self.api_secret,
        );

        let response = self
            .client
            .post(self.endpoint(&media.resource_type, "destroy"))
            .form(&[
                ("public_id", media.public_id.as_str()),
                ("api_key", self.api_key.as_str()),
                ("timestamp", timestamp.as_str()),
                ("signature", signature.as_str()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::rejection(response).await);
        }

        let body: DestroyResponse = response
            .json()
            .await
            .map_err(|e| MediaStoreError::Malformed(e.to_string()))?;

        match body.result.as_str() {
            "ok" | "not found" => Ok(()),
            other => Err(MediaStoreError::Malformed(format!(
                "unexpected destroy result '{}'",
                other
            ))),
        }
    }
}
