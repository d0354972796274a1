use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use reqwest::multipart::{Form, Part};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use sha1::{Digest, Sha1};
use tracing::{debug, warn};

use crate::config::MediaConfig;
use crate::listings::{ImagePayload, MediaError, MediaStore, UploadedImage};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Parameters Cloudinary excludes from the signature base string.
const UNSIGNED_PARAMS: [&str; 4] = ["file", "api_key", "cloud_name", "resource_type"];

/// Signs request parameters with the account secret.
///
/// Pairs are sorted by key and joined as `k=v&k=v`; the secret is appended
/// before hashing with SHA-1. Empty values are left out.
pub fn sign(params: &[(&str, &str)], api_secret: &str) -> String {
    let mut signed: Vec<&(&str, &str)> = params
        .iter()
        .filter(|(key, value)| !value.is_empty() && !UNSIGNED_PARAMS.contains(key))
        .collect();
    signed.sort_by(|left, right| left.0.cmp(right.0));

    let base = signed
        .iter()
        .map(|(key, value)| format!("{key}={value}"))
        .collect::<Vec<_>>()
        .join("&");

    let mut hasher = Sha1::new();
    hasher.update(base.as_bytes());
    hasher.update(api_secret.as_bytes());
    hex::encode(hasher.finalize())
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    secure_url: String,
    public_id: String,
}

#[derive(Debug, Deserialize)]
struct DestroyResponse {
    result: String,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorMessage,
}

#[derive(Debug, Deserialize)]
struct ErrorMessage {
    message: String,
}

/// Signed-upload client for the Cloudinary image API.
#[derive(Clone)]
pub struct CloudinaryClient {
    http: reqwest::Client,
    config: MediaConfig,
}

impl CloudinaryClient {
    pub fn new(config: MediaConfig) -> Result<Self, MediaError> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|err| MediaError::Transport(err.to_string()))?;
        Ok(Self::with_client(http, config))
    }

    pub fn with_client(http: reqwest::Client, config: MediaConfig) -> Self {
        Self { http, config }
    }

    fn endpoint(&self, action: &str) -> String {
        format!(
            "{}/v1_1/{}/image/{}",
            self.config.api_base.trim_end_matches('/'),
            self.config.cloud_name,
            action
        )
    }

    fn file_part(image: ImagePayload) -> Result<Part, MediaError> {
        let part = Part::bytes(image.bytes).file_name(image.file_name);
        // Unparseable client-supplied types fall back to reqwest's default.
        match image
            .content_type
            .as_deref()
            .filter(|raw| raw.parse::<mime::Mime>().is_ok())
        {
            Some(content_type) => part
                .mime_str(content_type)
                .map_err(|err| MediaError::Transport(err.to_string())),
            None => Ok(part),
        }
    }
}

async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, MediaError> {
    let status = response.status();
    if !status.is_success() {
        let message = match response.json::<ErrorEnvelope>().await {
            Ok(envelope) => envelope.error.message,
            Err(_) => status
                .canonical_reason()
                .unwrap_or("request failed")
                .to_string(),
        };
        return Err(MediaError::Rejected {
            status: status.as_u16(),
            message,
        });
    }

    response
        .json::<T>()
        .await
        .map_err(|err| MediaError::InvalidResponse(err.to_string()))
}

#[async_trait]
impl MediaStore for CloudinaryClient {
    async fn upload(&self, image: ImagePayload) -> Result<UploadedImage, MediaError> {
        let timestamp = Utc::now().timestamp().to_string();
        let signature = sign(
            &[
                ("folder", self.config.folder.as_str()),
                ("timestamp", timestamp.as_str()),
            ],
            &self.config.api_secret,
        );

        let form = Form::new()
            .part("file", Self::file_part(image)?)
            .text("folder", self.config.folder.clone())
            .text("timestamp", timestamp)
            .text("api_key", self.config.api_key.clone())
            .text("signature", signature);

        let response = self
            .http
            .post(self.endpoint("upload"))
            .multipart(form)
            .send()
            .await
            .map_err(|err| MediaError::Transport(err.to_string()))?;

        let uploaded: UploadResponse = read_json(response).await?;
        debug!(public_id = %uploaded.public_id, "image uploaded");
        Ok(UploadedImage {
            secure_url: uploaded.secure_url,
            public_id: uploaded.public_id,
        })
    }

    async fn destroy(&self, public_id: &str) -> Result<(), MediaError> {
        let timestamp = Utc::now().timestamp().to_string();
        let signature = sign(
            &[("public_id", public_id), ("timestamp", timestamp.as_str())],
            &self.config.api_secret,
        );

        let response = self
            .http
            .post(self.endpoint("destroy"))
            .form(&[
                ("public_id", public_id),
                ("timestamp", timestamp.as_str()),
                ("api_key", self.config.api_key.as_str()),
                ("signature", signature.as_str()),
            ])
            .send()
            .await
            .map_err(|err| MediaError::Transport(err.to_string()))?;

        let destroyed: DestroyResponse = read_json(response).await?;
        match destroyed.result.as_str() {
            "ok" => Ok(()),
            "not found" => {
                warn!(public_id, "hosted image was already gone");
                Ok(())
            }
            other => Err(MediaError::InvalidResponse(format!(
                "destroy returned '{other}'"
            ))),
        }
    }
}
