/**
 * HTTP Content Classifier
 *
 * Calls the classifier service configured by `AI_API_URL`. One client is
 * built at startup and shared; the per-call timeout comes from
 * `AI_TIMEOUT_SECS`.
 */

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde_json::{json, Value};

use crate::backend::moderation::{
    Classification, ClassifierError, ClassifierInput, ContentClassifier,
};
use crate::backend::server::config::ClassifierSettings;

#[derive(Debug, Clone)]
pub struct HttpClassifier {
    client: reqwest::Client,
    url: String,
}

impl HttpClassifier {
    pub fn new(settings: &ClassifierSettings) -> Result<Self, ClassifierError> {
        let client = reqwest::Client::builder()
            .timeout(settings.timeout)
            .build()?;

        Ok(Self {
            client,
            url: settings.url.clone(),
        })
    }
}

/// Read the verdict out of a classifier response body
fn parse_classification(body: Value) -> Result<Classification, ClassifierError> {
    let label = body
        .get("predicted_label")
        .and_then(Value::as_str)
        .ok_or_else(|| ClassifierError::Malformed("missing predicted_label".to_string()))?
        .to_string();

    let confidence = body.get("confidence").and_then(Value::as_f64);

    Ok(Classification {
        label,
        confidence,
        metadata: body,
    })
}

#[async_trait]
impl ContentClassifier for HttpClassifier {
    async fn classify(&self, input: ClassifierInput<'_>) -> Result<Classification, ClassifierError> {
        let request = match input {
            ClassifierInput::Text(text) => self.client.post(&self.url).json(&json!({ "text": text })),
            ClassifierInput::File(attachment) => {
                let part = Part::bytes(attachment.bytes.to_vec())
                    .file_name(attachment.file_name.clone())
                    .mime_str(&attachment.content_type)?;
                self.client
                    .post(&self.url)
                    .multipart(Form::new().part("file", part))
            }
        };

        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<Value>(&body)
                .ok()
                .and_then(|v| v.get("message").and_then(Value::as_str).map(str::to_string))
                .unwrap_or_else(|| format!("Classifier returned status {}", status.as_u16()));

            return Err(ClassifierError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| ClassifierError::Malformed(e.to_string()))?;

        let verdict = parse_classification(body)?;
        tracing::info!(
            input = input.kind(),
            label = %verdict.label,
            confidence = ?verdict.confidence,
            "Content classified"
        );

        Ok(verdict)
    }
}
