use reqwest::{
    StatusCode,
    multipart::{Form, Part},
};
use serde::Deserialize;
use serde_json::Value;
use tracing::{info, warn};

use crate::{
    config::BackendConfig,
    error::{Result, SmartContentError},
    types::{AnalysisResult, Count, LOCAL_UPLOAD_CHANNEL, ResultMetadata, SourceKind, UploadedFile},
};

pub const FULL_ANALYSIS_FALLBACK: &str = "Failed to process video";
pub const TRANSCRIBE_FALLBACK: &str = "Failed to transcribe media";

/// A call that actually leaves the process.
#[derive(Clone, Debug, PartialEq)]
pub enum RemoteCall {
    FullAnalysis { url: String },
    Transcription { file: UploadedFile },
}

impl RemoteCall {
    pub fn endpoint(&self) -> &'static str {
        match self {
            RemoteCall::FullAnalysis { .. } => "full-analysis",
            RemoteCall::Transcription { .. } => "transcribe",
        }
    }
}

/// Body of a successful `/transcribe` call.
#[derive(Debug, Default, Deserialize)]
pub struct TranscriptionResponse {
    #[serde(rename = "Summary", default)]
    pub summary: Option<String>,
    #[serde(rename = "Full Transcription", default)]
    pub full_transcription: Option<String>,
}

#[derive(Clone, Debug)]
pub struct Dispatcher {
    client: reqwest::Client,
    config: BackendConfig,
}

impl Dispatcher {
    pub fn new(config: BackendConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    pub fn config(&self) -> &BackendConfig {
        &self.config
    }

    /// Execute the call, bounded by the configured timeout.
    pub async fn run(&self, call: &RemoteCall) -> Result<AnalysisResult> {
        match self.config.timeout {
            Some(limit) => tokio::time::timeout(limit, self.execute(call))
                .await
                .map_err(|_| SmartContentError::Timeout(limit))?,
            None => self.execute(call).await,
        }
    }

    /// Execute the call with no time bound.
    pub async fn execute(&self, call: &RemoteCall) -> Result<AnalysisResult> {
        let result = match call {
            RemoteCall::FullAnalysis { url } => self.full_analysis(url).await,
            RemoteCall::Transcription { file } => self.transcribe(file).await,
        };

        match &result {
            Ok(_) => info!(endpoint = call.endpoint(), "analysis request succeeded"),
            Err(e) => warn!(endpoint = call.endpoint(), error = %e, "analysis request failed"),
        }
        result
    }

    async fn full_analysis(&self, url: &str) -> Result<AnalysisResult> {
        info!(endpoint = "full-analysis", %url, "sending analysis request");

        let response = self
            .client
            .post(self.config.full_analysis_url())
            .header("Content-Type", "application/json")
            .json(&serde_json::json!({ "url": url }))
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(backend_error(status, &body, FULL_ANALYSIS_FALLBACK));
        }

        serde_json::from_str::<AnalysisResult>(&body).map_err(|e| {
            SmartContentError::MalformedResponse {
                endpoint: "full-analysis",
                reason: e.to_string(),
            }
        })
    }

    async fn transcribe(&self, file: &UploadedFile) -> Result<AnalysisResult> {
        info!(
            endpoint = "transcribe",
            file = %file.name,
            content_type = %file.content_type,
            bytes = file.bytes.len(),
            "sending transcription request"
        );

        let part = Part::bytes(file.bytes.clone())
            .file_name(file.name.clone())
            .mime_str(&file.content_type)?;
        let form = Form::new().part("file", part);

        let response = self
            .client
            .post(self.config.transcribe_url())
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(backend_error(status, &body, TRANSCRIBE_FALLBACK));
        }

        let transcription = serde_json::from_str::<TranscriptionResponse>(&body).map_err(|e| {
            SmartContentError::MalformedResponse {
                endpoint: "transcribe",
                reason: e.to_string(),
            }
        })?;

        Ok(normalize_transcription(&file.name, transcription))
    }
}

/// Map a `/transcribe` answer onto the shared result shape.
pub fn normalize_transcription(file_name: &str, response: TranscriptionResponse) -> AnalysisResult {
    AnalysisResult {
        metadata: local_upload_metadata(file_name),
        summary: response.summary.filter(|s| !s.is_empty()),
        transcript_preview: response.full_transcription.filter(|s| !s.is_empty()),
        short_notes: None,
        questions: None,
    }
}

/// Result for sources the backend cannot process yet.
pub fn placeholder_result(file: &UploadedFile, kind: SourceKind) -> AnalysisResult {
    AnalysisResult {
        metadata: local_upload_metadata(&file.name),
        summary: Some(format!(
            "This is a placeholder summary for your uploaded {kind}. In a production version, the file would be processed by the backend API."
        )),
        transcript_preview: Some(format!("Placeholder transcript for {}...", file.name)),
        short_notes: None,
        questions: None,
    }
}

fn local_upload_metadata(file_name: &str) -> ResultMetadata {
    ResultMetadata {
        title: Some(file_name.to_string()),
        channel: Some(LOCAL_UPLOAD_CHANNEL.to_string()),
        views: Count::NotApplicable,
        likes: Count::NotApplicable,
    }
}

fn backend_error(status: StatusCode, body: &str, fallback: &str) -> SmartContentError {
    SmartContentError::Backend {
        status: status.as_u16(),
        message: error_message_from_body(body, fallback),
    }
}

/// User-facing message from an error body: its `detail` field, or `fallback`.
pub fn error_message_from_body(body: &str, fallback: &str) -> String {
    let Ok(value) = serde_json::from_str::<Value>(body) else {
        return fallback.to_string();
    };

    match value.get("detail") {
        Some(Value::String(detail)) if !detail.trim().is_empty() => detail.clone(),
        // Validation failures arrive as a list of `{ "msg": ... }` entries.
        Some(Value::Array(items)) => {
            let messages: Vec<&str> = items
                .iter()
                .filter_map(|item| item.get("msg").and_then(Value::as_str))
                .collect();
            if messages.is_empty() {
                fallback.to_string()
            } else {
                messages.join("; ")
            }
        }
        _ => fallback.to_string(),
    }
}
