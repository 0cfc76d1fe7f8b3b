use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

pub const LOCAL_UPLOAD_CHANNEL: &str = "Local Upload";
pub const PDF_CONTENT_TYPE: &str = "application/pdf";

/// Which input box the user picked.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SourceKind {
    Youtube,
    Video,
    Audio,
    Document,
    /// Generic "quick process" upload; routed by the file's content type.
    Upload,
}

impl SourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceKind::Youtube => "youtube",
            SourceKind::Video => "video",
            SourceKind::Audio => "audio",
            SourceKind::Document => "document",
            SourceKind::Upload => "quick-process",
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MediaKind {
    Video,
    Audio,
}

impl MediaKind {
    pub fn source_kind(&self) -> SourceKind {
        match self {
            MediaKind::Video => SourceKind::Video,
            MediaKind::Audio => SourceKind::Audio,
        }
    }
}

/// A file handed over by the user, with the MIME type it was announced with.
#[derive(Clone, PartialEq, Eq)]
pub struct UploadedFile {
    pub name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl UploadedFile {
    pub fn new(name: impl Into<String>, content_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            content_type: content_type.into(),
            bytes,
        }
    }

    pub fn media_kind(&self) -> Option<MediaKind> {
        if self.content_type.starts_with("video/") {
            Some(MediaKind::Video)
        } else if self.content_type.starts_with("audio/") {
            Some(MediaKind::Audio)
        } else {
            None
        }
    }

    pub fn is_pdf(&self) -> bool {
        self.content_type == PDF_CONTENT_TYPE
    }
}

// Bytes are left out on purpose, uploads can be hundreds of megabytes.
impl fmt::Debug for UploadedFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UploadedFile")
            .field("name", &self.name)
            .field("content_type", &self.content_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VideoPreview {
    pub id: String,
    pub thumbnail_url: String,
    pub embed_url: String,
}

impl VideoPreview {
    /// Lower resolution thumbnail for when `maxresdefault` is missing.
    pub fn fallback_thumbnail_url(&self) -> String {
        format!("https://img.youtube.com/vi/{}/hqdefault.jpg", self.id)
    }

    pub fn watch_url(&self) -> String {
        format!("https://www.youtube.com/watch?v={}", self.id)
    }
}

/// The single active content source. Selecting another kind replaces it.
#[derive(Clone, Debug, PartialEq)]
pub enum ContentSource {
    YoutubeLink {
        url: String,
        preview: Option<VideoPreview>,
    },
    MediaUpload {
        media_kind: MediaKind,
        file: Option<UploadedFile>,
    },
    DocumentUpload {
        file: Option<UploadedFile>,
    },
    QuickUpload {
        file: Option<UploadedFile>,
    },
}

impl ContentSource {
    pub fn empty(kind: SourceKind) -> Self {
        match kind {
            SourceKind::Youtube => ContentSource::YoutubeLink {
                url: String::new(),
                preview: None,
            },
            SourceKind::Video => ContentSource::MediaUpload {
                media_kind: MediaKind::Video,
                file: None,
            },
            SourceKind::Audio => ContentSource::MediaUpload {
                media_kind: MediaKind::Audio,
                file: None,
            },
            SourceKind::Document => ContentSource::DocumentUpload { file: None },
            SourceKind::Upload => ContentSource::QuickUpload { file: None },
        }
    }

    pub fn kind(&self) -> SourceKind {
        match self {
            ContentSource::YoutubeLink { .. } => SourceKind::Youtube,
            ContentSource::MediaUpload { media_kind, .. } => media_kind.source_kind(),
            ContentSource::DocumentUpload { .. } => SourceKind::Document,
            ContentSource::QuickUpload { .. } => SourceKind::Upload,
        }
    }

    pub fn file(&self) -> Option<&UploadedFile> {
        match self {
            ContentSource::YoutubeLink { .. } => None,
            ContentSource::MediaUpload { file, .. }
            | ContentSource::DocumentUpload { file }
            | ContentSource::QuickUpload { file } => file.as_ref(),
        }
    }

    pub fn preview(&self) -> Option<&VideoPreview> {
        match self {
            ContentSource::YoutubeLink { preview, .. } => preview.as_ref(),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ProcessingOption {
    Transcript,
    Summary,
    Notes,
    Quiz,
}

impl ProcessingOption {
    pub const ALL: [ProcessingOption; 4] = [
        ProcessingOption::Transcript,
        ProcessingOption::Summary,
        ProcessingOption::Notes,
        ProcessingOption::Quiz,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProcessingOption::Transcript => "transcript",
            ProcessingOption::Summary => "summary",
            ProcessingOption::Notes => "notes",
            ProcessingOption::Quiz => "quiz",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ProcessingOptions {
    pub transcript: bool,
    pub summary: bool,
    pub notes: bool,
    pub quiz: bool,
}

impl Default for ProcessingOptions {
    fn default() -> Self {
        Self {
            transcript: true,
            summary: true,
            notes: false,
            quiz: false,
        }
    }
}

impl ProcessingOptions {
    pub fn none() -> Self {
        Self {
            transcript: false,
            summary: false,
            notes: false,
            quiz: false,
        }
    }

    pub fn from_enabled(enabled: &[ProcessingOption]) -> Self {
        let mut options = Self::none();
        for option in enabled {
            options.set(*option, true);
        }
        options
    }

    pub fn is_enabled(&self, option: ProcessingOption) -> bool {
        match option {
            ProcessingOption::Transcript => self.transcript,
            ProcessingOption::Summary => self.summary,
            ProcessingOption::Notes => self.notes,
            ProcessingOption::Quiz => self.quiz,
        }
    }

    pub fn set(&mut self, option: ProcessingOption, enabled: bool) {
        let slot = match option {
            ProcessingOption::Transcript => &mut self.transcript,
            ProcessingOption::Summary => &mut self.summary,
            ProcessingOption::Notes => &mut self.notes,
            ProcessingOption::Quiz => &mut self.quiz,
        };
        *slot = enabled;
    }

    pub fn toggle(&mut self, option: ProcessingOption) {
        self.set(option, !self.is_enabled(option));
    }

    pub fn any_enabled(&self) -> bool {
        ProcessingOption::ALL.iter().any(|o| self.is_enabled(*o))
    }
}

/// View/like counter. The backend sends numbers, numeric strings, or "N/A".
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Count {
    Known(u64),
    #[default]
    NotApplicable,
}

impl From<Value> for Count {
    fn from(value: Value) -> Self {
        match value {
            Value::Number(n) => n
                .as_u64()
                .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f as u64))
                .map(Count::Known)
                .unwrap_or(Count::NotApplicable),
            Value::String(s) => s
                .trim()
                .parse()
                .map(Count::Known)
                .unwrap_or(Count::NotApplicable),
            _ => Count::NotApplicable,
        }
    }
}

impl<'de> Deserialize<'de> for Count {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(Count::from)
    }
}

impl Serialize for Count {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Count::Known(n) => serializer.serialize_u64(*n),
            Count::NotApplicable => serializer.serialize_str("N/A"),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ResultMetadata {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub channel: Option<String>,
    #[serde(default)]
    pub views: Count,
    #[serde(default)]
    pub likes: Count,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct QuizQuestion {
    pub question: String,
    #[serde(default)]
    pub options: Vec<String>,
    #[serde(
        default,
        alias = "correct_answer",
        alias = "correctAnswer",
        deserialize_with = "lenient_text"
    )]
    pub answer: Option<String>,
}

/// Normalized result both backend endpoints are mapped into.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    #[serde(default)]
    pub metadata: ResultMetadata,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub transcript_preview: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub short_notes: Option<String>,
    #[serde(default)]
    pub questions: Option<Vec<QuizQuestion>>,
}

/// Accepts a string, a number, or a list of strings (joined line by line).
fn lenient_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Null => None,
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Array(items) => Some(
            items
                .iter()
                .map(|item| match item {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                })
                .collect::<Vec<_>>()
                .join("\n"),
        ),
        other @ Value::Object(_) => Some(other.to_string()),
    })
}
