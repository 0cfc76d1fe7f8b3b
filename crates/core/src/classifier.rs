use crate::types::{ContentSource, MediaKind, SourceKind, UploadedFile};

/// What a submit of the current source turns into.
#[derive(Clone, Debug, PartialEq)]
pub enum Dispatch {
    /// `POST /api/full-analysis` with the link.
    FullAnalysis { url: String },
    /// `POST /transcribe` with the media file.
    Transcription { file: UploadedFile },
    /// No backend support yet; answered locally.
    Placeholder { file: UploadedFile, kind: SourceKind },
    /// PDFs go to the document chat assistant instead of the analysis service.
    DocumentChat { file: UploadedFile },
}

impl Dispatch {
    pub fn endpoint(&self) -> &'static str {
        match self {
            Dispatch::FullAnalysis { .. } => "full-analysis",
            Dispatch::Transcription { .. } => "transcribe",
            Dispatch::Placeholder { .. } => "placeholder",
            Dispatch::DocumentChat { .. } => "document-chat",
        }
    }
}

/// Route the selected source. `None` while it is not submittable yet
/// (unresolved link, no file chosen).
pub fn classify(source: &ContentSource) -> Option<Dispatch> {
    match source {
        ContentSource::YoutubeLink { url, preview } => preview.as_ref().map(|_| {
            Dispatch::FullAnalysis {
                url: url.trim().to_string(),
            }
        }),
        ContentSource::MediaUpload { file, .. } => file
            .as_ref()
            .map(|file| Dispatch::Transcription { file: file.clone() }),
        ContentSource::DocumentUpload { file } => file.as_ref().map(|file| {
            if file.is_pdf() {
                Dispatch::DocumentChat { file: file.clone() }
            } else {
                Dispatch::Placeholder {
                    file: file.clone(),
                    kind: SourceKind::Document,
                }
            }
        }),
        ContentSource::QuickUpload { file } => file.as_ref().map(|file| match file.media_kind() {
            Some(MediaKind::Video | MediaKind::Audio) => {
                Dispatch::Transcription { file: file.clone() }
            }
            None => Dispatch::Placeholder {
                file: file.clone(),
                kind: SourceKind::Upload,
            },
        }),
    }
}
