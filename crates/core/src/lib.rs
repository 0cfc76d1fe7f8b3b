//! Smart Content Core Library
//!
//! Resolves the user's content source, drives the single analysis request
//! against the backend service, and picks the result views to show.

pub mod classifier;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod format;
pub mod resolver;
pub mod runtime;
pub mod session;
pub mod tracker;
pub mod types;
pub mod views;

// Re-export commonly used items at crate root
pub use classifier::{Dispatch, classify};
pub use config::{BackendConfig, ConfigError};
pub use dispatcher::{Dispatcher, RemoteCall, error_message_from_body, normalize_transcription};
pub use error::{Result, SmartContentError};
pub use format::{format_count, format_preview, format_result_readable};
pub use resolver::{extract_video_id, resolve_video_link};
pub use runtime::{Completion, SessionHandle, spawn_session};
pub use session::{Command, Session, SessionSnapshot, Submission, SubmitRejected, Ticket};
pub use tracker::{ApiStatusTracker, Generation, RequestLifecycle};
pub use types::{
    AnalysisResult, ContentSource, Count, MediaKind, ProcessingOption, ProcessingOptions,
    QuizQuestion, ResultMetadata, SourceKind, UploadedFile, VideoPreview,
};
pub use views::{ResultTab, TabContent, available_tabs, default_tab, tab_content};
