//! Session state machine.
//!
//! Every user action is a [`Command`]. The session owns the selected source,
//! the processing options, the request tracker and the active result tab.
//! Network work is never done here: a submit that needs the backend yields a
//! [`Ticket`] which the caller executes and reports back through
//! [`Session::complete`].

use tracing::{debug, info};
use uuid::Uuid;

use crate::{
    classifier::{Dispatch, classify},
    dispatcher::{RemoteCall, placeholder_result},
    resolver::resolve_video_link,
    tracker::{ApiStatusTracker, Generation, RequestLifecycle},
    types::{
        AnalysisResult, ContentSource, ProcessingOption, ProcessingOptions, SourceKind,
        UploadedFile, VideoPreview,
    },
    views::{ResultTab, available_tabs, default_tab},
};

#[derive(Clone, Debug)]
pub enum Command {
    SelectSource(SourceKind),
    SetUrl(String),
    ChooseFile(UploadedFile),
    ToggleOption(ProcessingOption),
    SelectTab(ResultTab),
    Submit,
    /// "New analysis".
    Reset,
}

/// A backend call the session is waiting on.
#[derive(Clone, Debug)]
pub struct Ticket {
    pub generation: Generation,
    pub request_id: Uuid,
    pub call: RemoteCall,
}

#[derive(Debug)]
pub enum Submission {
    Dispatched(Ticket),
    /// Answered locally, the tracker is already settled.
    Resolved,
    /// Handed to the document chat assistant; the tracker is untouched.
    DocumentChat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SubmitRejected {
    #[error("a request is already in flight")]
    InFlight,
    #[error("no content source selected")]
    NoSource,
    #[error("the selected source is not ready to submit")]
    NotReady,
}

/// Presentation view of a session.
#[derive(Clone, Debug, PartialEq)]
pub struct SessionSnapshot {
    pub source_kind: Option<SourceKind>,
    pub url: Option<String>,
    pub preview: Option<VideoPreview>,
    pub file_name: Option<String>,
    pub options: ProcessingOptions,
    pub lifecycle: RequestLifecycle,
    pub tabs: Vec<ResultTab>,
    pub active_tab: Option<ResultTab>,
    pub can_submit: bool,
    pub document_chat: Option<String>,
}

impl Default for SessionSnapshot {
    fn default() -> Self {
        Session::new().snapshot()
    }
}

#[derive(Debug)]
pub struct Session {
    source: Option<ContentSource>,
    options: ProcessingOptions,
    tracker: ApiStatusTracker,
    active_tab: Option<ResultTab>,
    document_chat: Option<String>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Self::with_options(ProcessingOptions::default())
    }

    pub fn with_options(options: ProcessingOptions) -> Self {
        Self {
            source: None,
            options,
            tracker: ApiStatusTracker::new(),
            active_tab: default_tab(&options),
            document_chat: None,
        }
    }

    pub fn source(&self) -> Option<&ContentSource> {
        self.source.as_ref()
    }

    pub fn options(&self) -> &ProcessingOptions {
        &self.options
    }

    pub fn lifecycle(&self) -> &RequestLifecycle {
        self.tracker.lifecycle()
    }

    pub fn active_tab(&self) -> Option<ResultTab> {
        self.active_tab
    }

    pub fn document_chat(&self) -> Option<&str> {
        self.document_chat.as_deref()
    }

    /// Apply a command. Returns the ticket of a backend call to run, if any.
    pub fn apply(&mut self, command: Command) -> Option<Ticket> {
        match command {
            Command::SelectSource(kind) => self.select_source(kind),
            Command::SetUrl(url) => self.set_url(url),
            Command::ChooseFile(file) => self.choose_file(file),
            Command::ToggleOption(option) => self.toggle_option(option),
            Command::SelectTab(tab) => self.select_tab(tab),
            Command::Reset => self.reset(),
            Command::Submit => match self.submit() {
                Ok(Submission::Dispatched(ticket)) => return Some(ticket),
                Ok(_) => {}
                Err(reason) => debug!(%reason, "submit rejected"),
            },
        }
        None
    }

    /// Replace the active source with an empty one of `kind`.
    pub fn select_source(&mut self, kind: SourceKind) {
        self.abandon_request();
        self.document_chat = None;
        self.source = Some(ContentSource::empty(kind));
        debug!(%kind, "source selected");
    }

    /// Update the link text and recompute its preview.
    pub fn set_url(&mut self, new_url: String) {
        let Some(ContentSource::YoutubeLink { url, preview }) = self.source.as_mut() else {
            debug!("url ignored, active source is not a video link");
            return;
        };

        *preview = resolve_video_link(&new_url);
        *url = new_url;
        let resolved = preview.is_some();
        self.abandon_request();
        debug!(resolved, "video link updated");
    }

    pub fn choose_file(&mut self, new_file: UploadedFile) {
        let slot = match self.source.as_mut() {
            Some(
                ContentSource::MediaUpload { file, .. }
                | ContentSource::DocumentUpload { file }
                | ContentSource::QuickUpload { file },
            ) => file,
            _ => {
                debug!(file = %new_file.name, "file ignored, active source takes no upload");
                return;
            }
        };

        debug!(file = ?new_file, "file chosen");
        *slot = Some(new_file);
        self.document_chat = None;
        self.abandon_request();
    }

    pub fn toggle_option(&mut self, option: ProcessingOption) {
        self.options.toggle(option);
        let tabs = available_tabs(&self.options);
        if !self.active_tab.is_some_and(|tab| tabs.contains(&tab)) {
            self.active_tab = default_tab(&self.options);
        }
    }

    /// Unavailable tabs are ignored.
    pub fn select_tab(&mut self, tab: ResultTab) {
        if available_tabs(&self.options).contains(&tab) {
            self.active_tab = Some(tab);
        }
    }

    pub fn can_submit(&self) -> bool {
        !self.tracker.is_loading() && self.source.as_ref().and_then(classify).is_some()
    }

    pub fn submit(&mut self) -> Result<Submission, SubmitRejected> {
        if self.tracker.is_loading() {
            return Err(SubmitRejected::InFlight);
        }
        let source = self.source.as_ref().ok_or(SubmitRejected::NoSource)?;
        let dispatch = classify(source).ok_or(SubmitRejected::NotReady)?;

        match dispatch {
            Dispatch::FullAnalysis { url } => self.dispatch(RemoteCall::FullAnalysis { url }),
            Dispatch::Transcription { file } => self.dispatch(RemoteCall::Transcription { file }),
            Dispatch::Placeholder { file, kind } => {
                let generation = self.tracker.begin().ok_or(SubmitRejected::InFlight)?;
                self.complete(generation, Ok(placeholder_result(&file, kind)));
                info!(%kind, file = %file.name, "resolved with placeholder result");
                Ok(Submission::Resolved)
            }
            Dispatch::DocumentChat { file } => {
                info!(file = %file.name, "handing document to chat assistant");
                self.document_chat = Some(file.name);
                Ok(Submission::DocumentChat)
            }
        }
    }

    fn dispatch(&mut self, call: RemoteCall) -> Result<Submission, SubmitRejected> {
        let generation = self.tracker.begin().ok_or(SubmitRejected::InFlight)?;
        let ticket = Ticket {
            generation,
            request_id: Uuid::new_v4(),
            call,
        };
        info!(
            request_id = %ticket.request_id,
            %generation,
            endpoint = ticket.call.endpoint(),
            "request dispatched"
        );
        Ok(Submission::Dispatched(ticket))
    }

    /// Settle the request tagged `generation`. Stale completions return `false`.
    pub fn complete(
        &mut self,
        generation: Generation,
        outcome: Result<AnalysisResult, String>,
    ) -> bool {
        let applied = self.tracker.complete(generation, outcome);
        if applied && self.tracker.lifecycle().result().is_some() {
            self.active_tab = default_tab(&self.options);
        }
        applied
    }

    /// Start over: no source, tracker idle. Options are kept.
    pub fn reset(&mut self) {
        self.source = None;
        self.document_chat = None;
        self.tracker.reset();
        self.active_tab = default_tab(&self.options);
        debug!("session reset");
    }

    // A result or pending call belongs to the selection that produced it.
    fn abandon_request(&mut self) {
        if !matches!(self.tracker.lifecycle(), RequestLifecycle::Idle) {
            debug!(
                state = self.tracker.lifecycle().name(),
                "selection changed, dropping request state"
            );
            self.tracker.reset();
        }
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let (url, preview) = match &self.source {
            Some(ContentSource::YoutubeLink { url, preview }) => {
                (Some(url.clone()), preview.clone())
            }
            _ => (None, None),
        };

        SessionSnapshot {
            source_kind: self.source.as_ref().map(ContentSource::kind),
            url,
            preview,
            file_name: self
                .source
                .as_ref()
                .and_then(ContentSource::file)
                .map(|f| f.name.clone()),
            options: self.options,
            lifecycle: self.tracker.lifecycle().clone(),
            tabs: available_tabs(&self.options),
            active_tab: self.active_tab,
            can_submit: self.can_submit(),
            document_chat: self.document_chat.clone(),
        }
    }
}
