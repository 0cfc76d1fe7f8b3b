use crate::types::{AnalysisResult, ProcessingOption, ProcessingOptions, QuizQuestion};

pub const NO_SUMMARY: &str = "No summary available";
pub const NO_TRANSCRIPT: &str = "No transcript available";
pub const NO_NOTES: &str = "Key notes feature will be available in the next update.";
pub const NO_QUESTIONS: &str = "No quiz questions available.";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ResultTab {
    Summary,
    Transcript,
    Notes,
    Quiz,
}

impl ResultTab {
    /// Display priority.
    pub const ORDER: [ResultTab; 4] = [
        ResultTab::Summary,
        ResultTab::Transcript,
        ResultTab::Notes,
        ResultTab::Quiz,
    ];

    pub fn option(&self) -> ProcessingOption {
        match self {
            ResultTab::Summary => ProcessingOption::Summary,
            ResultTab::Transcript => ProcessingOption::Transcript,
            ResultTab::Notes => ProcessingOption::Notes,
            ResultTab::Quiz => ProcessingOption::Quiz,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ResultTab::Summary => "Summary",
            ResultTab::Transcript => "Transcript",
            ResultTab::Notes => "Notes",
            ResultTab::Quiz => "Quiz",
        }
    }

    pub fn heading(&self) -> &'static str {
        match self {
            ResultTab::Summary => "Content Summary",
            ResultTab::Transcript => "Transcript",
            ResultTab::Notes => "Key Notes",
            ResultTab::Quiz => "Knowledge Quiz",
        }
    }
}

pub fn available_tabs(options: &ProcessingOptions) -> Vec<ResultTab> {
    ResultTab::ORDER
        .into_iter()
        .filter(|tab| options.is_enabled(tab.option()))
        .collect()
}

/// `summary` when enabled, else the first available tab.
pub fn default_tab(options: &ProcessingOptions) -> Option<ResultTab> {
    available_tabs(options).first().copied()
}

#[derive(Clone, Debug, PartialEq)]
pub enum TabContent<'a> {
    Text(&'a str),
    /// Transcript preview; `truncated` when the backend cut it short.
    Transcript { text: &'a str, truncated: bool },
    Questions(&'a [QuizQuestion]),
    /// The field is missing; show the fixed fallback.
    Empty(&'static str),
}

pub fn tab_content(tab: ResultTab, result: &AnalysisResult) -> TabContent<'_> {
    match tab {
        ResultTab::Summary => result
            .summary
            .as_deref()
            .map(TabContent::Text)
            .unwrap_or(TabContent::Empty(NO_SUMMARY)),
        ResultTab::Transcript => result
            .transcript_preview
            .as_deref()
            .map(|text| TabContent::Transcript {
                text,
                truncated: text.ends_with("..."),
            })
            .unwrap_or(TabContent::Empty(NO_TRANSCRIPT)),
        ResultTab::Notes => result
            .short_notes
            .as_deref()
            .filter(|notes| !notes.is_empty())
            .map(TabContent::Text)
            .unwrap_or(TabContent::Empty(NO_NOTES)),
        ResultTab::Quiz => match result.questions.as_deref() {
            Some(questions) if !questions.is_empty() => TabContent::Questions(questions),
            _ => TabContent::Empty(NO_QUESTIONS),
        },
    }
}
