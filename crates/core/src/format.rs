use crate::{
    types::{AnalysisResult, Count, QuizQuestion, VideoPreview},
    views::{ResultTab, TabContent, tab_content},
};

pub const DEFAULT_TITLE: &str = "Content Results";

/// Format a count with thousands separators (1234567 -> "1,234,567")
pub fn format_count(n: u64) -> String {
    let digits = n.to_string();
    let mut output = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            output.push(',');
        }
        output.push(ch);
    }
    output
}

/// Header lines: title, channel, and the known counters.
pub fn format_header(result: &AnalysisResult) -> String {
    let meta = &result.metadata;
    let mut output = String::new();

    output.push_str(&format!(
        "# {}\n",
        meta.title.as_deref().unwrap_or(DEFAULT_TITLE)
    ));
    if let Some(channel) = meta.channel.as_deref().filter(|c| !c.is_empty()) {
        output.push_str(&format!("{}\n", channel));
    }

    let mut badges = Vec::new();
    if let Count::Known(views) = meta.views {
        badges.push(format!("{} views", format_count(views)));
    }
    if let Count::Known(likes) = meta.likes {
        badges.push(format!("{} likes", format_count(likes)));
    }
    if !badges.is_empty() {
        output.push_str(&format!("{}\n", badges.join(" | ")));
    }

    output
}

pub fn format_tab_strip(tabs: &[ResultTab], active: Option<ResultTab>) -> String {
    tabs.iter()
        .map(|tab| {
            if Some(*tab) == active {
                format!("[{}]", tab.label())
            } else {
                tab.label().to_string()
            }
        })
        .collect::<Vec<_>>()
        .join("  ")
}

pub fn format_questions(questions: &[QuizQuestion]) -> String {
    let mut output = String::new();
    for (i, q) in questions.iter().enumerate() {
        output.push_str(&format!("{}. {}\n", i + 1, q.question));
        for (j, option) in q.options.iter().enumerate() {
            let letter = char::from(b'a' + (j % 26) as u8);
            output.push_str(&format!("   {}) {}\n", letter, option));
        }
        if let Some(answer) = &q.answer {
            output.push_str(&format!("   Answer: {}\n", answer));
        }
        output.push('\n');
    }
    output
}

/// Render one tab's body.
pub fn format_tab(tab: ResultTab, result: &AnalysisResult) -> String {
    let mut output = format!("## {}\n\n", tab.heading());

    match tab_content(tab, result) {
        TabContent::Text(text) => output.push_str(text),
        TabContent::Transcript { text, truncated } => {
            output.push_str(text);
            if truncated {
                output.push_str("\n\n(preview only, the full transcript is longer)");
            }
        }
        TabContent::Questions(questions) => output.push_str(format_questions(questions).trim_end()),
        TabContent::Empty(fallback) => output.push_str(fallback),
    }
    output.push('\n');
    output
}

/// Format an analysis result as human-readable markdown
pub fn format_result_readable(
    result: &AnalysisResult,
    tabs: &[ResultTab],
    shown: &[ResultTab],
    active: Option<ResultTab>,
) -> String {
    let mut output = format_header(result);
    output.push('\n');

    if tabs.is_empty() {
        output.push_str("No result sections were requested.\n");
        return output;
    }

    output.push_str(&format_tab_strip(tabs, active));
    output.push_str("\n\n");

    for tab in shown {
        output.push_str(&format_tab(*tab, result));
        output.push('\n');
    }

    output
}

pub fn format_preview(preview: &VideoPreview) -> String {
    format!(
        "Video {}\n  thumbnail: {}\n  fallback:  {}\n  embed:     {}\n  open:      {}\n",
        preview.id,
        preview.thumbnail_url,
        preview.fallback_thumbnail_url(),
        preview.embed_url,
        preview.watch_url()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ResultMetadata;

    #[test]
    fn test_format_count() {
        assert_eq!(format_count(0), "0");
        assert_eq!(format_count(999), "999");
        assert_eq!(format_count(1000), "1,000");
        assert_eq!(format_count(1234567), "1,234,567");
    }

    #[test]
    fn test_header_hides_unknown_counters() {
        let result = AnalysisResult {
            metadata: ResultMetadata {
                title: Some("lecture.mp4".to_string()),
                channel: Some("Local Upload".to_string()),
                views: Count::NotApplicable,
                likes: Count::NotApplicable,
            },
            ..AnalysisResult::default()
        };
        assert_eq!(format_header(&result), "# lecture.mp4\nLocal Upload\n");

        let result = AnalysisResult {
            metadata: ResultMetadata {
                views: Count::Known(1500),
                ..ResultMetadata::default()
            },
            ..AnalysisResult::default()
        };
        assert_eq!(format_header(&result), "# Content Results\n1,500 views\n");
    }

    #[test]
    fn test_readable_output_marks_active_tab() {
        let result = AnalysisResult {
            summary: Some("Short version.".to_string()),
            ..AnalysisResult::default()
        };
        let tabs = [ResultTab::Summary, ResultTab::Quiz];
        let text = format_result_readable(
            &result,
            &tabs,
            &[ResultTab::Summary],
            Some(ResultTab::Summary),
        );

        assert!(text.contains("[Summary]  Quiz"));
        assert!(text.contains("## Content Summary\n\nShort version."));
        assert!(!text.contains("Knowledge Quiz"));
    }

    #[test]
    fn test_quiz_rendering() {
        let questions = vec![QuizQuestion {
            question: "2 + 2?".to_string(),
            options: vec!["3".to_string(), "4".to_string()],
            answer: Some("4".to_string()),
        }];
        assert_eq!(
            format_questions(&questions),
            "1. 2 + 2?\n   a) 3\n   b) 4\n   Answer: 4\n\n"
        );
    }
}
