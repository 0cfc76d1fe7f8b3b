//! Video link recognition.
//!
//! Finds the 11 character video identifier in the usual link shapes
//! (`youtu.be/ID`, `/embed/ID`, `watch?v=ID`, `&v=ID`, `/v/ID`, `/u/x/ID`)
//! and turns it into a [`VideoPreview`]. Anything else resolves to `None`.

use std::sync::LazyLock;

use regex::Regex;

use crate::types::VideoPreview;

pub const VIDEO_ID_LEN: usize = 11;

// Greedy prefix, so the right-most marker on the first line wins.
static VIDEO_LINK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^.*(youtu.be/|v/|u/[0-9A-Za-z_]/|embed/|watch\?v=|&v=)([^#&?]*).*")
        .expect("video link pattern is valid")
});

/// Resolve a raw link into a preview. Pure and idempotent.
pub fn resolve_video_link(url: &str) -> Option<VideoPreview> {
    extract_video_id(url).map(|id| build_preview(&id))
}

pub fn build_preview(id: &str) -> VideoPreview {
    VideoPreview {
        id: id.to_string(),
        thumbnail_url: format!("https://img.youtube.com/vi/{id}/maxresdefault.jpg"),
        embed_url: format!("https://www.youtube.com/embed/{id}"),
    }
}

/// Extract the video identifier.
///
/// When several markers occur, the right-most one wins. The identifier runs
/// up to the first `#`, `&` or `?` and must be exactly [`VIDEO_ID_LEN`]
/// characters long.
pub fn extract_video_id(url: &str) -> Option<String> {
    let token = VIDEO_LINK.captures(url)?.get(2)?.as_str();
    (token.chars().count() == VIDEO_ID_LEN).then(|| token.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const ID: &str = "dQw4w9WgXcQ";

    #[test]
    fn test_watch_url() {
        let preview = resolve_video_link("https://www.youtube.com/watch?v=dQw4w9WgXcQ").unwrap();
        assert_eq!(preview.id, ID);
        assert!(preview.thumbnail_url.contains(ID));
        assert_eq!(
            preview.thumbnail_url,
            "https://img.youtube.com/vi/dQw4w9WgXcQ/maxresdefault.jpg"
        );
        assert_eq!(preview.embed_url, "https://www.youtube.com/embed/dQw4w9WgXcQ");
    }

    #[test]
    fn test_link_forms() {
        let links = [
            "https://youtu.be/dQw4w9WgXcQ",
            "https://youtu.be/dQw4w9WgXcQ?t=30",
            "https://www.youtube.com/embed/dQw4w9WgXcQ",
            "https://www.youtube.com/v/dQw4w9WgXcQ",
            "https://m.youtube.com/watch?v=dQw4w9WgXcQ",
            "https://www.youtube.com/watch?feature=share&v=dQw4w9WgXcQ",
            "https://www.youtube.com/watch?v=dQw4w9WgXcQ&list=PLrAXtmRdnEQy4qtr",
            "https://www.youtube.com/watch?v=dQw4w9WgXcQ#t=10",
            "https://www.youtube.com/u/a/dQw4w9WgXcQ",
            "youtube.com/watch?v=dQw4w9WgXcQ",
        ];

        for link in links {
            assert_eq!(extract_video_id(link).as_deref(), Some(ID), "link: {link}");
        }
    }

    #[test]
    fn test_unrecognized_links() {
        let links = [
            "",
            "not a url",
            "https://www.youtube.com",
            "https://www.youtube.com/playlist?list=PLrAXtmRdnEQy4qtr",
            "https://www.youtube.com/watch?v=short",
            "https://www.youtube.com/watch?v=dQw4w9WgXcQextra",
            "https://www.youtube.com/embed/dQw4w9WgXcQ/extra",
            "https://vimeo.com/123456789",
        ];

        for link in links {
            assert_eq!(resolve_video_link(link), None, "link: {link}");
        }
    }

    #[test]
    fn test_rightmost_marker_wins() {
        // Redirect-style link carrying a second watch query.
        let link = "https://www.youtube.com/watch?v=aaaaaaaaaaa&v=dQw4w9WgXcQ";
        assert_eq!(extract_video_id(link).as_deref(), Some(ID));
    }

    #[test]
    fn test_short_link_host_allows_any_separator() {
        assert_eq!(
            extract_video_id("https://youtué.be/dQw4w9WgXcQ").as_deref(),
            Some(ID)
        );
        assert_eq!(extract_video_id("https://youtu-be/dQw4w9WgXcQ").as_deref(), Some(ID));
    }

    #[test]
    fn test_marker_must_be_on_first_line() {
        assert_eq!(extract_video_id("notes\nhttps://youtu.be/dQw4w9WgXcQ"), None);
    }

    #[test]
    fn test_resolution_is_idempotent() {
        let link = "https://youtu.be/dQw4w9WgXcQ";
        assert_eq!(resolve_video_link(link), resolve_video_link(link));
    }

    #[test]
    fn test_fallback_thumbnail_uses_same_id() {
        let preview = build_preview(ID);
        assert_eq!(
            preview.fallback_thumbnail_url(),
            "https://img.youtube.com/vi/dQw4w9WgXcQ/hqdefault.jpg"
        );
        assert_eq!(preview.watch_url(), "https://www.youtube.com/watch?v=dQw4w9WgXcQ");
    }
}
