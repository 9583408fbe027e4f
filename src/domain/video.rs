//! Video reference parsing

use regex::Regex;

const VIDEO_URL_PATTERN: &str = r"^.*(youtu.be/|v/|u/\w/|embed/|watch\?v=|&v=)([^#&?]*).*";
const VIDEO_ID_LEN: usize = 11;

/// Extract the 11-character video id from a watch, share or embed URL.
pub fn extract_video_id(url: &str) -> Option<String> {
    let re = Regex::new(VIDEO_URL_PATTERN).ok()?;
    let id = re.captures(url)?.get(2)?.as_str();
    (id.chars().count() == VIDEO_ID_LEN).then(|| id.to_string())
}

pub fn embed_url(video_id: &str) -> String {
    format!("https://www.youtube.com/embed/{video_id}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("https://www.youtube.com/watch?v=dQw4w9WgXcQ", Some("dQw4w9WgXcQ"))]
    #[case("https://youtu.be/dQw4w9WgXcQ", Some("dQw4w9WgXcQ"))]
    #[case("https://youtu.be/dQw4w9WgXcQ?t=42", Some("dQw4w9WgXcQ"))]
    #[case("https://www.youtube.com/embed/dQw4w9WgXcQ", Some("dQw4w9WgXcQ"))]
    #[case("https://www.youtube.com/watch?feature=share&v=dQw4w9WgXcQ", Some("dQw4w9WgXcQ"))]
    #[case("https://www.youtube.com/watch?v=short", None)]
    #[case("https://example.com/video.mp4", None)]
    #[case("", None)]
    fn extracts_eleven_character_ids(#[case] url: &str, #[case] expected: Option<&str>) {
        assert_eq!(extract_video_id(url).as_deref(), expected);
    }

    #[test]
    fn embed_url_uses_embed_path() {
        assert_eq!(
            embed_url("dQw4w9WgXcQ"),
            "https://www.youtube.com/embed/dQw4w9WgXcQ"
        );
    }
}
