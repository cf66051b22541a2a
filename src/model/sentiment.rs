//! Sentiment label to icon mapping

/// Icon shown next to a review
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SentimentIcon {
    Positive,
    Neutral,
    Negative,
}

impl SentimentIcon {
    /// Terminal glyph for the icon
    pub fn glyph(&self) -> &'static str {
        match self {
            SentimentIcon::Positive => "☺",
            SentimentIcon::Neutral => "😐",
            SentimentIcon::Negative => "☹",
        }
    }
}

/// Resolve a sentiment label to its icon
///
/// Only the exact labels `positive` and `negative` are recognised; anything
/// else, missing labels included, falls back to neutral.
pub fn resolve_icon(label: Option<&str>) -> SentimentIcon {
    match label {
        Some("positive") => SentimentIcon::Positive,
        Some("negative") => SentimentIcon::Negative,
        _ => SentimentIcon::Neutral,
    }
}
