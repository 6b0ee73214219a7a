use chrono::{DateTime, Utc};
use weft_types::{Message, Part};

/// Whether the message carries anything besides reasoning. Reasoning alone
/// is never sent back upstream.
pub fn is_valid_to_upload(message: &Message) -> bool {
    message.parts.iter().any(|p| !p.is_reasoning())
}

/// Whether a composed input has nothing worth sending: every text is blank
/// and every attachment has an empty url. Other kinds count as empty.
pub fn is_empty_input_message(parts: &[Part]) -> bool {
    parts.iter().all(|part| match part {
        Part::Text { text, .. } => is_blank(text),
        Part::Image { url, .. } | Part::Video { url, .. } | Part::Document { url, .. } => {
            is_blank(url)
        }
        _ => true,
    })
}

/// Like [`is_empty_input_message`], except that reasoning with text counts
/// as content. Used to suppress rendering of empty bubbles.
pub fn is_empty_ui_message(parts: &[Part]) -> bool {
    parts.iter().all(|part| match part {
        Part::Reasoning { text, .. } => is_blank(text),
        Part::Text { text, .. } => is_blank(text),
        Part::Image { url, .. } | Part::Video { url, .. } | Part::Document { url, .. } => {
            is_blank(url)
        }
        _ => true,
    })
}

/// Returns a copy of `message` with every open reasoning part closed now.
/// Parts that are already closed keep their timestamp.
pub fn finish_reasoning(message: &Message) -> Message {
    Message {
        parts: close_open_reasoning(&message.parts, Utc::now()),
        ..message.clone()
    }
}

pub(crate) fn close_open_reasoning(parts: &[Part], now: DateTime<Utc>) -> Vec<Part> {
    parts
        .iter()
        .map(|part| match part {
            Part::Reasoning {
                text,
                created_at,
                finished_at: None,
                metadata,
            } => Part::Reasoning {
                text: text.clone(),
                created_at: *created_at,
                finished_at: Some(now),
                metadata: metadata.clone(),
            },
            other => other.clone(),
        })
        .collect()
}

fn is_blank(s: &str) -> bool {
    s.trim().is_empty()
}
