//! Folding of streamed deltas into the message being produced.
//!
//! Every function here takes the current state by reference and returns a new
//! value; nothing is shared between the input and the output.

use chrono::Utc;
use weft_types::{Message, Metadata, Part, IMAGE_DATA_URI_PREFIX};

use crate::lifecycle::close_open_reasoning;

/// Folds one incoming delta part into an existing part list.
///
/// Text, image and reasoning deltas extend the first part of their kind.
/// Tool calls are correlated by id; a fragment without an id continues the
/// most recently appended tool call. Tool results, videos and documents are
/// not streamed in fragments and are appended as-is. Unknown kinds are logged
/// and ignored.
pub fn merge_part(existing: &[Part], incoming: &Part) -> Vec<Part> {
    let mut parts = existing.to_vec();

    match incoming {
        Part::Text { text, .. } => match parts.iter_mut().find(|p| matches!(p, Part::Text { .. })) {
            Some(Part::Text { text: current, .. }) => current.push_str(text),
            _ => parts.push(incoming.clone()),
        },
        Part::Image { url, metadata } => {
            match parts.iter_mut().find(|p| matches!(p, Part::Image { .. })) {
                Some(Part::Image {
                    url: current,
                    metadata: current_metadata,
                }) => {
                    current.push_str(url);
                    *current_metadata = metadata.clone();
                }
                // The first fragment is raw base64; the data URI prefix is
                // added here and never again.
                _ => parts.push(Part::Image {
                    url: format!("{IMAGE_DATA_URI_PREFIX}{url}"),
                    metadata: metadata.clone(),
                }),
            }
        }
        Part::Reasoning { text, metadata, .. } => {
            match parts.iter_mut().find(|p| matches!(p, Part::Reasoning { .. })) {
                Some(Part::Reasoning {
                    text: current,
                    finished_at,
                    metadata: current_metadata,
                    ..
                }) => {
                    current.push_str(text);
                    *finished_at = None;
                    if metadata.is_some() {
                        *current_metadata = metadata.clone();
                    }
                }
                _ => parts.push(incoming.clone()),
            }
        }
        Part::ToolCall { .. } => merge_tool_call(&mut parts, incoming),
        Part::ToolResult { .. } | Part::Video { .. } | Part::Document { .. } => {
            parts.push(incoming.clone())
        }
        Part::Unknown => {
            tracing::warn!(
                existing_parts = existing.len(),
                "ignoring delta part of unrecognized kind"
            );
        }
    }

    parts
}

/// Correlates a tool call fragment with the calls already in `parts`.
///
/// NOTE: a fragment without an id always continues the most recently
/// appended call. A provider interleaving fragments of two parallel calls
/// without ids would have them misattributed; no provider in use does this.
fn merge_tool_call(parts: &mut Vec<Part>, incoming: &Part) {
    let Part::ToolCall { id, .. } = incoming else {
        return;
    };

    let target = if id.is_empty() {
        parts.iter().rposition(Part::is_tool_call)
    } else {
        parts
            .iter()
            .position(|p| matches!(p, Part::ToolCall { id: existing, .. } if existing == id))
            .or_else(|| last_unidentified_tool_call(parts))
    };

    match target {
        Some(index) => parts[index] = merged_tool_call(&parts[index], incoming),
        None => parts.push(incoming.clone()),
    }
}

/// The most recent tool call, if it is still waiting for its id.
fn last_unidentified_tool_call(parts: &[Part]) -> Option<usize> {
    let index = parts.iter().rposition(Part::is_tool_call)?;
    match &parts[index] {
        Part::ToolCall { id, .. } if id.is_empty() => Some(index),
        _ => None,
    }
}

/// Merges two fragments of the same call. The existing id wins unless it
/// was never assigned; name and arguments are concatenated; metadata is last
/// write wins.
fn merged_tool_call(existing: &Part, incoming: &Part) -> Part {
    match (existing, incoming) {
        (
            Part::ToolCall {
                id,
                name,
                arguments,
                metadata,
            },
            Part::ToolCall {
                id: new_id,
                name: new_name,
                arguments: new_arguments,
                metadata: new_metadata,
            },
        ) => Part::ToolCall {
            id: if id.is_empty() { new_id.clone() } else { id.clone() },
            name: format!("{name}{new_name}"),
            arguments: format!("{arguments}{new_arguments}"),
            metadata: pick_metadata(metadata, new_metadata),
        },
        _ => existing.clone(),
    }
}

fn pick_metadata(existing: &Option<Metadata>, incoming: &Option<Metadata>) -> Option<Metadata> {
    incoming.clone().or_else(|| existing.clone())
}

/// Folds every part of `delta` into `message` and returns the result.
///
/// After the fold, a reasoning part that the delta no longer extends is
/// closed: the model stopped thinking and started answering. Annotations in
/// the delta replace the existing list; an empty list keeps it.
pub fn merge_delta(message: &Message, delta: &Message) -> Message {
    let mut parts = delta
        .parts
        .iter()
        .fold(message.parts.clone(), |acc, part| merge_part(&acc, part));

    if message.has_reasoning() && !delta.has_reasoning() {
        parts = close_open_reasoning(&parts, Utc::now());
    }

    let annotations = if delta.annotations.is_empty() {
        message.annotations.clone()
    } else {
        delta.annotations.clone()
    };

    Message {
        parts,
        annotations,
        ..message.clone()
    }
}
