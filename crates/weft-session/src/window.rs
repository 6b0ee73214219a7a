use std::collections::HashSet;

use weft_types::{Message, Part, Role};

/// Returns the suffix of `history` to send as context on the next turn.
///
/// The walk starts `target_size` messages from the end and widens the window
/// whenever its first message depends on something before it:
///
/// - a tool result at the start pulls in the nearest earlier tool call,
/// - a tool call at the start pulls in the nearest earlier user message,
/// - a non-user message that replies to a tool result stays attached to it.
///
/// After that, any tool result or tool call inside the window whose
/// counterpart was cut off widens the window to include it. The result may
/// therefore be longer than `target_size`. A `target_size` of 0, or one that
/// covers the whole history, returns the history unchanged.
pub fn select_window(history: &[Message], target_size: usize) -> &[Message] {
    if target_size == 0 || target_size >= history.len() {
        return history;
    }

    let mut start = history.len() - target_size;
    // Messages from `checked` on have all their dependencies inside the window.
    let mut checked = history.len();
    let mut visited = HashSet::new();

    while start > 0 && visited.insert(start) {
        let next = widen_at_start(history, start).or_else(|| {
            let found = dangling_dependency(history, start, checked);
            checked = start;
            found
        });
        let Some(next) = next else {
            break;
        };
        tracing::debug!(from = start, to = next, "widening context window");
        start = next;
    }

    &history[start..]
}

fn widen_at_start(history: &[Message], start: usize) -> Option<usize> {
    let first = &history[start];
    if first.has_tool_result() {
        return nearest_before(history, start, Message::has_tool_call);
    }
    if first.has_tool_call() {
        return nearest_before(history, start, |m| m.role == Role::User);
    }
    let replies_to_result = first.role != Role::User && history[start - 1].has_tool_result();
    replies_to_result.then_some(start - 1)
}

/// Finds the earliest message before `start` that a message in
/// `start..end` still refers to.
fn dangling_dependency(history: &[Message], start: usize, end: usize) -> Option<usize> {
    let mut earliest: Option<usize> = None;
    let mut keep = |index: usize| {
        if index < start {
            earliest = Some(earliest.map_or(index, |e| e.min(index)));
        }
    };

    for (index, message) in history.iter().enumerate().take(end).skip(start) {
        for result in message.tool_results() {
            if let Some(call) = matching_call(history, index, result) {
                keep(call);
            }
        }
        if message.has_tool_call() {
            if let Some(user) = nearest_before(history, index, |m| m.role == Role::User) {
                keep(user);
            }
        }
    }

    earliest
}

/// The message holding the call a tool result answers. Results without an id
/// answer the nearest earlier call.
fn matching_call(history: &[Message], index: usize, result: &Part) -> Option<usize> {
    let Part::ToolResult { id, .. } = result else {
        return None;
    };
    if id.is_empty() {
        return nearest_before(history, index, Message::has_tool_call);
    }
    nearest_before(history, index, |m| {
        m.tool_calls()
            .any(|call| matches!(call, Part::ToolCall { id: call_id, .. } if call_id == id))
    })
}

fn nearest_before(
    history: &[Message],
    index: usize,
    predicate: impl Fn(&Message) -> bool,
) -> Option<usize> {
    history[..index].iter().rposition(predicate)
}
