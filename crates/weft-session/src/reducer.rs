use weft_types::{Choice, Chunk, Message, TokenUsage};

use crate::config::HistoryConfig;
use crate::error::HistoryError;
use crate::lifecycle::finish_reasoning;
use crate::merge::merge_delta;

/// Applies one chunk to the history with the default configuration.
///
/// See [`apply_chunk_with`].
pub fn apply_chunk(
    history: &[Message],
    chunk: &Chunk,
    model_hint: Option<&str>,
) -> Result<Vec<Message>, HistoryError> {
    apply_chunk_with(history, chunk, model_hint, &HistoryConfig::default())
}

/// Applies one chunk to the history and returns the new history.
///
/// Only the first choice is consulted. A chunk whose role differs from the
/// last message starts a new message (attributed to `model_hint`); otherwise
/// it is folded into the last message. Usage reported by the chunk is merged
/// into the message it lands on.
pub fn apply_chunk_with(
    history: &[Message],
    chunk: &Chunk,
    model_hint: Option<&str>,
    config: &HistoryConfig,
) -> Result<Vec<Message>, HistoryError> {
    let Some(last) = history.last() else {
        return Err(HistoryError::EmptyHistory);
    };

    let Some(choice) = chunk.first_choice() else {
        return Ok(history.to_vec());
    };

    let incoming = choice
        .incoming()
        .ok_or_else(|| HistoryError::MalformedChunk {
            chunk_id: chunk.id.clone(),
        })?;

    let mut next = history.to_vec();

    if last.role != incoming.role {
        tracing::debug!(
            chunk_id = %chunk.id,
            from = %last.role,
            to = %incoming.role,
            "chunk starts a new message"
        );
        // A streamed delta is folded into an empty shell so its first
        // fragments get the same treatment as later ones.
        let mut message = if choice.delta.is_some() {
            let shell = Message {
                parts: Vec::new(),
                ..incoming.clone()
            };
            merge_delta(&shell, incoming)
        } else {
            incoming.clone()
        };
        if let Some(model) = model_hint {
            message.model_id = Some(model.to_string());
        }
        message.usage = merge_usage(incoming.usage.as_ref(), chunk.usage.as_ref());
        next.push(finish(message, choice, config));
    } else {
        let mut message = merge_delta(last, incoming);
        message.usage = merge_usage(last.usage.as_ref(), incoming.usage.as_ref());
        message.usage = merge_usage(message.usage.as_ref(), chunk.usage.as_ref());
        let index = next.len() - 1;
        next[index] = finish(message, choice, config);
    }

    Ok(next)
}

/// Merges usage, recomputing the total even when only one side is present.
fn merge_usage(existing: Option<&TokenUsage>, incoming: Option<&TokenUsage>) -> Option<TokenUsage> {
    match incoming {
        Some(incoming) => Some(TokenUsage::merge(existing, incoming)),
        None => existing.map(|usage| TokenUsage::merge(None, usage)),
    }
}

/// Records the finish reason, if any, and applies the end-of-stream options.
fn finish(mut message: Message, choice: &Choice, config: &HistoryConfig) -> Message {
    let Some(reason) = choice.finish() else {
        return message;
    };

    message.finish_reason = Some(reason.to_string());
    if config.close_reasoning_on_finish {
        message = finish_reasoning(&message);
    }
    if config.sort_parts_on_finish {
        message = message.sorted_by_priority();
    }
    message
}

#[cfg(test)]
mod tests {
    use super::*;
    use weft_types::{Part, Role};

    fn assistant_delta(parts: Vec<Part>) -> Chunk {
        Chunk::delta("gpt-4o", Message::new(Role::Assistant, parts))
    }

    #[test]
    fn test_empty_history_is_rejected() {
        let err = apply_chunk(&[], &assistant_delta(vec![Part::text("x")]), None).unwrap_err();
        assert_eq!(err, HistoryError::EmptyHistory);
    }

    #[test]
    fn test_chunk_without_choices_is_a_no_op() {
        let history = vec![Message::user("hi")];
        let chunk = Chunk {
            id: "c1".to_string(),
            model: String::new(),
            choices: vec![],
            usage: None,
        };
        assert_eq!(apply_chunk(&history, &chunk, None).unwrap(), history);
    }

    #[test]
    fn test_choice_without_payload_is_malformed() {
        let history = vec![Message::user("hi")];
        let mut chunk = assistant_delta(vec![]).with_id("chunk-7");
        chunk.choices[0].delta = None;

        let err = apply_chunk(&history, &chunk, None).unwrap_err();
        assert_eq!(
            err,
            HistoryError::MalformedChunk {
                chunk_id: "chunk-7".to_string()
            }
        );
    }

    #[test]
    fn test_role_change_starts_new_message_with_model_hint() {
        let history = vec![Message::user("hi")];
        let next = apply_chunk(
            &history,
            &assistant_delta(vec![Part::text("hel")]),
            Some("gpt-4o"),
        )
        .unwrap();

        assert_eq!(next.len(), 2);
        assert_eq!(next[1].role, Role::Assistant);
        assert_eq!(next[1].model_id.as_deref(), Some("gpt-4o"));
        assert_eq!(next[1].text(), "hel");
    }

    #[test]
    fn test_first_image_fragment_gets_data_uri_prefix() {
        let history = vec![Message::user("draw")];
        let next = apply_chunk(&history, &assistant_delta(vec![Part::image("iVBO")]), None).unwrap();
        assert_eq!(next[1].parts, vec![Part::image("data:image/png;base64,iVBO")]);

        let chunk = Chunk::complete(
            "gpt-4o",
            Message::new(Role::Assistant, vec![Part::image("https://example.com/cat.png")]),
        );
        let next = apply_chunk(&history, &chunk, None).unwrap();
        assert_eq!(next[1].parts, vec![Part::image("https://example.com/cat.png")]);
    }

    #[test]
    fn test_same_role_folds_into_last_message() {
        let history = vec![Message::user("hi")];
        let history = apply_chunk(&history, &assistant_delta(vec![Part::text("hel")]), None).unwrap();
        let history = apply_chunk(&history, &assistant_delta(vec![Part::text("lo")]), None).unwrap();

        assert_eq!(history.len(), 2);
        assert_eq!(history[1].text(), "hello");
    }

    #[test]
    fn test_usage_accumulates_across_chunks() {
        let history = vec![Message::user("hi")];
        let history = apply_chunk(
            &history,
            &assistant_delta(vec![Part::text("a")]).with_usage(TokenUsage::new(100, 0)),
            None,
        )
        .unwrap();
        let history = apply_chunk(&history, &assistant_delta(vec![Part::text("b")]), None).unwrap();
        let history = apply_chunk(
            &history,
            &assistant_delta(vec![]).with_usage(TokenUsage::new(0, 7).with_cached(30)),
            None,
        )
        .unwrap();

        let usage = history[1].usage.unwrap();
        assert_eq!(usage.prompt_tokens, 100);
        assert_eq!(usage.completion_tokens, 7);
        assert_eq!(usage.cached_tokens, 30);
        assert_eq!(usage.total_tokens, 107);
    }

    #[test]
    fn test_upstream_total_is_recomputed() {
        let inconsistent = TokenUsage {
            prompt_tokens: 10,
            completion_tokens: 5,
            cached_tokens: 0,
            total_tokens: 999,
        };
        let history = vec![Message::user("hi")];

        let mut message = Message::assistant("full answer");
        message.usage = Some(inconsistent);
        let next = apply_chunk(&history, &Chunk::complete("gpt-4o", message), None).unwrap();
        assert_eq!(next[1].usage, Some(TokenUsage::new(10, 5)));

        let mut message = Message::new(Role::Assistant, vec![Part::text("hel")]);
        message.usage = Some(inconsistent);
        let next = apply_chunk(&history, &Chunk::delta("gpt-4o", message), None).unwrap();
        assert_eq!(next[1].usage.map(|u| u.total_tokens), Some(15));

        let mut folded = history.clone();
        folded.push(Message {
            usage: Some(inconsistent),
            ..Message::assistant("partial")
        });
        let next = apply_chunk(&folded, &assistant_delta(vec![Part::text(" more")]), None).unwrap();
        assert_eq!(next[1].usage.map(|u| u.total_tokens), Some(15));
    }

    #[test]
    fn test_finish_reason_closes_reasoning() {
        let history = vec![Message::user("hi")];
        let history =
            apply_chunk(&history, &assistant_delta(vec![Part::reasoning("hmm")]), None).unwrap();
        let history = apply_chunk(
            &history,
            &assistant_delta(vec![Part::reasoning(".")]).with_finish_reason("stop"),
            None,
        )
        .unwrap();

        let message = &history[1];
        assert_eq!(message.finish_reason.as_deref(), Some("stop"));
        assert!(matches!(
            &message.parts[0],
            Part::Reasoning {
                finished_at: Some(_),
                ..
            }
        ));
    }

    #[test]
    fn test_finish_can_sort_parts() {
        let config = HistoryConfig {
            sort_parts_on_finish: true,
            ..HistoryConfig::default()
        };
        let history = vec![Message::user("hi")];
        let history = apply_chunk_with(
            &history,
            &assistant_delta(vec![Part::text("answer"), Part::reasoning("late")])
                .with_finish_reason("stop"),
            None,
            &config,
        )
        .unwrap();

        let kinds: Vec<_> = history[1].parts.iter().map(Part::kind).collect();
        assert_eq!(kinds, vec!["reasoning", "text"]);
    }

    #[test]
    fn test_complete_message_is_accepted() {
        let history = vec![Message::user("hi")];
        let chunk = Chunk::complete("gpt-4o", Message::assistant("full answer"))
            .with_finish_reason("stop");
        let history = apply_chunk(&history, &chunk, Some("gpt-4o")).unwrap();

        assert_eq!(history.len(), 2);
        assert_eq!(history[1].text(), "full answer");
        assert_eq!(history[1].finish_reason.as_deref(), Some("stop"));
    }

    #[test]
    fn test_failed_apply_leaves_input_untouched() {
        let history = vec![Message::user("hi"), Message::assistant("partial")];
        let mut chunk = assistant_delta(vec![Part::text("more")]);
        chunk.choices[0].delta = None;

        assert!(apply_chunk(&history, &chunk, None).is_err());
        assert_eq!(history[1].text(), "partial");
    }
}
