/// Failures of the history reducer. Both are raised before any state is
/// replaced, so a caller never observes half of a chunk.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HistoryError {
    #[error("history is empty; seed it with a system or user message before applying chunks")]
    EmptyHistory,

    #[error("chunk {chunk_id:?} has neither a delta nor a message in its first choice")]
    MalformedChunk { chunk_id: String },
}
