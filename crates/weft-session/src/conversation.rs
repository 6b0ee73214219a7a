use std::sync::Arc;

use tokio::sync::{mpsc, oneshot, watch};
use weft_types::{Chunk, Message};

use crate::config::HistoryConfig;
use crate::error::HistoryError;
use crate::reducer::apply_chunk_with;
use crate::window::select_window;

const COMMAND_BUFFER: usize = 64;

#[derive(Debug, thiserror::Error)]
pub enum ConversationError {
    #[error("conversation {0} is closed")]
    Closed(String),

    #[error(transparent)]
    History(#[from] HistoryError),
}

enum Command {
    Apply {
        chunk: Chunk,
        model_hint: Option<String>,
        reply: oneshot::Sender<Result<usize, HistoryError>>,
    },
    Push {
        message: Message,
        reply: oneshot::Sender<usize>,
    },
    Shutdown,
}

/// Owns the history of one conversation and applies chunks to it strictly
/// in the order they are submitted.
pub struct Conversation {
    id: String,
    history: Arc<Vec<Message>>,
    config: HistoryConfig,
    commands: mpsc::Receiver<Command>,
    snapshots: watch::Sender<Arc<Vec<Message>>>,
}

impl Conversation {
    /// Starts the executor task for a seeded history. Must be called within a
    /// tokio runtime.
    pub fn spawn(
        seed: Vec<Message>,
        config: HistoryConfig,
    ) -> Result<ConversationHandle, HistoryError> {
        if seed.is_empty() {
            return Err(HistoryError::EmptyHistory);
        }

        let id = weft_core::id::conversation();
        let history = Arc::new(seed);
        let (command_tx, command_rx) = mpsc::channel(COMMAND_BUFFER);
        let (snapshot_tx, snapshot_rx) = watch::channel(Arc::clone(&history));

        let conversation = Conversation {
            id: id.clone(),
            history,
            config: config.clone(),
            commands: command_rx,
            snapshots: snapshot_tx,
        };
        tokio::spawn(conversation.run());

        tracing::debug!(conversation_id = %id, "conversation started");

        Ok(ConversationHandle {
            id,
            config,
            commands: command_tx,
            snapshots: snapshot_rx,
        })
    }

    async fn run(mut self) {
        while let Some(command) = self.commands.recv().await {
            match command {
                Command::Apply {
                    chunk,
                    model_hint,
                    reply,
                } => {
                    let result = apply_chunk_with(
                        &self.history,
                        &chunk,
                        model_hint.as_deref(),
                        &self.config,
                    )
                    .map(|next| self.replace(next));
                    if let Err(err) = &result {
                        tracing::warn!(conversation_id = %self.id, %err, "chunk rejected");
                    }
                    let _ = reply.send(result);
                }
                Command::Push { message, reply } => {
                    let mut next = self.history.as_ref().clone();
                    next.push(message);
                    let _ = reply.send(self.replace(next));
                }
                Command::Shutdown => break,
            }
        }
        tracing::debug!(conversation_id = %self.id, "conversation stopped");
    }

    fn replace(&mut self, next: Vec<Message>) -> usize {
        let len = next.len();
        self.history = Arc::new(next);
        self.snapshots.send_replace(Arc::clone(&self.history));
        len
    }
}

/// Cloneable handle to a running [`Conversation`].
#[derive(Clone)]
pub struct ConversationHandle {
    id: String,
    config: HistoryConfig,
    commands: mpsc::Sender<Command>,
    snapshots: watch::Receiver<Arc<Vec<Message>>>,
}

impl ConversationHandle {
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Applies a chunk and returns the resulting history length.
    pub async fn apply(
        &self,
        chunk: Chunk,
        model_hint: Option<&str>,
    ) -> Result<usize, ConversationError> {
        let (reply, response) = oneshot::channel();
        self.send(Command::Apply {
            chunk,
            model_hint: model_hint.map(str::to_string),
            reply,
        })
        .await?;
        let len = response.await.map_err(|_| self.closed())??;
        Ok(len)
    }

    /// Appends a message built outside the stream, e.g. the next user turn.
    pub async fn push_message(&self, message: Message) -> Result<usize, ConversationError> {
        let (reply, response) = oneshot::channel();
        self.send(Command::Push { message, reply }).await?;
        response.await.map_err(|_| self.closed())
    }

    /// The history as of the last applied command.
    pub fn snapshot(&self) -> Arc<Vec<Message>> {
        Arc::clone(&self.snapshots.borrow())
    }

    /// The context window for the next request, sized by
    /// `contextMessageSize`.
    pub fn window(&self) -> Vec<Message> {
        let history = self.snapshot();
        select_window(&history, self.config.context_message_size).to_vec()
    }

    /// Receives every new history after it is committed.
    pub fn subscribe(&self) -> watch::Receiver<Arc<Vec<Message>>> {
        self.snapshots.clone()
    }

    /// Stops the executor after commands already queued have run.
    pub async fn shutdown(&self) -> Result<(), ConversationError> {
        self.send(Command::Shutdown).await
    }

    async fn send(&self, command: Command) -> Result<(), ConversationError> {
        self.commands.send(command).await.map_err(|_| self.closed())
    }

    fn closed(&self) -> ConversationError {
        ConversationError::Closed(self.id.clone())
    }
}
