//! Applies relay commands to a [`DocumentHost`].

use std::sync::Arc;

use super::host::{DocumentBody, DocumentHost, FontOverrides, HostError};
use super::path_check::same_document;
use crate::protocol::{Action, ClientMessage, Command};

/// Why a command could not be applied.
#[derive(Debug, thiserror::Error)]
pub enum ExecuteError {
    /// The open document is not the one named by `checkPath`.
    #[error("Document path mismatch")]
    PathMismatch,

    /// A `replace` command arrived without a payload.
    #[error("replace command has no payload")]
    MissingPayload,

    /// The host failed.
    #[error(transparent)]
    Host(#[from] HostError),
}

/// Runs commands against a host and builds the response envelopes.
#[derive(Debug)]
pub struct CommandExecutor<H> {
    host: Arc<H>,
}

impl<H: DocumentHost> CommandExecutor<H> {
    /// Wraps a shared host.
    #[must_use]
    pub fn new(host: Arc<H>) -> Self {
        Self { host }
    }

    /// Applies `command` and returns the reply to send, if any.
    ///
    /// Commands without an `id` are applied but never answered.
    pub async fn execute(&self, command: Command) -> Option<ClientMessage> {
        let id = command.id.clone();
        let action = command.action;
        let outcome = self.apply(command).await;

        match &outcome {
            Ok(()) => tracing::info!(?action, id = id.as_deref().unwrap_or_default(), "command applied"),
            Err(err) => tracing::warn!(
                ?action,
                id = id.as_deref().unwrap_or_default(),
                error = %err,
                "command failed"
            ),
        }

        let id = id?;
        Some(match outcome {
            Ok(()) => ClientMessage::success(id),
            Err(err) => ClientMessage::error(id, err.to_string()),
        })
    }

    async fn apply(&self, command: Command) -> Result<(), ExecuteError> {
        match command.action {
            Action::Save => {
                self.host.save().await?;
                self.host.flush().await?;
                Ok(())
            }
            Action::Replace => {
                let payload = command.payload.ok_or(ExecuteError::MissingPayload)?;
                let options = payload.options.unwrap_or_default();

                if let Some(expected) = options.check_path.as_deref().filter(|p| !p.is_empty()) {
                    let current = self.host.document_path().await?;
                    if !same_document(current.as_deref(), expected) {
                        tracing::warn!(
                            current = current.as_deref().unwrap_or_default(),
                            expected,
                            "document path mismatch"
                        );
                        return Err(ExecuteError::PathMismatch);
                    }
                }

                let body = DocumentBody::from_payload(payload.content, payload.content_type)?;
                self.host
                    .mutate(body, options.placement.unwrap_or_default())
                    .await?;
                if let Some(font) = FontOverrides::from_options(&options) {
                    self.host.apply_font(&font).await?;
                }
                self.host.flush().await?;
                Ok(())
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::agent::MemoryHost;
    use crate::protocol::{
        CommandReply, ContentType, Placement, ReplaceOptions, ReplacePayload, ReplyStatus,
    };

    fn executor(path: &str) -> (Arc<MemoryHost>, CommandExecutor<MemoryHost>) {
        let host = Arc::new(MemoryHost::new(path));
        (Arc::clone(&host), CommandExecutor::new(host))
    }

    fn replace(content: &str, options: Option<ReplaceOptions>) -> Command {
        Command::replace(
            "r1",
            ReplacePayload {
                content: content.into(),
                content_type: ContentType::Text,
                options,
            },
        )
    }

    fn reply(msg: Option<ClientMessage>) -> CommandReply {
        let Some(ClientMessage::Response(reply)) = msg else {
            panic!("response expected, got {msg:?}");
        };
        reply
    }

    #[tokio::test]
    async fn replace_mutates_applies_font_and_flushes() {
        let (host, exec) = executor("C:\\docs\\a.docx");
        let options = ReplaceOptions {
            font_name: Some("Arial".into()),
            font_size: Some(11.0),
            check_path: Some("c:/DOCS/a.docx".into()),
            placement: Some(Placement::Append),
        };

        let reply = reply(exec.execute(replace("hi", Some(options))).await);
        assert_eq!(reply.status, ReplyStatus::Success);

        let snap = host.snapshot().await;
        assert_eq!(snap.blocks, vec![DocumentBody::Text("hi".into())]);
        assert_eq!(snap.flushes, 1);
        let Some(font) = snap.font else {
            panic!("font should be applied");
        };
        assert_eq!(font.name.as_deref(), Some("Arial"));
    }

    #[tokio::test]
    async fn path_mismatch_replies_error_without_mutating() {
        let (host, exec) = executor("C:\\docs\\a.docx");
        let options = ReplaceOptions {
            check_path: Some("C:\\docs\\other.docx".into()),
            ..ReplaceOptions::default()
        };

        let reply = reply(exec.execute(replace("hi", Some(options))).await);
        assert_eq!(reply.status, ReplyStatus::Error);
        assert_eq!(reply.message.as_deref(), Some("Document path mismatch"));

        let snap = host.snapshot().await;
        assert_eq!(snap.mutations, 0);
        assert_eq!(snap.flushes, 0);
    }

    #[tokio::test]
    async fn check_path_without_document_path_is_a_mismatch() {
        let (host, exec) = executor("a.docx");
        host.set_path(None).await;
        let options = ReplaceOptions {
            check_path: Some("a.docx".into()),
            ..ReplaceOptions::default()
        };

        let reply = reply(exec.execute(replace("hi", Some(options))).await);
        assert_eq!(reply.status, ReplyStatus::Error);
        assert_eq!(reply.message.as_deref(), Some("Document path mismatch"));
        assert_eq!(host.snapshot().await.mutations, 0);
    }

    #[tokio::test]
    async fn save_then_flush() {
        let (host, exec) = executor("a.docx");
        host.set_saved(false).await;

        let reply = reply(exec.execute(Command::save("s1")).await);
        assert_eq!(reply.id, "s1");
        assert_eq!(reply.status, ReplyStatus::Success);

        let snap = host.snapshot().await;
        assert!(snap.saved);
        assert_eq!(snap.saves, 1);
        assert_eq!(snap.flushes, 1);
    }

    #[tokio::test]
    async fn host_failure_becomes_error_reply() {
        let (host, exec) = executor("a.docx");
        host.set_failure(Some("read-only document".into())).await;

        let reply = reply(exec.execute(Command::save("s2")).await);
        assert_eq!(reply.status, ReplyStatus::Error);
        assert_eq!(reply.message.as_deref(), Some("read-only document"));
    }

    #[tokio::test]
    async fn command_without_id_is_applied_silently() {
        let (host, exec) = executor("a.docx");
        let mut command = replace("quiet", None);
        command.id = None;

        assert!(exec.execute(command).await.is_none());
        assert_eq!(host.snapshot().await.mutations, 1);
    }

    #[tokio::test]
    async fn replace_without_payload_is_an_error() {
        let (_, exec) = executor("a.docx");
        let command = Command {
            action: Action::Replace,
            id: Some("r9".into()),
            payload: None,
        };
        let reply = reply(exec.execute(command).await);
        assert_eq!(reply.status, ReplyStatus::Error);
    }
}
