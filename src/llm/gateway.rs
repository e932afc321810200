//! Streamed completions against the configured backend.
//!
//! Every fragment is echoed to the console as it arrives and accumulated into
//! the returned string. Only [`CompletionGateway::complete_and_record`] touches
//! the transcript; side computations go through [`CompletionGateway::complete`].

use futures::StreamExt;

use crate::error::CompletionError;
use crate::output::Console;
use crate::transcript::{Role, Transcript, Turn};

use super::provider::ChatBackend;

pub struct CompletionGateway {
    backend: Box<dyn ChatBackend>,
    model: String,
    console: Console,
}

impl CompletionGateway {
    pub fn new(backend: Box<dyn ChatBackend>, model: impl Into<String>, console: Console) -> Self {
        Self {
            backend,
            model: model.into(),
            console,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Stream a completion for `turns`, forwarding fragments in arrival order.
    pub async fn stream_completion(&self, turns: &[Turn]) -> Result<String, CompletionError> {
        let mut stream = self.backend.stream_chat(&self.model, turns).await?;

        self.console.write("Assistant: ", None);

        let mut content = String::new();
        while let Some(fragment) = stream.next().await {
            let fragment = fragment?;
            self.console.assistant_fragment(&fragment);
            content.push_str(&fragment);
        }

        Ok(content)
    }

    /// Complete an explicit turn sequence without saving the result anywhere.
    pub async fn complete(&self, turns: &[Turn]) -> Result<String, CompletionError> {
        self.stream_completion(turns).await
    }

    /// Complete the whole transcript and append the reply as an assistant turn.
    pub async fn complete_and_record(
        &self,
        transcript: &mut Transcript,
    ) -> Result<String, CompletionError> {
        let content = self.stream_completion(transcript.turns()).await?;
        transcript.append_turn(Role::Assistant, content.clone());
        Ok(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::CaptureBuffer;
    use crate::testing::ScriptedBackend;

    fn gateway(backend: ScriptedBackend, buffer: &CaptureBuffer) -> CompletionGateway {
        CompletionGateway::new(
            Box::new(backend),
            "test-model",
            Console::with_writer(buffer.clone(), false),
        )
    }

    #[tokio::test]
    async fn fragments_are_forwarded_and_concatenated_in_order() {
        let backend = ScriptedBackend::with_fragments(vec![vec!["git ", "commit ", "-m \"x\""]]);
        let buffer = CaptureBuffer::new();
        let gateway = gateway(backend, &buffer);

        let result = gateway.complete(&[Turn::user("diff")]).await.unwrap();

        assert_eq!(result, "git commit -m \"x\"");
        let out = buffer.contents();
        let first = out.find("git ").unwrap();
        let second = out.find("commit ").unwrap();
        assert!(first < second);
        assert!(out.starts_with("Assistant: "));
    }

    #[tokio::test]
    async fn complete_does_not_touch_transcript() {
        let backend = ScriptedBackend::new(vec!["feature/login"]);
        let buffer = CaptureBuffer::new();
        let gateway = gateway(backend.clone(), &buffer);
        let transcript = Transcript::new();

        gateway.complete(&[Turn::user("branch please")]).await.unwrap();

        assert_eq!(transcript.len(), 1);
        assert_eq!(backend.requests()[0], vec![Turn::user("branch please")]);
    }

    #[tokio::test]
    async fn complete_and_record_sends_transcript_and_appends_reply() {
        let backend = ScriptedBackend::new(vec!["ls -la"]);
        let buffer = CaptureBuffer::new();
        let gateway = gateway(backend.clone(), &buffer);
        let mut transcript = Transcript::new();
        transcript.append_turn(Role::User, "list files");

        let reply = gateway.complete_and_record(&mut transcript).await.unwrap();

        assert_eq!(reply, "ls -la");
        assert_eq!(transcript.len(), 3);
        assert_eq!(transcript.latest_content().unwrap(), "ls -la");
        assert_eq!(backend.requests()[0].len(), 2);
        assert_eq!(backend.models(), vec!["test-model".to_string()]);
    }

    #[tokio::test]
    async fn failure_propagates_and_leaves_transcript_unchanged() {
        let backend = ScriptedBackend::new(Vec::<&str>::new());
        let buffer = CaptureBuffer::new();
        let gateway = gateway(backend, &buffer);
        let mut transcript = Transcript::new();

        let result = gateway.complete_and_record(&mut transcript).await;

        assert!(result.is_err());
        assert_eq!(transcript.len(), 1);
    }
}
