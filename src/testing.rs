//! Test doubles shared by unit tests.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use futures::stream;

use crate::clipboard::Clipboard;
use crate::error::{ClipboardError, CompletionError};
use crate::flags::FlagSet;
use crate::flows::AppContext;
use crate::git::GitWorkspace;
use crate::history::CliHistory;
use crate::interact::Prompter;
use crate::llm::{ChatBackend, CompletionGateway, FragmentStream, Provider, TokenCounter};
use crate::output::{CaptureBuffer, Console};
use crate::transcript::Turn;

#[derive(Default)]
struct ScriptState {
    responses: VecDeque<Vec<String>>,
    requests: Vec<Vec<Turn>>,
    models: Vec<String>,
}

/// Backend replaying canned replies in order and recording every request.
#[derive(Clone, Default)]
pub struct ScriptedBackend {
    state: Arc<Mutex<ScriptState>>,
}

impl ScriptedBackend {
    /// One single-fragment reply per entry.
    pub fn new<S: Into<String>>(responses: Vec<S>) -> Self {
        Self::from_replies(responses.into_iter().map(|r| vec![r.into()]).collect())
    }

    /// Replies split into the given fragments.
    pub fn with_fragments(responses: Vec<Vec<&str>>) -> Self {
        Self::from_replies(
            responses
                .into_iter()
                .map(|r| r.into_iter().map(str::to_string).collect())
                .collect(),
        )
    }

    fn from_replies(responses: VecDeque<Vec<String>>) -> Self {
        Self {
            state: Arc::new(Mutex::new(ScriptState {
                responses,
                ..Default::default()
            })),
        }
    }

    pub fn requests(&self) -> Vec<Vec<Turn>> {
        self.state.lock().unwrap().requests.clone()
    }

    pub fn models(&self) -> Vec<String> {
        self.state.lock().unwrap().models.clone()
    }
}

#[async_trait]
impl ChatBackend for ScriptedBackend {
    fn provider(&self) -> Provider {
        Provider::OpenAi
    }

    async fn stream_chat(
        &self,
        model: &str,
        turns: &[Turn],
    ) -> Result<FragmentStream, CompletionError> {
        let mut state = self.state.lock().unwrap();
        state.requests.push(turns.to_vec());
        state.models.push(model.to_string());

        let fragments = state
            .responses
            .pop_front()
            .ok_or_else(|| CompletionError::InvalidPayload {
                provider: Provider::OpenAi,
                detail: "no scripted response".to_string(),
            })?;

        Ok(Box::pin(stream::iter(fragments.into_iter().map(Ok))))
    }
}

/// Counter reporting the same size for every text.
pub struct FixedCounter(pub usize);

impl TokenCounter for FixedCounter {
    fn count(&self, _text: &str) -> usize {
        self.0
    }
}

/// Prompter answering from a queue. Runs out with an empty answer.
#[derive(Clone, Default)]
pub struct FakePrompter {
    answers: Arc<Mutex<VecDeque<String>>>,
    questions: Arc<Mutex<Vec<String>>>,
}

impl FakePrompter {
    pub fn new<S: Into<String>>(answers: Vec<S>) -> Self {
        Self {
            answers: Arc::new(Mutex::new(answers.into_iter().map(Into::into).collect())),
            questions: Arc::default(),
        }
    }

    pub fn questions(&self) -> Vec<String> {
        self.questions.lock().unwrap().clone()
    }

    fn next_answer(&mut self, question: &str) -> String {
        self.questions.lock().unwrap().push(question.to_string());
        self.answers.lock().unwrap().pop_front().unwrap_or_default()
    }
}

impl Prompter for FakePrompter {
    fn ask(&mut self, question: &str) -> Result<String, dialoguer::Error> {
        Ok(self.next_answer(question))
    }

    fn ask_with_history(
        &mut self,
        question: &str,
        _history: &CliHistory,
    ) -> Result<String, dialoguer::Error> {
        Ok(self.next_answer(question))
    }
}

/// Clipboard remembering what was copied.
#[derive(Clone, Default)]
pub struct RecordingClipboard {
    copied: Arc<Mutex<Vec<String>>>,
}

impl RecordingClipboard {
    pub fn copied(&self) -> Vec<String> {
        self.copied.lock().unwrap().clone()
    }
}

impl Clipboard for RecordingClipboard {
    fn copy(&self, text: &str) -> Result<(), ClipboardError> {
        self.copied.lock().unwrap().push(text.to_string());
        Ok(())
    }
}

/// Gateway over `backend` writing into `buffer`.
pub fn scripted_gateway(backend: &ScriptedBackend, buffer: &CaptureBuffer) -> CompletionGateway {
    CompletionGateway::new(
        Box::new(backend.clone()),
        "test-model",
        Console::with_writer(buffer.clone(), false),
    )
}

/// Context over `git` and `backend` with a fake prompter and clipboard,
/// a one-token counter and console output captured in the returned buffer.
pub fn test_context(
    git: impl GitWorkspace + 'static,
    backend: &ScriptedBackend,
    flags: FlagSet,
) -> (AppContext, CaptureBuffer) {
    let buffer = CaptureBuffer::new();
    let console = Console::with_writer(buffer.clone(), flags.verbose);
    let gateway = CompletionGateway::new(Box::new(backend.clone()), "test-model", console.clone());
    let mut ctx = AppContext::new(
        flags,
        gateway,
        Box::new(git),
        Box::new(FixedCounter(1)),
        console,
    );
    ctx.prompter = Box::new(FakePrompter::default());
    ctx.clipboard = Box::new(RecordingClipboard::default());
    (ctx, buffer)
}
