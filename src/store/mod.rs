//! Conversation workspace: one thread per agent plus the refined prompt that
//! the business agent hands to the other agents.

use crate::models::agent::AgentKind;
use crate::models::chat::{ChatMessage, Role};
use serde::Serialize;
use serde_json::{Map, Value};
use std::ops::{Deref, DerefMut};
use tokio::sync::{Mutex, MutexGuard, RwLock};

#[derive(Debug, Default, Clone, Serialize)]
pub struct Thread {
    pub messages: Vec<ChatMessage>,
    pub output: Option<String>,
    pub document: Option<Value>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
    #[serde(skip_serializing_if = "is_zero")]
    pub questions_asked: usize,
}

fn is_zero(value: &usize) -> bool {
    *value == 0
}

impl Thread {
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn push(&mut self, message: ChatMessage) {
        self.messages.push(message);
    }

    /// Drops the trailing user message left behind by a turn that failed.
    pub fn retract_user(&mut self) {
        if matches!(self.messages.last(), Some(message) if message.role == Role::User) {
            self.messages.pop();
        }
    }

    /// The last `window` messages, oldest first.
    pub fn recent(&self, window: usize) -> &[ChatMessage] {
        let start = self.messages.len().saturating_sub(window);
        &self.messages[start..]
    }

    pub fn set_output(&mut self, output: impl Into<String>) {
        self.output = Some(output.into());
    }

    pub fn set_document(&mut self, document: Value) {
        self.document = Some(document);
    }

    pub fn clear(&mut self) {
        *self = Thread::default();
    }
}

/// Exclusive access to one agent's thread. The thread is published to
/// readers when the guard is dropped.
pub struct ThreadGuard<'a> {
    thread: MutexGuard<'a, Thread>,
    committed: &'a std::sync::RwLock<Thread>,
}

impl Deref for ThreadGuard<'_> {
    type Target = Thread;

    fn deref(&self) -> &Thread {
        &self.thread
    }
}

impl DerefMut for ThreadGuard<'_> {
    fn deref_mut(&mut self) -> &mut Thread {
        &mut self.thread
    }
}

impl Drop for ThreadGuard<'_> {
    fn drop(&mut self) {
        let mut slot = match self.committed.write() {
            Ok(slot) => slot,
            Err(poisoned) => poisoned.into_inner(),
        };
        *slot = self.thread.clone();
    }
}

pub struct Workspace {
    threads: [Mutex<Thread>; AgentKind::COUNT],
    committed: [std::sync::RwLock<Thread>; AgentKind::COUNT],
    refined_prompt: RwLock<Option<String>>,
}

impl Default for Workspace {
    fn default() -> Self {
        Self::new()
    }
}

impl Workspace {
    pub fn new() -> Self {
        Self {
            threads: std::array::from_fn(|_| Mutex::new(Thread::default())),
            committed: std::array::from_fn(|_| std::sync::RwLock::new(Thread::default())),
            refined_prompt: RwLock::new(None),
        }
    }

    /// Locks the agent's thread for the duration of a turn.
    pub async fn thread(&self, kind: AgentKind) -> ThreadGuard<'_> {
        ThreadGuard {
            thread: self.threads[kind.index()].lock().await,
            committed: &self.committed[kind.index()],
        }
    }

    /// The thread as of the last finished turn.
    pub fn committed(&self, kind: AgentKind) -> Thread {
        match self.committed[kind.index()].read() {
            Ok(thread) => thread.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub async fn clear(&self, kind: AgentKind) {
        self.thread(kind).await.clear();
    }

    /// Clears every thread, waiting for turns in flight so they cannot
    /// write back afterwards. The refined prompt is kept.
    pub async fn clear_all(&self) {
        for kind in AgentKind::ALL {
            self.clear(kind).await;
        }
    }

    pub async fn refined_prompt(&self) -> Option<String> {
        self.refined_prompt.read().await.clone()
    }

    pub async fn set_refined_prompt(&self, prompt: impl Into<String>) {
        *self.refined_prompt.write().await = Some(prompt.into());
    }

    /// Committed state of every thread; turns in flight are not waited on.
    pub async fn snapshot(&self) -> Result<Value, serde_json::Error> {
        let mut threads = Map::new();
        for kind in AgentKind::ALL {
            let thread = serde_json::to_value(self.committed(kind))?;
            threads.insert(kind.key().to_string(), thread);
        }

        Ok(serde_json::json!({
            "refined_prompt": self.refined_prompt().await,
            "threads": threads,
        }))
    }
}
