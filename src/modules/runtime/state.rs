//! Shared runtime application state (HTTP handlers)

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use magicchat_core::SearchConfig;
use magicchat_types::runtime::ChatMessage;

use crate::executor::SearchExecutor;

/// Application state shared across handlers.
///
/// The executor and search defaults sit behind a lock so dev-mode reloads
/// can swap them without restarting the server; sessions survive reloads.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<RwLock<AppInner>>,
    pub sessions: Arc<SessionStore>,
}

struct AppInner {
    executor: Arc<SearchExecutor>,
    search: SearchConfig,
}

impl AppState {
    pub fn new(executor: Arc<SearchExecutor>, search: SearchConfig) -> Self {
        Self {
            inner: Arc::new(RwLock::new(AppInner { executor, search })),
            sessions: Arc::new(SessionStore::new()),
        }
    }

    /// The current executor
    pub async fn executor(&self) -> Arc<SearchExecutor> {
        self.inner.read().await.executor.clone()
    }

    /// The current search defaults
    pub async fn search(&self) -> SearchConfig {
        self.inner.read().await.search.clone()
    }

    /// Swap the executor and search defaults (configuration reload)
    pub async fn replace(&self, executor: Arc<SearchExecutor>, search: SearchConfig) {
        let mut inner = self.inner.write().await;
        inner.executor = executor;
        inner.search = search;
    }
}

/// One conversation's append-only message log.
///
/// Messages are only ever pushed; history is owned by the session, not kept
/// as ambient global state.
pub struct Session {
    messages: RwLock<Vec<ChatMessage>>,
}

impl Session {
    fn new() -> Self {
        Self {
            messages: RwLock::new(Vec::new()),
        }
    }

    /// Append a message to the log
    pub async fn append(&self, message: ChatMessage) {
        self.messages.write().await.push(message);
    }

    /// Snapshot of the log in append order
    pub async fn messages(&self) -> Vec<ChatMessage> {
        self.messages.read().await.clone()
    }

    /// Number of messages in the log
    pub async fn len(&self) -> usize {
        self.messages.read().await.len()
    }

    /// Returns true if the log has no messages
    pub async fn is_empty(&self) -> bool {
        self.messages.read().await.is_empty()
    }
}

/// In-memory session store keyed by session id
pub struct SessionStore {
    sessions: RwLock<HashMap<String, Arc<Session>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Create a new session and return its id
    pub async fn create(&self) -> String {
        let id = Uuid::new_v4().to_string();
        let mut guard = self.sessions.write().await;
        guard.insert(id.clone(), Arc::new(Session::new()));
        id
    }

    /// Look up a session by id
    pub async fn get(&self, id: &str) -> Option<Arc<Session>> {
        let guard = self.sessions.read().await;
        guard.get(id).cloned()
    }

    /// Resolve a session for a chat turn.
    ///
    /// A known id returns its session; an unknown id is registered as-is so
    /// a client can keep its id across server restarts; no id creates a
    /// fresh session.
    pub async fn get_or_create(&self, id: Option<&str>) -> (String, Arc<Session>) {
        match id {
            Some(id) => {
                let mut guard = self.sessions.write().await;
                let session = guard
                    .entry(id.to_string())
                    .or_insert_with(|| Arc::new(Session::new()))
                    .clone();
                (id.to_string(), session)
            }
            None => {
                let id = self.create().await;
                let session = self.get(&id).await.expect("session just created");
                (id, session)
            }
        }
    }

    /// Remove a session, returning true if it existed
    pub async fn remove(&self, id: &str) -> bool {
        let mut guard = self.sessions.write().await;
        guard.remove(id).is_some()
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}
