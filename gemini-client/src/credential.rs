use async_trait::async_trait;
use std::sync::{Arc, RwLock};

/// Error type for credential selection
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GateError {
    #[error("Credential selection is not available: {0}")]
    Unavailable(String),
    #[error("Credential selection failed: {0}")]
    Failed(String),
}

/// Shared slot for the currently selected API key
///
/// Cloning shares the slot, so the backend sees a key as soon as the gate stores it.
#[derive(Debug, Clone, Default)]
pub struct ApiKeyStore {
    inner: Arc<RwLock<Option<String>>>,
}

impl ApiKeyStore {
    pub fn new(key: Option<String>) -> Self {
        let key = key.map(|k| k.trim().to_string()).filter(|k| !k.is_empty());
        Self {
            inner: Arc::new(RwLock::new(key)),
        }
    }

    pub fn get(&self) -> Option<String> {
        match self.inner.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn is_present(&self) -> bool {
        self.get().is_some()
    }

    pub fn set(&self, key: String) {
        let mut guard = match self.inner.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        *guard = Some(key);
    }

    pub fn clear(&self) {
        let mut guard = match self.inner.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        *guard = None;
    }
}

/// Collaborator that knows whether a usable credential exists and can ask for one
#[async_trait]
pub trait CredentialGate: Send + Sync {
    async fn has_credential(&self) -> bool;

    /// Interactive selection. Success only means the prompt ran; validity is
    /// discovered by the next call that uses the key.
    async fn prompt_for_credential(&self) -> Result<(), GateError>;

    /// Drop whatever the gate believes is the current credential
    fn forget(&self) {}
}

/// Session-scoped "has credential" flag
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CredentialState {
    has_credential: bool,
}

impl CredentialState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_credential(&self) -> bool {
        self.has_credential
    }

    /// Re-read presence from the gate
    pub async fn refresh(&mut self, gate: &dyn CredentialGate) -> bool {
        self.has_credential = gate.has_credential().await;
        self.has_credential
    }

    /// Returns true once a credential is believed to be present.
    ///
    /// The cached flag short-circuits; otherwise the gate is asked, and if it
    /// still has nothing the interactive prompt runs once and the flag is set
    /// optimistically.
    pub async fn check_and_prompt(&mut self, gate: &dyn CredentialGate) -> bool {
        if self.has_credential {
            return true;
        }

        if self.refresh(gate).await {
            return true;
        }

        match gate.prompt_for_credential().await {
            Ok(()) => {
                log::info!("Credential selected, assuming it is valid until a call fails");
                self.has_credential = true;
                true
            }
            Err(e) => {
                log::error!("Credential prompt failed: {}", e);
                false
            }
        }
    }

    /// Forget the cached flag so the next check goes back to the gate
    pub fn invalidate(&mut self) {
        if self.has_credential {
            log::warn!("Discarding cached credential state");
        }
        self.has_credential = false;
    }
}

type KeyPrompt = Arc<dyn Fn() -> Result<String, GateError> + Send + Sync>;

/// Gate over an [`ApiKeyStore`] with a caller-supplied prompt
///
/// The prompt may block (terminal input, a dialog); it runs on the blocking
/// pool so the runtime thread stays free.
pub struct StoreGate {
    store: ApiKeyStore,
    prompt: KeyPrompt,
}

impl StoreGate {
    pub fn new(
        store: ApiKeyStore,
        prompt: impl Fn() -> Result<String, GateError> + Send + Sync + 'static,
    ) -> Self {
        Self {
            store,
            prompt: Arc::new(prompt),
        }
    }

    pub fn store(&self) -> &ApiKeyStore {
        &self.store
    }
}

#[async_trait]
impl CredentialGate for StoreGate {
    async fn has_credential(&self) -> bool {
        self.store.is_present()
    }

    async fn prompt_for_credential(&self) -> Result<(), GateError> {
        let prompt = self.prompt.clone();
        let key = tokio::task::spawn_blocking(move || prompt())
            .await
            .map_err(|e| GateError::Failed(format!("Prompt task failed: {}", e)))??;
        let key = key.trim();
        if key.is_empty() {
            return Err(GateError::Failed("empty key".to_string()));
        }
        self.store.set(key.to_string());
        Ok(())
    }

    fn forget(&self) {
        self.store.clear();
    }
}
