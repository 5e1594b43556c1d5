use std::collections::HashMap;
use std::sync::RwLock;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::{EmbeddingError, EmbeddingProvider, Fingerprint, TaskType};

#[derive(Clone)]
enum MockResponse {
    Vector(Vec<f32>),
    Fail(EmbeddingError),
    Hang,
}

/// Scripted embedding provider for tests.
///
/// Texts registered with [`with_vector`](Self::with_vector) / [`with_failure`](Self::with_failure)
/// / [`with_hang`](Self::with_hang) get that response; anything else gets a
/// deterministic [`stub_vector`].
pub struct MockEmbeddingProvider {
    dim: usize,
    model: String,
    responses: RwLock<HashMap<String, MockResponse>>,
    calls: AtomicUsize,
}

impl MockEmbeddingProvider {
    pub fn new(dim: usize) -> Self {
        Self {
            dim,
            model: "mock-embedding".to_string(),
            responses: RwLock::new(HashMap::new()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn with_model(mut self, model: &str) -> Self {
        self.model = model.to_string();
        self
    }

    pub fn with_vector(self, text: &str, vector: Vec<f32>) -> Self {
        self.set(text, MockResponse::Vector(vector));
        self
    }

    pub fn with_failure(self, text: &str, error: EmbeddingError) -> Self {
        self.set(text, MockResponse::Fail(error));
        self
    }

    /// The call for `text` never completes; only a timeout ends it.
    pub fn with_hang(self, text: &str) -> Self {
        self.set(text, MockResponse::Hang);
        self
    }

    /// Replaces the scripted response for `text` after construction.
    pub fn set_vector(&self, text: &str, vector: Vec<f32>) {
        self.set(text, MockResponse::Vector(vector));
    }

    /// Number of `embed` calls so far (cache hits do not count).
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn set(&self, text: &str, response: MockResponse) {
        self.responses
            .write()
            .expect("lock poisoned")
            .insert(text.to_string(), response);
    }

    fn lookup(&self, text: &str) -> Option<MockResponse> {
        self.responses
            .read()
            .expect("lock poisoned")
            .get(text)
            .cloned()
    }
}

impl EmbeddingProvider for MockEmbeddingProvider {
    fn model_id(&self) -> &str {
        &self.model
    }

    async fn embed(&self, text: &str, _task: TaskType) -> Result<Fingerprint, EmbeddingError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        match self.lookup(text) {
            Some(MockResponse::Vector(v)) => Ok(Fingerprint::new(v)),
            Some(MockResponse::Fail(e)) => Err(e),
            Some(MockResponse::Hang) => std::future::pending().await,
            None => Ok(Fingerprint::new(stub_vector(text, self.dim))),
        }
    }
}

/// Deterministic unit vector derived from `text`.
pub fn stub_vector(text: &str, dim: usize) -> Vec<f32> {
    let digest = blake3::hash(text.as_bytes());
    let seed_bytes: [u8; 8] = digest.as_bytes()[0..8]
        .try_into()
        .expect("BLAKE3 always produces at least 8 bytes");
    let mut state = u64::from_le_bytes(seed_bytes);

    let mut embedding = Vec::with_capacity(dim);
    for _ in 0..dim {
        state = state.wrapping_mul(6364136223846793005).wrapping_add(1);
        let value = ((state >> 32) as f32 / u32::MAX as f32) * 2.0 - 1.0;
        embedding.push(value);
    }

    let norm: f32 = embedding.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        for x in &mut embedding {
            *x /= norm;
        }
    }
    embedding
}
