//! # insight-embeddings
//!
//! Turns insight text into fixed-length vectors behind one shared,
//! expensively initialized model instance.
//!
//! ## Architecture
//!
//! ```text
//! EmbeddingEngine (implements IEmbeddingProvider)
//! ├── init barrier (OnceCell, Uninitialized → Initializing → Ready)
//! ├── IModelLoader → IEmbeddingModel
//! │   ├── OllamaLoader (HTTP, local server)
//! │   └── HashingLoader (offline, always available)
//! ├── normalize (RawEmbedding → Vec<f32>)
//! └── EmbeddingCache (moka, keyed by blake3 of model name and text)
//! ```

pub mod cache;
pub mod engine;
pub mod normalize;
pub mod providers;

pub use cache::EmbeddingCache;
pub use engine::{EmbeddingEngine, InitState};
pub use normalize::{to_vector, RawEmbedding};
pub use providers::{create_loader, HashingLoader, IEmbeddingModel, IModelLoader, OllamaLoader};
