pub mod ai;
pub mod collections;
pub mod error;
pub mod session;
pub mod storage;
pub mod types;
pub mod workflow;

pub use ai::{AiClient, AiConfig, FakeClient, HttpAiClient, ImageData};
pub use collections::{RecipeCollections, HISTORY_LIMIT};
pub use error::GatewayError;
pub use session::Session;
pub use storage::{
    FileStore, MemoryStore, PersistenceBridge, StorageBackend, StorageError, FAVORITES_KEY,
    HISTORY_KEY,
};
pub use types::{ChefMode, Comment, DetectedIngredient, Language, Recipe, RecipeDraft};
pub use workflow::{GenerationKind, RequestToken, Status, View, Workflow};
