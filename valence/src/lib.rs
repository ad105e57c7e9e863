pub mod config;
pub mod env;
pub mod model;
pub mod geometry {
    pub mod arrows;
    pub mod layout;
    pub mod transform;
}
pub mod interaction {
    pub mod debounce;
    pub mod drag;
    pub mod keyboard;
}
pub mod persist {
    pub mod service;
    pub mod storage;
}
pub mod controller;
pub mod store;

pub use config::CanvasConfig;
pub use controller::CanvasController;
pub use env::{Clock, Environment, IdGenerator, ManualClock, SequentialIds, SystemClock, UuidIds};
pub use model::{
    CanvasState, PersistedCanvasState, PersonNode, Position, TrustLevel, TrustScore, ViewTransform,
    ViewTransformPatch, Viewport,
};
pub use persist::service::{LoadOutcome, PersistenceService, SnapshotError};
pub use persist::storage::{KeyValueStore, MemoryStore, StorageError};
pub use store::CanvasStore;
