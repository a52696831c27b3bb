//! Audit engine: analysis service client, request execution and artifact delivery.
mod client;
mod engine;
mod persist;
mod types;
mod wire;

pub use client::{AuditService, ClientSettings, ReqwestAuditClient, DEFAULT_BASE_URL};
pub use engine::EngineHandle;
pub use persist::{ensure_output_dir, ArtifactWriter, PersistError};
pub use types::{EngineEvent, FailureKind, ServiceError};
