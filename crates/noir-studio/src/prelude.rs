//! Convenience re-exports for common `noir-studio` types.
//!
//! ```ignore
//! use noir_studio::prelude::*;
//! ```
//!
//! Pulls in what most front ends need: the studio and its client, inputs,
//! the feature catalogue, results, batch observers, and exports. Wire types
//! and descriptor internals stay in their modules.

// ── Core ────────────────────────────────────────────────────────────
pub use crate::completion::{CompletionBackend, CompletionClient, GeneratedImage};
pub use crate::config::{StudioConfig, api_key_from_env};
pub use crate::error::{ModelCommunicationError, StudioError};
pub use crate::studio::Studio;
pub use crate::{OpenRouterClient, json_schema_for};

// ── Features and results ────────────────────────────────────────────
pub use crate::chat::{ChatEntry, Speaker, Transcript};
pub use crate::matrix::MatrixEntry;
pub use crate::prompt::Inputs;
pub use crate::schema::{Feature, GeneratedResult, Mode, ResultType};

// ── Batches ─────────────────────────────────────────────────────────
pub use crate::batch::{
    BatchEvent, BatchObserver, BatchOutcome, CompositeObserver, FnObserver, LoggingObserver,
    NoopObserver,
};

// ── Output ──────────────────────────────────────────────────────────
pub use crate::export::{ExportFile, export, export_batch, export_matrix};
pub use crate::render::{Panel, PanelBody, panels};
