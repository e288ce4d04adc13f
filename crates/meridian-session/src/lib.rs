//! # meridian-session: Edit Sessions for Meridian Back-Office
//!
//! Sits between the product screens and [`meridian_core`]: owns the
//! in-memory [`EditSession`] per open document, the async [`DocumentStore`]
//! contract the host implements, and the parse-and-validate boundary that
//! turns loose wire payloads into well-formed core types.
//!
//! ## Layer Responsibilities
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     meridian-session Layout                             │
//! │                                                                         │
//! │  ┌───────────┐   loose DTOs    ┌──────────┐   core types                │
//! │  │  store    │ ──────────────► │  parse   │ ──────────────┐             │
//! │  │ (contract)│                 │(validate)│               ▼             │
//! │  └─────▲─────┘                 └──────────┘        ┌────────────┐       │
//! │        │   full atomic payload                     │  session   │       │
//! │        └───────────────────────────────────────────│(EditSession│       │
//! │                                                    │   + audit) │       │
//! │  ┌───────────┐  scripted failures, inspection      └────────────┘       │
//! │  │  testing  │ ◄── in-memory store double for tests and prototyping    │
//! │  └───────────┘                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Sessions are single-threaded and UI-event-driven; the store is the only
//! async seam. Nothing here caches totals or retries failed saves: totals
//! are recomputed in full on every mutation, and a failed save leaves the
//! in-memory document intact for the operator to retry.

// =============================================================================
// Module Declarations
// =============================================================================

pub mod dto;
pub mod error;
pub mod parse;
pub mod session;
pub mod store;
pub mod testing;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use dto::{
    AuditEntryDto, CatalogScope, DocumentDto, LineItemDto, ProductDto, RecordReturnRequest,
    ReturnDto, SaveDocumentRequest, SaveOutcome,
};
pub use error::{SessionError, SessionResult, StoreError};
pub use parse::{parse_document, parse_product, parse_return, parse_status, ParsedDocument};
pub use session::EditSession;
pub use store::{BatchOutcome, DocumentStore, StoreResult};
