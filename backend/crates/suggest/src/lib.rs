//! Suggest - Adaptive Caching and Ranked Auto-Completion
//!
//! Clean Architecture structure:
//! - `domain/` - History records, ranked suggestions, pure ranking logic
//! - `application/` - Cache-aside use cases for suggestions and insights
//! - `infra/` - TTL cache, durable artifact cache, Postgres history source
//! - `presentation/` - HTTP handlers and DTOs
//!
//! ## Caching Model
//! - Ranked suggestion sets live in an in-process TTL cache keyed by
//!   tenant so one prefix invalidation clears a household
//! - Computed insight artifacts live behind the durable key-value store;
//!   a corrupt payload is a miss, an unreachable store is an error
//! - Malformed historical rows are skipped, never fatal; a failing
//!   history source is an error, never an empty result

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

// Re-exports for convenience
pub use application::config::SuggestConfig;
pub use application::insights::{InsightSource, InsightsUseCase};
pub use application::suggestions::SuggestionsUseCase;
pub use domain::entities::{HistoryRecord, RankedSuggestion, SuggestionBuckets};
pub use error::{SuggestError, SuggestResult};
pub use infra::postgres::PgHistoryRepository;
pub use infra::ttl_cache::TtlCache;
pub use presentation::router::suggest_router;

#[cfg(test)]
mod tests;
