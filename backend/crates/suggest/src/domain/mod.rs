//! Domain Layer - Records, suggestions and ranking
//!
//! This layer contains:
//! - Domain entities (HistoryRecord, RankedSuggestion, SuggestionBuckets)
//! - Domain value objects (TimeOfDay, BucketLimits)
//! - Domain services (the ranking algorithm)
//! - Repository traits (interfaces)

pub mod entities;
pub mod repository;
pub mod services;
pub mod value_objects;
