//! `quotemerge-recon`: schema reconciliation, consolidation and splitting.
//!
//! Pure engine crate: receives pre-loaded tables, returns consolidated
//! datasets and split plans. No CLI or file I/O dependencies.

pub mod config;
pub mod consolidate;
pub mod error;
pub mod key_filter;
pub mod mapper;
pub mod model;
pub mod reconcile;
pub mod split;

pub use config::{OutputFormat, PipelineConfig};
pub use consolidate::consolidate;
pub use error::ReconError;
pub use key_filter::{KeyFilter, KeyFilterStats};
pub use mapper::{ColumnMapper, MappingPolicy, MappingStrategy, NameMapper, PositionalMapper};
pub use model::{Consolidation, Group, Source, SourceBlock, SplitPlan, SplitSummary};
pub use reconcile::{reconcile, Reconciled};
pub use split::split;
