//! Text records read and written around the lineage engine.
//!
//! All functions work on in-memory text or on `Read`/`Write` streams;
//! fetching files and resolving paths is left to the caller.
//! * [LineageNotes] - current and withdrawn lineages
//! * [GroupDefinitions] - group labels with their seed lineages
//! * Collapse map tables, see [CollapseMap::to_tsv](crate::collapse::CollapseMap::to_tsv)

/// Lineage notes with withdrawn records
pub mod lineage_notes;
/// Ordered group definitions
pub mod group_definitions;
/// Collapse map tables
pub mod collapse_map;

pub use collapse_map::COLLAPSE_MAP_HEADER;
pub use group_definitions::GroupDefinitions;
pub use lineage_notes::{LineageNotes, WithdrawnLineage};
