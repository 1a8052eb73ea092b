//! lineage-graph — lineage traversal and card layout around a target artifact.
//!
//! The loader walks two hops through the metadata store, the grouper turns
//! the result into one card per type, and the view ties both to a movable
//! target.

pub mod cards;
pub mod config;
pub mod history;
pub mod layout;
pub mod loader;
pub mod store;
pub mod view;

pub use cards::{Adjacency, CardGroup, CardGrouper, RouteBuilder, RowDescriptor, TargetContext};
pub use config::LineageConfig;
pub use history::{Breadcrumbs, TargetHistory};
pub use layout::{CardColumn, ColumnType, LineageLayout};
pub use loader::{GraphLoader, LineageGraph};
pub use store::{InMemoryStore, MetadataStore, StoreSnapshot};
pub use view::{LineageView, Retarget, ViewState};
