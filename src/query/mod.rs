//! List query engines: filtering, sorting, and view-state sync over
//! fetched collections.

mod filters;
mod positions;
mod providers;
mod sort;

pub use filters::{PositionFilters, ProviderFilters, Selection};
pub use positions::PositionsQuery;
pub use providers::{ProvidersOptions, ProvidersQuery};
pub use sort::{ProviderSort, ProviderSortKey, SortDirection};

/// Lifecycle of a list query instance. Filter and sort changes re-derive
/// synchronously within `Ready`; parameter changes that require a
/// refetch drop back to `Loading` until the next refresh completes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    Uninitialized,
    Loading,
    Ready,
}
