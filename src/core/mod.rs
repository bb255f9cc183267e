//! Local task collection and its reconciling mutations.

/// Collection store, draft handling and remote reconciliation.
pub mod store;
