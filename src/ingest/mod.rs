/// Data ingestion from the remote record store.

pub mod store;

#[cfg(test)]
pub(crate) mod fixtures;
