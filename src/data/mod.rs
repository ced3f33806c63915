//! Data module - transaction loading and aggregation

mod aggregator;
mod loader;

pub use aggregator::{
    AddressCount, AddressRole, AddressValue, AggregatorError, HourlyBucket, TransactionAggregator,
};
pub use loader::{LoaderError, TransactionLoader};

#[cfg(test)]
pub(crate) use loader::tests::write_csv;
