//! Transaction Aggregator Module
//! Frequency counts, value sums and hourly buckets over the working table.
//!
//! Every pass is a pure function of the table. Ties between equal metrics keep
//! the order the group-by produced them in, which is not a contract.

use crate::data::loader::{FROM, TIME, TO, VALUE};
use chrono::{DateTime, Utc};
use polars::prelude::*;
use thiserror::Error;
use tracing::debug;

const COUNT: &str = "count";
const HOUR: &str = "hour";
const HOUR_MS: i64 = 3_600_000;

#[derive(Error, Debug)]
pub enum AggregatorError {
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
}

/// Which side of a transaction an address is taken from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressRole {
    /// The `From` column
    Sender,
    /// The `To` column
    Receiver,
}

impl AddressRole {
    pub fn column(self) -> &'static str {
        match self {
            AddressRole::Sender => FROM,
            AddressRole::Receiver => TO,
        }
    }
}

/// Number of transactions an address took part in.
#[derive(Debug, Clone, PartialEq)]
pub struct AddressCount {
    pub address: String,
    pub count: u64,
}

/// Summed `Value` over the transactions of an address.
#[derive(Debug, Clone, PartialEq)]
pub struct AddressValue {
    pub address: String,
    pub total: f64,
}

/// Transactions whose time falls within one clock hour.
#[derive(Debug, Clone, PartialEq)]
pub struct HourlyBucket {
    pub hour: DateTime<Utc>,
    pub count: u64,
}

pub struct TransactionAggregator;

impl TransactionAggregator {
    /// The `n` most frequent addresses for `role`, by descending count.
    pub fn top_active_addresses(
        df: &DataFrame,
        role: AddressRole,
        n: usize,
    ) -> Result<Vec<AddressCount>, AggregatorError> {
        let key = role.column();
        let ranked = df
            .clone()
            .lazy()
            .filter(col(key).is_not_null())
            .group_by_stable([col(key)])
            .agg([len().alias(COUNT)])
            .sort([COUNT], Self::descending())
            .limit(n as IdxSize)
            .collect()?;

        let addresses = Self::string_values(&ranked, key)?;
        let counts = ranked.column(COUNT)?.cast(&DataType::UInt64)?;
        let counts = counts.u64()?;

        let top: Vec<AddressCount> = addresses
            .into_iter()
            .zip(counts.into_iter())
            .map(|(address, count)| AddressCount {
                address,
                count: count.unwrap_or(0),
            })
            .collect();

        debug!(column = key, entries = top.len(), "ranked active addresses");
        Ok(top)
    }

    /// The `n` addresses for `role` with the largest summed `Value`, descending.
    pub fn top_value_movers(
        df: &DataFrame,
        role: AddressRole,
        n: usize,
    ) -> Result<Vec<AddressValue>, AggregatorError> {
        let key = role.column();
        let ranked = df
            .clone()
            .lazy()
            .filter(col(key).is_not_null())
            .group_by_stable([col(key)])
            .agg([col(VALUE).sum()])
            .sort([VALUE], Self::descending())
            .limit(n as IdxSize)
            .collect()?;

        let addresses = Self::string_values(&ranked, key)?;
        let totals = ranked.column(VALUE)?.cast(&DataType::Float64)?;
        let totals = totals.f64()?;

        let top: Vec<AddressValue> = addresses
            .into_iter()
            .zip(totals.into_iter())
            .map(|(address, total)| AddressValue {
                address,
                total: total.unwrap_or(0.0),
            })
            .collect();

        debug!(column = key, entries = top.len(), "ranked value movers");
        Ok(top)
    }

    /// Transaction counts per clock hour, oldest first.
    ///
    /// Hours without transactions are absent rather than zero.
    pub fn hourly_volume(df: &DataFrame) -> Result<Vec<HourlyBucket>, AggregatorError> {
        let bucketed = df
            .clone()
            .lazy()
            .filter(col(TIME).is_not_null())
            .select([(col(TIME).cast(DataType::Int64).floor_div(lit(HOUR_MS))
                * lit(HOUR_MS))
            .alias(HOUR)])
            .group_by([col(HOUR)])
            .agg([len().alias(COUNT)])
            .sort([HOUR], SortMultipleOptions::default())
            .collect()?;

        let hours = bucketed.column(HOUR)?.cast(&DataType::Int64)?;
        let hours = hours.i64()?;
        let counts = bucketed.column(COUNT)?.cast(&DataType::UInt64)?;
        let counts = counts.u64()?;

        let buckets: Vec<HourlyBucket> = hours
            .into_iter()
            .zip(counts.into_iter())
            .filter_map(|(hour, count)| {
                Some(HourlyBucket {
                    hour: DateTime::from_timestamp_millis(hour?)?,
                    count: count.unwrap_or(0),
                })
            })
            .collect();

        debug!(buckets = buckets.len(), "bucketed hourly volume");
        Ok(buckets)
    }

    fn descending() -> SortMultipleOptions {
        SortMultipleOptions::default()
            .with_order_descending(true)
            .with_maintain_order(true)
    }

    fn string_values(df: &DataFrame, column: &str) -> Result<Vec<String>, AggregatorError> {
        let values = df.column(column)?.cast(&DataType::String)?;
        Ok(values
            .str()?
            .into_iter()
            .map(|v| v.unwrap_or_default().to_string())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::tests::raw_frame;
    use crate::data::TransactionLoader;

    fn working_table(rows: &[(&str, &str, &str, &str)]) -> DataFrame {
        let mut loader = TransactionLoader::new();
        loader.install(raw_frame(rows)).unwrap().clone()
    }

    fn sample() -> DataFrame {
        working_table(&[
            ("1700000000", "alice", "bob", "10"),
            ("1700000100", "alice", "carol", "5"),
            ("1700003700", "bob", "carol", "7.5"),
            ("1700003800", "alice", "bob", "1"),
            ("1700010000", "dave", "alice", "100"),
            ("1700010001", "carol", "bob", "oops"),
        ])
    }

    #[test]
    fn counts_senders_and_receivers_descending() {
        let df = sample();

        let senders =
            TransactionAggregator::top_active_addresses(&df, AddressRole::Sender, 10).unwrap();
        assert_eq!(
            senders[0],
            AddressCount {
                address: "alice".to_string(),
                count: 3
            }
        );
        assert_eq!(senders.len(), 3);
        assert!(senders.windows(2).all(|w| w[0].count >= w[1].count));

        let receivers =
            TransactionAggregator::top_active_addresses(&df, AddressRole::Receiver, 10).unwrap();
        let names: Vec<&str> = receivers.iter().map(|r| r.address.as_str()).collect();
        assert_eq!(receivers[0].count, 2);
        assert!(names.contains(&"bob") && names.contains(&"carol"));
        assert_eq!(receivers.iter().map(|r| r.count).sum::<u64>(), 5);
    }

    #[test]
    fn top_lists_are_capped() {
        let rows: Vec<(String, String)> = (0..25)
            .map(|i| (format!("{}", 1_700_000_000 + i), format!("addr{i:02}")))
            .collect();
        let rows: Vec<(&str, &str, &str, &str)> = rows
            .iter()
            .map(|(t, a)| (t.as_str(), a.as_str(), "sink", "1"))
            .collect();
        let df = working_table(&rows);

        let senders =
            TransactionAggregator::top_active_addresses(&df, AddressRole::Sender, 10).unwrap();
        let payers = TransactionAggregator::top_value_movers(&df, AddressRole::Sender, 10).unwrap();
        let receivers =
            TransactionAggregator::top_active_addresses(&df, AddressRole::Receiver, 10).unwrap();

        assert_eq!(senders.len(), 10);
        assert_eq!(payers.len(), 10);
        assert_eq!(receivers.len(), 1);
        assert_eq!(receivers[0].count, 25);
    }

    #[test]
    fn sums_values_per_address_descending() {
        let df = sample();

        let payers = TransactionAggregator::top_value_movers(&df, AddressRole::Sender, 10).unwrap();
        assert_eq!(
            payers,
            vec![
                AddressValue {
                    address: "dave".to_string(),
                    total: 100.0
                },
                AddressValue {
                    address: "alice".to_string(),
                    total: 16.0
                },
                AddressValue {
                    address: "bob".to_string(),
                    total: 7.5
                },
            ]
        );

        let payees = TransactionAggregator::top_value_movers(&df, AddressRole::Receiver, 2).unwrap();
        assert_eq!(payees.len(), 2);
        assert_eq!(payees[0].address, "alice");
        assert_eq!(payees[1].address, "carol");
        assert_eq!(payees[1].total, 12.5);
    }

    #[test]
    fn displayed_pay_never_exceeds_full_table_sum() {
        let df = sample();
        let payers = TransactionAggregator::top_value_movers(&df, AddressRole::Sender, 2).unwrap();

        let froms = df.column(FROM).unwrap().str().unwrap();
        let values = df.column(VALUE).unwrap().f64().unwrap();
        for payer in payers {
            let full: f64 = froms
                .into_iter()
                .zip(values.into_iter())
                .filter(|(from, _)| *from == Some(payer.address.as_str()))
                .filter_map(|(_, v)| v)
                .sum();
            assert!(payer.total <= full);
        }
    }

    #[test]
    fn buckets_by_hour_in_order() {
        let df = sample();

        let buckets = TransactionAggregator::hourly_volume(&df).unwrap();
        let hours: Vec<i64> = buckets.iter().map(|b| b.hour.timestamp()).collect();
        let counts: Vec<u64> = buckets.iter().map(|b| b.count).collect();

        // 22:00, 23:00 and 01:00 UTC; the empty midnight hour is skipped
        assert_eq!(hours, vec![1_699_999_200, 1_700_002_800, 1_700_010_000]);
        assert_eq!(counts, vec![2, 2, 1]);
    }

    #[test]
    fn bucket_counts_sum_to_row_count() {
        let df = sample();

        let buckets = TransactionAggregator::hourly_volume(&df).unwrap();
        let total: u64 = buckets.iter().map(|b| b.count).sum();

        assert_eq!(total as usize, df.height());
    }

    #[test]
    fn empty_table_yields_empty_results() {
        let df = working_table(&[]);

        assert!(
            TransactionAggregator::top_active_addresses(&df, AddressRole::Sender, 10)
                .unwrap()
                .is_empty()
        );
        assert!(
            TransactionAggregator::top_value_movers(&df, AddressRole::Receiver, 10)
                .unwrap()
                .is_empty()
        );
        assert!(TransactionAggregator::hourly_volume(&df).unwrap().is_empty());
    }
}
