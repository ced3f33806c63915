//! Dashboard Pipeline
//! load -> aggregate -> render model, run once per source file.

use crate::charts::{AddressType, BarChartSpec, ChartBuilder, LineChartSpec, PanelChartSpec};
use crate::data::{
    AddressCount, AddressValue, AggregatorError, HourlyBucket, LoaderError, TransactionAggregator,
    TransactionLoader,
};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum DashboardError {
    #[error(transparent)]
    Loader(#[from] LoaderError),
    #[error(transparent)]
    Aggregator(#[from] AggregatorError),
}

/// Results of the three aggregation passes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Aggregates {
    pub top_senders: Vec<AddressCount>,
    pub top_receivers: Vec<AddressCount>,
    pub top_payers: Vec<AddressValue>,
    pub top_payees: Vec<AddressValue>,
    pub hourly: Vec<HourlyBucket>,
}

/// Everything the UI needs to draw one run.
///
/// Aggregates are computed once; switching the address type only changes
/// which series the active-address chart shows.
#[derive(Debug, Clone)]
pub struct RenderModel {
    source: PathBuf,
    row_count: usize,
    dropped_rows: usize,
    top_n: usize,
    aggregates: Aggregates,
    address_type: AddressType,
}

impl RenderModel {
    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn row_count(&self) -> usize {
        self.row_count
    }

    pub fn dropped_rows(&self) -> usize {
        self.dropped_rows
    }

    pub fn top_n(&self) -> usize {
        self.top_n
    }

    pub fn aggregates(&self) -> &Aggregates {
        &self.aggregates
    }

    pub fn address_type(&self) -> AddressType {
        self.address_type
    }

    /// Switch the active-address chart between senders and receivers.
    pub fn select(&mut self, address_type: AddressType) {
        if self.address_type != address_type {
            debug!(selected = address_type.label(), "address type changed");
            self.address_type = address_type;
        }
    }

    pub fn active_addresses_chart(&self) -> BarChartSpec {
        ChartBuilder::active_addresses(
            &self.aggregates.top_senders,
            &self.aggregates.top_receivers,
            self.address_type,
            self.top_n,
        )
    }

    pub fn value_chart(&self) -> PanelChartSpec {
        ChartBuilder::value_comparison(
            &self.aggregates.top_payers,
            &self.aggregates.top_payees,
            self.top_n,
        )
    }

    pub fn hourly_chart(&self) -> LineChartSpec {
        ChartBuilder::hourly_trend(&self.aggregates.hourly)
    }
}

/// Load `source` and compute every aggregation.
///
/// Any load failure stops the run; no partial model is produced.
pub fn run(source: impl AsRef<Path>, top_n: usize) -> Result<RenderModel, DashboardError> {
    let source = source.as_ref();
    let mut loader = TransactionLoader::new();
    loader.load_csv(source)?;
    let df = loader.get_dataframe().ok_or(LoaderError::NoData)?;

    let active =
        |kind: AddressType| TransactionAggregator::top_active_addresses(df, kind.into(), top_n);
    let movers =
        |kind: AddressType| TransactionAggregator::top_value_movers(df, kind.into(), top_n);

    let aggregates = Aggregates {
        top_senders: active(AddressType::Sender)?,
        top_receivers: active(AddressType::Receiver)?,
        top_payers: movers(AddressType::Sender)?,
        top_payees: movers(AddressType::Receiver)?,
        hourly: TransactionAggregator::hourly_volume(df)?,
    };

    let model = RenderModel {
        source: source.to_path_buf(),
        row_count: df.height(),
        dropped_rows: loader.get_dropped_rows(),
        top_n,
        aggregates,
        address_type: AddressType::default(),
    };
    info!(
        rows = model.row_count,
        hours = model.aggregates.hourly.len(),
        "dashboard aggregates ready"
    );
    Ok(model)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::write_csv;

    const SAMPLE: &str = "Time,Action,From,To,Amount,Value\n\
        1700000000,Transfer,alice,bob,100,10\n\
        1700000100,Transfer,alice,carol,50,5\n\
        1700003700,Transfer,bob,carol,75,7.5\n\
        1700003800,Swap,alice,bob,10,1\n\
        1700010000,Transfer,dave,alice,1000,100\n\
        1700010001,Transfer,carol,bob,3,oops\n";

    #[test]
    fn missing_source_halts_the_run() {
        let result = run("/no/such/dir/shitcoin_data.csv", 10);

        assert!(matches!(
            result,
            Err(DashboardError::Loader(LoaderError::DataSourceNotFound(_)))
        ));
    }

    #[test]
    fn runs_all_three_aggregations() {
        let path = write_csv("pipeline_sample", SAMPLE);

        let model = run(&path, 10).unwrap();

        assert_eq!(model.row_count(), 5);
        assert_eq!(model.dropped_rows(), 1);
        assert_eq!(model.source(), path.as_path());
        assert_eq!(model.aggregates().top_senders[0].address, "alice");
        assert_eq!(model.aggregates().top_payers[0].address, "dave");
        let bucketed: u64 = model.aggregates().hourly.iter().map(|b| b.count).sum();
        assert_eq!(bucketed as usize, model.row_count());
    }

    #[test]
    fn nan_values_never_reach_the_rankings() {
        let path = write_csv(
            "pipeline_nan",
            "Time,Action,From,To,Amount,Value\n\
             1700000000,Transfer,alice,bob,1,5\n\
             1700000001,Transfer,mallory,bob,1,NaN\n\
             1700000002,Transfer,alice,bob,1,3\n",
        );

        let model = run(&path, 10).unwrap();

        assert_eq!(model.row_count(), 2);
        assert_eq!(
            model.aggregates().top_payers,
            vec![AddressValue {
                address: "alice".to_string(),
                total: 8.0
            }]
        );
        assert_eq!(
            model.aggregates().top_payees,
            vec![AddressValue {
                address: "bob".to_string(),
                total: 8.0
            }]
        );
        let bucketed: u64 = model.aggregates().hourly.iter().map(|b| b.count).sum();
        assert_eq!(bucketed, 2);
    }

    #[test]
    fn header_only_source_renders_empty_charts() {
        let path = write_csv("pipeline_empty", "Time,Action,From,To,Amount,Value\n");

        let model = run(&path, 10).unwrap();

        assert_eq!(model.aggregates(), &Aggregates::default());
        assert!(!model.active_addresses_chart().has_data());
        assert!(model.value_chart().panels.iter().all(|p| !p.has_data()));
        assert!(!model.hourly_chart().has_data());
    }

    #[test]
    fn toggling_swaps_series_without_touching_aggregates() {
        let path = write_csv("pipeline_toggle", SAMPLE);
        let mut model = run(&path, 10).unwrap();
        let before = model.aggregates().clone();

        assert_eq!(model.active_addresses_chart().title, "Top 10 Senders");
        model.select(AddressType::Receiver);
        let chart = model.active_addresses_chart();

        assert_eq!(chart.title, "Top 10 Receivers");
        let visible: Vec<&str> = chart.visible_series().map(|s| s.name.as_str()).collect();
        assert_eq!(visible, vec!["Receiver"]);
        assert_eq!(model.aggregates(), &before);
    }

    #[test]
    fn top_n_drives_titles() {
        let path = write_csv("pipeline_top_n", SAMPLE);

        let model = run(&path, 2).unwrap();

        assert_eq!(model.aggregates().top_senders.len(), 2);
        assert_eq!(model.active_addresses_chart().title, "Top 2 Senders");
        assert_eq!(model.value_chart().panels[0].title, "Top 2 Paying Addresses");
    }
}
