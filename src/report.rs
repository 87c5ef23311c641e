use serde::Serialize;

use crate::aggregate::{aggregate, AggregationRequest, AggregationResult};
use crate::data::model::{Transaction, TransactionTable};
use crate::error::AggregationError;

const SALES: &str = "Total Sales Value (NGN)";
const SUPPLY_COST: &str = "Total Supply Cost (NGN)";
const QUANTITY: &str = "Quantity Sold (kg)";
const UNIT_COST: &str = "Cost per Unit Supply (NGN)";
const UNIT_PRICE: &str = "Price per Unit Sold (NGN)";
const PROFIT: &str = "Profit";
const FISH_TYPE: &str = "Fish Type";
const FISH_SIZE: &str = "Fish Size";
const SUPPLIER: &str = "Supplier Information";
const CUSTOMER_TYPE: &str = "Customer Type";
const LOCATION: &str = "Customer Location";
const CHANNEL: &str = "Sales Channel";

// ---------------------------------------------------------------------------
// Sections of the dashboard and the charts each one shows
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Section {
    Overview,
    TrendAnalysis,
    ProductAnalysis,
    SupplierAnalysis,
    CustomerBehaviour,
}

/// A titled aggregation the presentation layer turns into a chart.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSpec {
    pub title: &'static str,
    pub request: AggregationRequest,
}

impl ChartSpec {
    fn new(title: &'static str, request: AggregationRequest) -> Self {
        Self { title, request }
    }
}

impl Section {
    pub const ALL: [Section; 5] = [
        Section::Overview,
        Section::TrendAnalysis,
        Section::ProductAnalysis,
        Section::SupplierAnalysis,
        Section::CustomerBehaviour,
    ];

    pub fn title(self) -> &'static str {
        match self {
            Section::Overview => "Overview",
            Section::TrendAnalysis => "Trend Analysis",
            Section::ProductAnalysis => "Product Analysis",
            Section::SupplierAnalysis => "Brand Supplier Analysis",
            Section::CustomerBehaviour => "Customer Behavioural Analysis",
        }
    }

    pub fn charts(self) -> Vec<ChartSpec> {
        use crate::aggregate::AggregationRequest as R;
        use crate::aggregate::ResamplePeriod::{Annual, Monthly};
        use crate::aggregate::Statistic::{Mean, Sum};

        match self {
            Section::Overview => vec![
                ChartSpec::new("Dataset Statistics", R::Describe),
                ChartSpec::new("Monthly Total Sales Value", R::resample(SALES, Monthly, Sum)),
            ],
            Section::TrendAnalysis => vec![
                ChartSpec::new("Monthly Sales Value", R::resample(SALES, Monthly, Sum)),
                ChartSpec::new("Monthly Profit", R::resample(PROFIT, Monthly, Sum)),
                ChartSpec::new("Annual Quantity Sold", R::resample(QUANTITY, Annual, Sum)),
                ChartSpec::new("Average Price per Unit", R::resample(UNIT_PRICE, Monthly, Mean)),
            ],
            Section::ProductAnalysis => vec![
                ChartSpec::new("Quantity Sold by Fish Type", R::group_sum(FISH_TYPE, QUANTITY)),
                ChartSpec::new("Fish Size Mix", R::proportion(FISH_SIZE)),
                ChartSpec::new("Average Price by Fish Type", R::group_mean(FISH_TYPE, UNIT_PRICE)),
                ChartSpec::new("Top 5 Fish Types by Profit", R::top_n(FISH_TYPE, PROFIT, 5)),
            ],
            Section::SupplierAnalysis => vec![
                ChartSpec::new("Supply Cost by Supplier", R::group_sum(SUPPLIER, SUPPLY_COST)),
                ChartSpec::new("Top 5 Suppliers by Sales", R::top_n(SUPPLIER, SALES, 5)),
                ChartSpec::new("Average Unit Cost by Supplier", R::group_mean(SUPPLIER, UNIT_COST)),
            ],
            Section::CustomerBehaviour => vec![
                ChartSpec::new("Customer Type Mix", R::proportion(CUSTOMER_TYPE)),
                ChartSpec::new("Sales by Location and Channel", R::two_level(LOCATION, CHANNEL, SALES)),
                ChartSpec::new("Average Sale by Customer Type", R::group_mean(CUSTOMER_TYPE, SALES)),
                ChartSpec::new("Sales Channel Mix", R::proportion(CHANNEL)),
            ],
        }
    }
}

// ---------------------------------------------------------------------------
// Overview headline figures
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct OverviewMetrics {
    pub total_profit: f64,
    pub total_sales_value: f64,
    pub total_quantity_kg: f64,
}

impl OverviewMetrics {
    pub fn compute(table: &TransactionTable) -> Self {
        table.rows().iter().fold(Self::default(), |acc, tx| Self {
            total_profit: acc.total_profit + tx.profit(),
            total_sales_value: acc.total_sales_value + tx.total_sales_value(),
            total_quantity_kg: acc.total_quantity_kg + tx.quantity_sold_kg,
        })
    }
}

/// The first `n` rows of the table.
pub fn preview(table: &TransactionTable, n: usize) -> &[Transaction] {
    &table.rows()[..n.min(table.len())]
}

// ---------------------------------------------------------------------------
// Rendering a section
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct RenderedChart {
    pub title: &'static str,
    /// A bad chart definition only affects its own chart.
    pub result: Result<AggregationResult, AggregationError>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SectionReport {
    pub section: Section,
    /// Present for [`Section::Overview`] only.
    pub metrics: Option<OverviewMetrics>,
    pub preview: Vec<Transaction>,
    pub charts: Vec<RenderedChart>,
}

/// Run every chart of `section` over an already filtered table.
pub fn render_section(table: &TransactionTable, section: Section, preview_rows: usize) -> SectionReport {
    let mut report = render_charts(table, section, section.charts());
    if section == Section::Overview {
        report.metrics = Some(OverviewMetrics::compute(table));
        report.preview = preview(table, preview_rows).to_vec();
    }
    report
}

pub(crate) fn render_charts(table: &TransactionTable, section: Section, specs: Vec<ChartSpec>) -> SectionReport {
    let charts = specs
        .into_iter()
        .map(|spec| {
            let result = aggregate(table, &spec.request);
            if let Err(e) = &result {
                log::warn!("Chart '{}' failed: {e}", spec.title);
            }
            RenderedChart {
                title: spec.title,
                result,
            }
        })
        .collect();
    SectionReport {
        section,
        metrics: None,
        preview: Vec::new(),
        charts,
    }
}
