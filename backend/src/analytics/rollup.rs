//! Multi-dimensional sales rollups.
//!
//! A rollup groups facts (orders or joined sale lines) by one or more
//! [`Dimension`]s and evaluates a fixed list of [`MetricSpec`]s per group.
//! Every metric is one of three aggregation strategies, and each result is
//! tagged with its numeric kind so integer counts never turn into decimals.

use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap, HashSet};
use uuid::Uuid;

use super::period::{DateWindow, Period};
use super::records::{Order, SaleDate, SaleLine};

/// Bucket for facts that have no value for a grouping dimension.
pub const UNKNOWN_KEY: &str = "unknown";

const KEY_SEPARATOR: &str = "|";
const LABEL_SEPARATOR: &str = " / ";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    ProductCategory,
    Product,
    Region,
    Representative,
    Customer,
    Status,
    /// `YYYY-MM` of the parsed sale date.
    SaleMonth,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Measure {
    Quantity,
    FreeQuantity,
    LineTotal,
    Discount,
    OrderTotal,
}

impl Measure {
    pub fn is_integral(&self) -> bool {
        matches!(self, Self::Quantity | Self::FreeQuantity)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DistinctField {
    Order,
    Customer,
    Product,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Aggregation {
    Sum(Measure),
    Count,
    CountDistinct(DistinctField),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetricSpec {
    pub name: &'static str,
    pub aggregation: Aggregation,
}

impl MetricSpec {
    pub const fn sum(name: &'static str, measure: Measure) -> Self {
        Self { name, aggregation: Aggregation::Sum(measure) }
    }

    pub const fn count(name: &'static str) -> Self {
        Self { name, aggregation: Aggregation::Count }
    }

    pub const fn distinct(name: &'static str, field: DistinctField) -> Self {
        Self { name, aggregation: Aggregation::CountDistinct(field) }
    }

    fn zero(&self) -> MetricValue {
        match self.aggregation {
            Aggregation::Sum(measure) if !measure.is_integral() => MetricValue::Decimal(Decimal::ZERO),
            _ => MetricValue::Integer(0),
        }
    }
}

/// A metric result tagged with its numeric kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum MetricValue {
    Integer(i64),
    Decimal(Decimal),
}

impl MetricValue {
    pub fn as_decimal(&self) -> Decimal {
        match self {
            Self::Integer(value) => Decimal::from(*value),
            Self::Decimal(value) => *value,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Self::Integer(value) => Some(*value),
            Self::Decimal(_) => None,
        }
    }

    pub fn is_zero(&self) -> bool {
        self.as_decimal().is_zero()
    }
}

impl From<MetricValue> for Decimal {
    fn from(value: MetricValue) -> Self {
        value.as_decimal()
    }
}

/// Anything the rollup engine can group and measure.
pub trait Fact {
    /// `(key, label)` for a dimension; `None` lands in the unknown bucket.
    fn dimension(&self, dimension: Dimension) -> Option<(String, String)>;
    /// `None` when the measure does not apply to this kind of fact.
    fn measure(&self, measure: Measure) -> Option<MetricValue>;
    fn distinct(&self, field: DistinctField) -> Option<Uuid>;
    fn sale_date(&self) -> &SaleDate;
}

/// Which facts take part, by sale date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PeriodFilter {
    #[default]
    AllTime,
    /// Parsed sale date inside the window; unparseable dates are excluded.
    Window(DateWindow),
    /// Raw sale-date text contains the year.
    YearMention(i32),
}

impl PeriodFilter {
    pub fn admits(&self, sale_date: &SaleDate) -> bool {
        match self {
            Self::AllTime => true,
            Self::Window(window) => sale_date.within(window),
            Self::YearMention(year) => sale_date.mentions_year(*year),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RollupRow {
    pub key: String,
    pub label: String,
    pub metrics: BTreeMap<&'static str, MetricValue>,
}

impl RollupRow {
    pub fn metric(&self, name: &str) -> Option<MetricValue> {
        self.metrics.get(name).copied()
    }

    pub fn decimal(&self, name: &str) -> Decimal {
        self.metric(name).map(|v| v.as_decimal()).unwrap_or(Decimal::ZERO)
    }

    pub fn integer(&self, name: &str) -> i64 {
        self.metric(name).and_then(|v| v.as_integer()).unwrap_or(0)
    }
}

enum Accumulator {
    IntegerSum(i64),
    DecimalSum(Decimal),
    Count(i64),
    Distinct(HashSet<Uuid>),
}

impl Accumulator {
    fn for_spec(spec: &MetricSpec) -> Self {
        match spec.aggregation {
            Aggregation::Sum(measure) if measure.is_integral() => Self::IntegerSum(0),
            Aggregation::Sum(_) => Self::DecimalSum(Decimal::ZERO),
            Aggregation::Count => Self::Count(0),
            Aggregation::CountDistinct(_) => Self::Distinct(HashSet::new()),
        }
    }

    fn add<F: Fact + ?Sized>(&mut self, aggregation: Aggregation, fact: &F) {
        match (self, aggregation) {
            (Self::IntegerSum(total), Aggregation::Sum(measure)) => {
                if let Some(value) = fact.measure(measure) {
                    *total = total.saturating_add(value.as_integer().unwrap_or(0));
                }
            }
            (Self::DecimalSum(total), Aggregation::Sum(measure)) => {
                if let Some(value) = fact.measure(measure) {
                    *total = total.saturating_add(value.as_decimal());
                }
            }
            (Self::Count(count), _) => *count += 1,
            (Self::Distinct(seen), Aggregation::CountDistinct(field)) => {
                if let Some(id) = fact.distinct(field) {
                    seen.insert(id);
                }
            }
            _ => {}
        }
    }

    fn finish(self) -> MetricValue {
        match self {
            Self::IntegerSum(total) | Self::Count(total) => MetricValue::Integer(total),
            Self::DecimalSum(total) => MetricValue::Decimal(total),
            Self::Distinct(seen) => MetricValue::Integer(seen.len() as i64),
        }
    }
}

struct Group {
    key: String,
    label: String,
    accumulators: Vec<Accumulator>,
}

/// A reusable rollup definition.
#[derive(Debug, Clone, PartialEq)]
pub struct RollupSpec {
    dimensions: Vec<Dimension>,
    metrics: Vec<MetricSpec>,
    order_by: Option<&'static str>,
    period: PeriodFilter,
    limit: Option<usize>,
}

impl RollupSpec {
    /// Groups by `dimensions`; an empty slice puts every fact in one group.
    pub fn by(dimensions: &[Dimension]) -> Self {
        Self {
            dimensions: dimensions.to_vec(),
            metrics: Vec::new(),
            order_by: None,
            period: PeriodFilter::AllTime,
            limit: None,
        }
    }

    pub fn metric(mut self, spec: MetricSpec) -> Self {
        self.metrics.push(spec);
        self
    }

    /// Sort key, descending. Defaults to the first metric.
    pub fn order_by(mut self, name: &'static str) -> Self {
        self.order_by = Some(name);
        self
    }

    pub fn period(mut self, filter: PeriodFilter) -> Self {
        self.period = filter;
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Groups ordered descending by the sort metric; equal groups keep the
    /// order in which their first fact appeared.
    pub fn run<'a, F, I>(&self, facts: I) -> Vec<RollupRow>
    where
        F: Fact + 'a,
        I: IntoIterator<Item = &'a F>,
    {
        let mut groups: Vec<Group> = Vec::new();
        let mut index: HashMap<Vec<String>, usize> = HashMap::new();
        let mut admitted = 0usize;

        for fact in facts.into_iter().filter(|f| self.period.admits(f.sale_date())) {
            admitted += 1;
            let (parts, label) = self.group_key(fact);
            let slot = match index.get(&parts) {
                Some(slot) => *slot,
                None => {
                    groups.push(Group {
                        key: composite_key(&parts),
                        label,
                        accumulators: self.metrics.iter().map(Accumulator::for_spec).collect(),
                    });
                    index.insert(parts, groups.len() - 1);
                    groups.len() - 1
                }
            };

            for (accumulator, spec) in groups[slot].accumulators.iter_mut().zip(&self.metrics) {
                accumulator.add(spec.aggregation, fact);
            }
        }

        let mut rows: Vec<RollupRow> = groups
            .into_iter()
            .map(|group| RollupRow {
                key: group.key,
                label: group.label,
                metrics: self
                    .metrics
                    .iter()
                    .map(|spec| spec.name)
                    .zip(group.accumulators.into_iter().map(Accumulator::finish))
                    .collect(),
            })
            .collect();

        if let Some(sort_key) = self.order_by.or_else(|| self.metrics.first().map(|m| m.name)) {
            // sort_by is stable, which keeps first-appearance order for ties
            rows.sort_by(|a, b| b.decimal(sort_key).cmp(&a.decimal(sort_key)));
        }
        if let Some(limit) = self.limit {
            rows.truncate(limit);
        }

        tracing::debug!(
            dimensions = ?self.dimensions,
            facts = admitted,
            groups = rows.len(),
            "rollup computed"
        );
        rows
    }

    /// Ungrouped totals; zero-valued when no fact passes the period filter.
    pub fn totals<'a, F, I>(&self, facts: I) -> RollupRow
    where
        F: Fact + 'a,
        I: IntoIterator<Item = &'a F>,
    {
        let spec = Self {
            dimensions: Vec::new(),
            limit: None,
            ..self.clone()
        };
        spec.run(facts).into_iter().next().unwrap_or_else(|| RollupRow {
            key: "all".to_string(),
            label: "All".to_string(),
            metrics: self.metrics.iter().map(|m| (m.name, m.zero())).collect(),
        })
    }

    /// Key parts, one per dimension, and the display label.
    fn group_key<F: Fact + ?Sized>(&self, fact: &F) -> (Vec<String>, String) {
        if self.dimensions.is_empty() {
            return (vec!["all".to_string()], "All".to_string());
        }

        let (keys, labels): (Vec<String>, Vec<String>) = self
            .dimensions
            .iter()
            .map(|dimension| {
                fact.dimension(*dimension)
                    .unwrap_or_else(|| (UNKNOWN_KEY.to_string(), "Unknown".to_string()))
            })
            .unzip();

        (keys, labels.join(LABEL_SEPARATOR))
    }
}

/// Joins key parts with `|`, escaping `\` and `|` inside a part.
fn composite_key(parts: &[String]) -> String {
    parts
        .iter()
        .map(|part| part.replace('\\', "\\\\").replace(KEY_SEPARATOR, "\\|"))
        .collect::<Vec<_>>()
        .join(KEY_SEPARATOR)
}

/// `rollup(records, keys, metrics)`, ordered descending by `order_by`.
pub fn rollup<'a, F, I>(
    facts: I,
    dimensions: &[Dimension],
    metrics: &[MetricSpec],
    order_by: &'static str,
) -> Vec<RollupRow>
where
    F: Fact + 'a,
    I: IntoIterator<Item = &'a F>,
{
    metrics
        .iter()
        .fold(RollupSpec::by(dimensions), |spec, metric| spec.metric(*metric))
        .order_by(order_by)
        .run(facts)
}

/// Twelve values, January to December of `year`, for one metric.
pub fn monthly_series<'a, F, I>(facts: I, year: Period, metric: MetricSpec) -> Vec<MetricValue>
where
    F: Fact + 'a,
    I: IntoIterator<Item = &'a F>,
{
    let by_month: HashMap<String, MetricValue> = RollupSpec::by(&[Dimension::SaleMonth])
        .metric(metric)
        .period(PeriodFilter::Window(year.year_window()))
        .run(facts)
        .into_iter()
        .filter_map(|row| row.metric(metric.name).map(|value| (row.key, value)))
        .collect();

    let mut month = Period::containing(year.year_window().start);
    (0..12)
        .map(|_| {
            let value = by_month.get(&month.key()).copied().unwrap_or_else(|| metric.zero());
            month = month.next();
            value
        })
        .collect()
}

fn id_key(id: Option<Uuid>, name: Option<&String>) -> Option<(String, String)> {
    id.map(|id| {
        let label = name.cloned().unwrap_or_else(|| id.to_string());
        (id.to_string(), label)
    })
}

fn text_key(value: Option<&String>) -> Option<(String, String)> {
    value
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .map(|v| (v.to_lowercase(), v.to_string()))
}

fn month_key(sale_date: &SaleDate) -> Option<(String, String)> {
    sale_date.date().map(|date| {
        let key = Period::containing(date).key();
        (key.clone(), key)
    })
}

impl Fact for SaleLine {
    fn dimension(&self, dimension: Dimension) -> Option<(String, String)> {
        match dimension {
            Dimension::ProductCategory => text_key(self.category.as_ref()),
            Dimension::Product => id_key(self.product_id, self.product_name.as_ref()),
            Dimension::Region => text_key(self.region.as_ref()),
            Dimension::Representative => {
                id_key(self.representative_id, self.representative_name.as_ref())
            }
            Dimension::Customer => id_key(self.customer_id, self.customer_name.as_ref()),
            Dimension::Status => {
                Some((self.status.as_str().to_string(), self.status.as_str().to_string()))
            }
            Dimension::SaleMonth => month_key(&self.sale_date),
        }
    }

    fn measure(&self, measure: Measure) -> Option<MetricValue> {
        match measure {
            Measure::Quantity => Some(MetricValue::Integer(self.quantity)),
            Measure::FreeQuantity => Some(MetricValue::Integer(self.free_quantity)),
            Measure::LineTotal => Some(MetricValue::Decimal(self.line_total)),
            Measure::Discount => Some(MetricValue::Decimal(self.discount)),
            Measure::OrderTotal => None,
        }
    }

    fn distinct(&self, field: DistinctField) -> Option<Uuid> {
        match field {
            DistinctField::Order => Some(self.order_id),
            DistinctField::Customer => self.customer_id,
            DistinctField::Product => self.product_id,
        }
    }

    fn sale_date(&self) -> &SaleDate {
        &self.sale_date
    }
}

impl Fact for Order {
    fn dimension(&self, dimension: Dimension) -> Option<(String, String)> {
        match dimension {
            Dimension::Region => text_key(self.region.as_ref()),
            Dimension::Representative => id_key(self.representative_id, None),
            Dimension::Customer => id_key(self.customer_id, self.customer_name.as_ref()),
            Dimension::Status => {
                Some((self.status.as_str().to_string(), self.status.as_str().to_string()))
            }
            Dimension::SaleMonth => month_key(&self.sale_date),
            Dimension::ProductCategory | Dimension::Product => None,
        }
    }

    fn measure(&self, measure: Measure) -> Option<MetricValue> {
        match measure {
            Measure::OrderTotal => Some(MetricValue::Decimal(self.total_amount)),
            _ => None,
        }
    }

    fn distinct(&self, field: DistinctField) -> Option<Uuid> {
        match field {
            DistinctField::Order => Some(self.id),
            DistinctField::Customer => self.customer_id,
            DistinctField::Product => None,
        }
    }

    fn sale_date(&self) -> &SaleDate {
        &self.sale_date
    }
}
