//! Sections of an analytics report and the rollups that fill them.
//!
//! Each builder takes records already restricted to one owner scope. Cancelled
//! orders are expected to be filtered out by the caller for every money or
//! unit figure; only [`status_breakdown`] and [`order_listing`] see them.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use fieldrep_shared::{CustomerRecord, ProductRecord};

use super::calendar::{CalendarDay, CalendarEvent};
use super::period::{Period, PeriodWindows};
use super::records::{Order, OrderStatus, SaleLine};
use super::rollup::{
    monthly_series, rollup, Dimension, DistinctField, Measure, MetricSpec, PeriodFilter,
    RollupRow, RollupSpec,
};
use super::trend::{growth_rate, monthly_trend};
use crate::pagination::{PaginatedResponse, PaginationParams};

pub const SALES: MetricSpec = MetricSpec::sum("total_sales", Measure::OrderTotal);
pub const LINE_SALES: MetricSpec = MetricSpec::sum("total_sales", Measure::LineTotal);
pub const UNITS: MetricSpec = MetricSpec::sum("quantity", Measure::Quantity);
pub const FREE_UNITS: MetricSpec = MetricSpec::sum("free_quantity", Measure::FreeQuantity);
pub const DISCOUNTS: MetricSpec = MetricSpec::sum("discount", Measure::Discount);
pub const ORDERS: MetricSpec = MetricSpec::distinct("orders", DistinctField::Order);
pub const CUSTOMERS: MetricSpec = MetricSpec::distinct("customers", DistinctField::Customer);
pub const PRODUCTS: MetricSpec = MetricSpec::distinct("products", DistinctField::Product);
const STATUS_COUNT: MetricSpec = MetricSpec::count("orders");

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum Actor {
    Administrator,
    Customer(Uuid),
    Representative(Uuid),
    /// The representative's mobile app view.
    Mobile(Uuid),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SalesStatistics {
    /// All-time order totals, cancelled orders excluded.
    pub total_sales: Decimal,
    /// All orders visible to the actor, any status.
    pub total_orders: i64,
    pub monthly_sales: Decimal,
    pub monthly_orders: i64,
    pub previous_month_sales: Decimal,
    /// Percent change against the previous month; zero when that month had no sales.
    pub monthly_growth: Decimal,
    pub yearly_sales: Decimal,
    pub units_sold: i64,
    pub average_order_value: Decimal,
    pub total_customers: i64,
    /// Customers with at least one order in the month.
    pub active_customers: i64,
    pub status_breakdown: StatusBreakdown,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusBreakdown {
    pub pending: i64,
    pub completed: i64,
    pub cancelled: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Distributions {
    pub by_category: Vec<RollupRow>,
    pub top_products: Vec<RollupRow>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub by_region: Option<Vec<RollupRow>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub by_representative: Option<Vec<RollupRow>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub by_customer: Option<Vec<RollupRow>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendSeries {
    pub year: i32,
    pub monthly_sales: Vec<Decimal>,
    pub monthly_orders: Vec<i64>,
    pub monthly_units: Vec<i64>,
    pub sales_change: Vec<String>,
    pub orders_change: Vec<String>,
    pub units_change: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LowStockProduct {
    pub id: Uuid,
    pub brand_name: String,
    pub generic_name: Option<String>,
    pub category: Option<String>,
    pub inventory: i32,
    pub price: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InventorySummary {
    pub total_products: i64,
    pub total_units: i64,
    pub stock_value: Decimal,
    pub low_stock_threshold: i32,
    pub low_stock: Vec<LowStockProduct>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderSummary {
    pub id: Uuid,
    pub customer_id: Option<Uuid>,
    pub customer_name: Option<String>,
    pub representative_id: Option<Uuid>,
    /// Sale date as stored.
    pub sale_date: String,
    /// `None` when the stored text did not parse.
    pub sale_day: Option<NaiveDate>,
    pub total_amount: Decimal,
    pub status: OrderStatus,
    pub item_count: i64,
}

impl From<&Order> for OrderSummary {
    fn from(order: &Order) -> Self {
        Self {
            id: order.id,
            customer_id: order.customer_id,
            customer_name: order.customer_name.clone(),
            representative_id: order.representative_id,
            sale_date: order.sale_date.raw().to_string(),
            sale_day: order.sale_date.date(),
            total_amount: order.total_amount,
            status: order.status,
            item_count: order.item_count,
        }
    }
}

/// The composite result handed to the presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalyticsReport {
    pub actor: Actor,
    pub period: PeriodWindows,
    pub today: NaiveDate,
    pub statistics: SalesStatistics,
    pub distributions: Distributions,
    pub trends: TrendSeries,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inventory: Option<InventorySummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub calendar: Option<Vec<CalendarDay>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upcoming_events: Option<Vec<CalendarEvent>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub orders: Option<PaginatedResponse<OrderSummary>>,
}

// ==================== Statistics ====================

fn order_totals(filter: PeriodFilter) -> RollupSpec {
    RollupSpec::by(&[])
        .metric(SALES)
        .metric(ORDERS)
        .metric(CUSTOMERS)
        .period(filter)
}

pub fn status_breakdown(orders: &[Order]) -> StatusBreakdown {
    RollupSpec::by(&[Dimension::Status])
        .metric(STATUS_COUNT)
        .run(orders)
        .into_iter()
        .fold(StatusBreakdown::default(), |mut breakdown, row| {
            let count = row.integer(STATUS_COUNT.name);
            match row.key.parse::<OrderStatus>() {
                Ok(OrderStatus::Pending) => breakdown.pending += count,
                Ok(OrderStatus::Completed) => breakdown.completed += count,
                Ok(OrderStatus::Cancelled) => breakdown.cancelled += count,
                Err(_) => {}
            }
            breakdown
        })
}

/// Headline figures. `sold` and `sold_lines` exclude cancelled orders,
/// `all_orders` does not.
pub fn statistics(
    windows: &PeriodWindows,
    all_orders: &[Order],
    sold: &[&Order],
    sold_lines: &[&SaleLine],
    customers: &[CustomerRecord],
) -> SalesStatistics {
    let all_time = order_totals(PeriodFilter::AllTime).totals(sold.iter().copied());
    let month = order_totals(PeriodFilter::Window(windows.month_window)).totals(sold.iter().copied());
    let previous = order_totals(PeriodFilter::Window(windows.previous_month_window))
        .totals(sold.iter().copied());
    let year = order_totals(PeriodFilter::YearMention(windows.year)).totals(sold.iter().copied());
    let units = RollupSpec::by(&[])
        .metric(UNITS)
        .period(PeriodFilter::Window(windows.month_window))
        .totals(sold_lines.iter().copied());

    let monthly_sales = month.decimal(SALES.name);
    let monthly_orders = month.integer(ORDERS.name);
    let previous_month_sales = previous.decimal(SALES.name);

    let average_order_value = if monthly_orders > 0 {
        (monthly_sales / Decimal::from(monthly_orders)).round_dp(2)
    } else {
        Decimal::ZERO
    };

    SalesStatistics {
        total_sales: all_time.decimal(SALES.name),
        total_orders: all_orders.len() as i64,
        monthly_sales,
        monthly_orders,
        previous_month_sales,
        monthly_growth: growth_rate(previous_month_sales, monthly_sales),
        yearly_sales: year.decimal(SALES.name),
        units_sold: units.integer(UNITS.name),
        average_order_value,
        total_customers: customers.len() as i64,
        active_customers: month.integer(CUSTOMERS.name),
        status_breakdown: status_breakdown(all_orders),
    }
}

// ==================== Distributions ====================

pub fn category_distribution(lines: &[&SaleLine], windows: &PeriodWindows) -> Vec<RollupRow> {
    RollupSpec::by(&[Dimension::ProductCategory])
        .metric(LINE_SALES)
        .metric(UNITS)
        .metric(ORDERS)
        .metric(PRODUCTS)
        .order_by(LINE_SALES.name)
        .period(PeriodFilter::Window(windows.month_window))
        .run(lines.iter().copied())
}

pub fn top_products(lines: &[&SaleLine], windows: &PeriodWindows, limit: usize) -> Vec<RollupRow> {
    RollupSpec::by(&[Dimension::Product])
        .metric(UNITS)
        .metric(LINE_SALES)
        .metric(FREE_UNITS)
        .metric(DISCOUNTS)
        .metric(CUSTOMERS)
        .order_by(UNITS.name)
        .period(PeriodFilter::Window(windows.month_window))
        .limit(limit)
        .run(lines.iter().copied())
}

/// Sales per region, representative or customer for the month.
pub fn owner_distribution(
    lines: &[&SaleLine],
    windows: &PeriodWindows,
    dimension: Dimension,
) -> Vec<RollupRow> {
    let month = PeriodFilter::Window(windows.month_window);
    rollup(
        lines.iter().copied().filter(|line| month.admits(&line.sale_date)),
        &[dimension],
        &[LINE_SALES, ORDERS, CUSTOMERS, UNITS],
        LINE_SALES.name,
    )
}

// ==================== Trends ====================

pub fn trends(period: Period, sold: &[&Order], sold_lines: &[&SaleLine]) -> TrendSeries {
    let monthly_sales: Vec<Decimal> = monthly_series(sold.iter().copied(), period, SALES)
        .into_iter()
        .map(Decimal::from)
        .collect();
    let monthly_orders: Vec<i64> = monthly_series(sold.iter().copied(), period, ORDERS)
        .iter()
        .map(|value| value.as_integer().unwrap_or(0))
        .collect();
    let monthly_units: Vec<i64> = monthly_series(sold_lines.iter().copied(), period, UNITS)
        .iter()
        .map(|value| value.as_integer().unwrap_or(0))
        .collect();

    TrendSeries {
        year: period.year(),
        sales_change: monthly_trend(&monthly_sales),
        orders_change: monthly_trend(&monthly_orders),
        units_change: monthly_trend(&monthly_units),
        monthly_sales,
        monthly_orders,
        monthly_units,
    }
}

// ==================== Inventory ====================

pub fn inventory(products: &[ProductRecord], low_stock_threshold: i32) -> InventorySummary {
    let mut low_stock: Vec<LowStockProduct> = products
        .iter()
        .filter(|p| p.inventory <= low_stock_threshold)
        .map(|p| LowStockProduct {
            id: p.id,
            brand_name: p.brand_name.clone(),
            generic_name: p.generic_name.clone(),
            category: p.category.clone(),
            inventory: p.inventory,
            price: p.price,
        })
        .collect();
    low_stock.sort_by_key(|p| p.inventory);

    InventorySummary {
        total_products: products.len() as i64,
        total_units: products.iter().map(|p| i64::from(p.inventory.max(0))).sum(),
        stock_value: products.iter().fold(Decimal::ZERO, |value, p| {
            value.saturating_add(p.price.saturating_mul(Decimal::from(p.inventory.max(0))))
        }),
        low_stock_threshold,
        low_stock,
    }
}

// ==================== Orders ====================

/// Newest sale date first; orders whose date did not parse go last in input order.
pub fn order_listing(orders: &[Order], params: &PaginationParams) -> PaginatedResponse<OrderSummary> {
    let mut sorted: Vec<&Order> = orders.iter().collect();
    sorted.sort_by(|a, b| match (a.sale_date.date(), b.sale_date.date()) {
        (Some(x), Some(y)) => y.cmp(&x),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => std::cmp::Ordering::Equal,
    });

    PaginatedResponse::from_items(sorted.into_iter().map(OrderSummary::from).collect(), params)
}
