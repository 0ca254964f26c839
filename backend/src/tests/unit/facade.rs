// Report contents over the shared June 2025 scenario

use rust_decimal::Decimal;
use std::str::FromStr;

use crate::analytics::rollup::UNKNOWN_KEY;
use crate::analytics::Actor;
use crate::pagination::PaginationParams;
use crate::tests::fixtures::june_2025;
use crate::tests::helpers::{date, facade, june_request};

fn dec(value: &str) -> Decimal {
    Decimal::from_str(value).unwrap()
}

#[tokio::test]
async fn test_admin_statistics() {
    let scenario = june_2025();
    let report = facade(scenario.store)
        .report(Actor::Administrator, &june_request())
        .await
        .unwrap();
    let stats = &report.statistics;

    assert_eq!(stats.monthly_sales, dec("800"));
    assert_eq!(stats.monthly_orders, 3);
    assert_eq!(stats.previous_month_sales, dec("550"));
    assert_eq!(stats.monthly_growth, dec("45.5"));
    assert_eq!(stats.total_sales, dec("1580"));
    assert_eq!(stats.yearly_sales, dec("1380"));
    assert_eq!(stats.units_sold, 19);
    assert_eq!(stats.average_order_value, dec("266.67"));
    assert_eq!(stats.total_orders, 7);
    assert_eq!(stats.total_customers, 3);
    assert_eq!(stats.active_customers, 3);
    assert_eq!(stats.status_breakdown.completed, 5);
    assert_eq!(stats.status_breakdown.pending, 1);
    assert_eq!(stats.status_breakdown.cancelled, 1);
}

#[tokio::test]
async fn test_admin_distributions() {
    let scenario = june_2025();
    let report = facade(scenario.store)
        .report(Actor::Administrator, &june_request())
        .await
        .unwrap();
    let dist = &report.distributions;

    let categories: Vec<&str> = dist.by_category.iter().map(|r| r.key.as_str()).collect();
    assert_eq!(categories, vec!["exclusive", "regulated", UNKNOWN_KEY]);
    assert_eq!(dist.by_category[0].decimal("total_sales"), dec("500"));
    assert_eq!(dist.by_category[1].integer("quantity"), 4);

    let top: Vec<String> = dist.top_products.iter().map(|r| r.key.clone()).collect();
    assert_eq!(
        top,
        vec![
            scenario.uncategorized.to_string(),
            scenario.exclusive.to_string(),
            scenario.regulated.to_string(),
        ]
    );

    let regions: Vec<&str> = dist
        .by_region
        .as_ref()
        .unwrap()
        .iter()
        .map(|r| r.key.as_str())
        .collect();
    assert_eq!(regions, vec!["north", UNKNOWN_KEY, "south"]);

    let reps = dist.by_representative.as_ref().unwrap();
    assert_eq!(reps[0].key, scenario.north_rep.to_string());
    assert_eq!(reps[0].decimal("total_sales"), dec("700"));
    assert_eq!(reps[0].integer("customers"), 2);
    assert!(dist.by_customer.is_none());
}

#[tokio::test]
async fn test_admin_trends_and_inventory() {
    let scenario = june_2025();
    let report = facade(scenario.store)
        .report(Actor::Administrator, &june_request())
        .await
        .unwrap();

    assert_eq!(report.trends.year, 2025);
    assert_eq!(report.trends.monthly_sales[4], dec("550"));
    assert_eq!(report.trends.monthly_sales[5], dec("800"));
    assert_eq!(report.trends.sales_change[4], "+100%");
    assert_eq!(report.trends.sales_change[5], "+45.5%");
    assert_eq!(report.trends.sales_change[6], "-100%");
    assert_eq!(report.trends.sales_change[0], "0%");
    assert_eq!(report.trends.monthly_orders[5], 3);

    let inventory = report.inventory.unwrap();
    assert_eq!(inventory.total_products, 3);
    assert_eq!(inventory.total_units, 65);
    assert_eq!(inventory.stock_value, dec("2700"));
    let low: Vec<i32> = inventory.low_stock.iter().map(|p| p.inventory).collect();
    assert_eq!(low, vec![5, 20]);
}

#[tokio::test]
async fn test_admin_order_listing_pages() {
    let scenario = june_2025();
    let mut request = june_request();
    request.pagination = PaginationParams::new(1, 3);

    let report = facade(scenario.store)
        .report(Actor::Administrator, &request)
        .await
        .unwrap();
    let orders = report.orders.unwrap();

    assert_eq!(orders.meta.total, 7);
    assert_eq!(orders.meta.total_pages, 3);
    let dates: Vec<&str> = orders.data.iter().map(|o| o.sale_date.as_str()).collect();
    assert_eq!(dates, vec!["06/25/2025", "06/20/2025", "06/18/2025"]);

    request.pagination = PaginationParams::new(3, 3);
    let last = facade(june_2025().store)
        .report(Actor::Administrator, &request)
        .await
        .unwrap()
        .orders
        .unwrap();
    assert_eq!(last.data.len(), 1);
    assert_eq!(last.data[0].sale_date, "2025-06-10");
    assert!(last.data[0].sale_day.is_none());
}

#[tokio::test]
async fn test_customer_view_is_scoped() {
    let scenario = june_2025();
    let report = facade(scenario.store)
        .report(Actor::Customer(scenario.south_customer), &june_request())
        .await
        .unwrap();

    assert_eq!(report.statistics.monthly_sales, dec("100"));
    assert_eq!(report.statistics.total_orders, 3);
    assert_eq!(report.statistics.total_sales, dec("300"));
    assert_eq!(report.statistics.total_customers, 1);
    assert_eq!(report.statistics.status_breakdown.cancelled, 1);
    assert!(report.inventory.is_none());
    assert!(report.calendar.is_none());
    assert_eq!(report.orders.map(|o| o.meta.total), Some(3));
}

#[tokio::test]
async fn test_representative_view_with_calendar() {
    let scenario = june_2025();
    let report = facade(scenario.store)
        .report(Actor::Representative(scenario.north_rep), &june_request())
        .await
        .unwrap();

    assert_eq!(report.statistics.monthly_sales, dec("700"));
    assert_eq!(report.statistics.total_customers, 2);

    let customers = report.distributions.by_customer.unwrap();
    assert_eq!(customers[0].key, scenario.north_customer.to_string());
    assert_eq!(customers[1].key, scenario.second_north_customer.to_string());

    let calendar = report.calendar.unwrap();
    assert_eq!(calendar.len(), 30);
    assert!(calendar[14].is_today);
    let sixth = &calendar[5];
    assert_eq!(sixth.events.len(), 2);
    assert!(sixth.events[0].is_multi_day);
    assert!(!sixth.events[0].is_first_day && !sixth.events[0].is_last_day);
    assert!(sixth.events[1].is_first_day && sixth.events[1].is_last_day);

    // both events ended before the 15th
    assert_eq!(report.upcoming_events, Some(Vec::new()));
}

#[tokio::test]
async fn test_mobile_view_upcoming_events() {
    let scenario = june_2025();
    let mut request = june_request();
    request.today = date(2025, 6, 6);

    let report = facade(scenario.store)
        .report(Actor::Mobile(scenario.north_rep), &request)
        .await
        .unwrap();

    let upcoming = report.upcoming_events.unwrap();
    assert_eq!(upcoming.len(), 2);
    assert!(upcoming[0].is_multi_day);
    assert!(report.orders.is_none());
    assert!(report.distributions.by_region.is_none());
    assert!(report.distributions.top_products.len() <= 5);
}

#[tokio::test]
async fn test_defaults_to_month_of_today() {
    let scenario = june_2025();
    let request = crate::analytics::ReportRequest::for_today(date(2025, 5, 20));

    let report = facade(scenario.store)
        .report(Actor::Administrator, &request)
        .await
        .unwrap();

    assert_eq!(report.period.month, 5);
    assert_eq!(report.statistics.monthly_sales, dec("550"));
    assert_eq!(report.statistics.monthly_growth, Decimal::ZERO);
}

#[tokio::test]
async fn test_padded_calendar_for_representative() {
    let scenario = june_2025();
    let month = facade(scenario.store)
        .calendar(Actor::Representative(scenario.north_rep), &june_request())
        .await
        .unwrap();

    // June 1st 2025 is a Sunday
    assert_eq!(month.weeks.len(), 5);
    assert!(month.weeks.iter().all(|week| week.len() == 7));
    let last = month.weeks.last().unwrap().last().unwrap();
    assert_eq!(last.date, date(2025, 7, 5));
    assert!(!last.is_current_month);
}
