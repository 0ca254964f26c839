// MemoryStore joins and ownership filtering

use crate::analytics::period::DateWindow;
use crate::store::{OwnerScope, SalesStore};
use crate::tests::fixtures::{june_2025, SalesFixture};
use crate::tests::helpers::date;

#[tokio::test]
async fn test_orders_join_customer_and_count_items() {
    let scenario = june_2025();
    let orders = scenario.store.orders(OwnerScope::All).await.unwrap();

    assert_eq!(orders.len(), 7);
    assert_eq!(orders[0].item_count, 2);
    assert_eq!(orders[0].region.as_deref(), Some("North"));
    assert!(orders[0].customer_name.is_some());
    assert_eq!(orders[1].region, None);
}

#[tokio::test]
async fn test_sale_lines_follow_order_scope() {
    let scenario = june_2025();
    let lines = scenario
        .store
        .sale_lines(OwnerScope::Representative(scenario.south_rep))
        .await
        .unwrap();

    assert_eq!(lines.len(), 3);
    assert!(lines.iter().all(|l| l.representative_id == Some(scenario.south_rep)));
    assert!(lines.iter().all(|l| l.representative_name.is_some()));
    assert_eq!(lines[0].category.as_deref(), Some("regulated"));
}

#[tokio::test]
async fn test_customers_visible_to_scope() {
    let scenario = june_2025();

    let all = scenario.store.customers(OwnerScope::All).await.unwrap();
    assert_eq!(all.len(), 3);

    let north = scenario
        .store
        .customers(OwnerScope::Representative(scenario.north_rep))
        .await
        .unwrap();
    assert_eq!(north.len(), 2);

    let own = scenario
        .store
        .customers(OwnerScope::Customer(scenario.south_customer))
        .await
        .unwrap();
    assert_eq!(own.len(), 1);
    assert_eq!(own[0].id, scenario.south_customer);
}

#[tokio::test]
async fn test_events_overlap_window() {
    let mut fx = SalesFixture::new();
    let rep = fx.representative("North");
    fx.event(rep, date(2025, 5, 30), Some(date(2025, 6, 2)), None);
    fx.event(rep, date(2025, 6, 30), None, None);
    fx.event(rep, date(2025, 7, 1), None, None);

    let june = DateWindow::new(date(2025, 6, 1), date(2025, 6, 30));
    let events = fx.store.events(OwnerScope::Representative(rep), june).await.unwrap();
    assert_eq!(events.len(), 2);

    let other = fx
        .store
        .events(OwnerScope::Representative(uuid::Uuid::new_v4()), june)
        .await
        .unwrap();
    assert!(other.is_empty());
}
