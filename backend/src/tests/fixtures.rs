use chrono::{NaiveDate, NaiveTime};
use fake::faker::company::en::CompanyName;
use fake::faker::name::en::Name;
use fake::{Fake, Faker};
use rust_decimal::Decimal;
use uuid::Uuid;

use fieldrep_shared::{
    CustomerRecord, EventRecord, LineItemRecord, OrderRecord, ProductRecord, RepresentativeRecord,
};

use crate::store::MemoryStore;

// Builders for in-memory sales data

#[derive(Debug, Clone, Default)]
pub struct SalesFixture {
    pub store: MemoryStore,
}

impl SalesFixture {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn representative(&mut self, region: &str) -> Uuid {
        let id = Uuid::new_v4();
        self.store.representatives.push(RepresentativeRecord {
            id,
            name: Name().fake(),
            region: Some(region.to_string()),
        });
        id
    }

    pub fn customer(&mut self, representative_id: Option<Uuid>, region: Option<&str>) -> Uuid {
        let id = Uuid::new_v4();
        self.store.customers.push(CustomerRecord {
            id,
            name: CompanyName().fake(),
            region: region.map(str::to_string),
            representative_id,
        });
        id
    }

    pub fn product(&mut self, category: Option<&str>, price: i64, inventory: i32) -> Uuid {
        let id = Uuid::new_v4();
        self.store.products.push(ProductRecord {
            id,
            brand_name: format!("{} {}", Faker.fake::<String>(), (100..999).fake::<u32>()),
            generic_name: None,
            category: category.map(str::to_string),
            price: Decimal::from(price),
            inventory,
        });
        id
    }

    /// An order whose total is the sum of `price × quantity` over `lines`.
    pub fn order(
        &mut self,
        customer_id: Uuid,
        sale_date: &str,
        status: &str,
        lines: &[(Uuid, i32)],
    ) -> Uuid {
        let id = Uuid::new_v4();
        let representative_id = self
            .store
            .customers
            .iter()
            .find(|c| c.id == customer_id)
            .and_then(|c| c.representative_id);

        let mut total = Decimal::ZERO;
        for (product_id, quantity) in lines {
            let price = self
                .store
                .products
                .iter()
                .find(|p| p.id == *product_id)
                .map(|p| p.price)
                .unwrap_or(Decimal::ZERO);
            let line_total = price * Decimal::from(*quantity);
            total += line_total;

            self.store.line_items.push(LineItemRecord {
                id: Uuid::new_v4(),
                order_id: id,
                product_id: Some(*product_id),
                quantity: *quantity,
                line_total,
                promo: None,
                discount: None,
                free_quantity: None,
            });
        }

        self.store.orders.push(OrderRecord {
            id,
            customer_id: Some(customer_id),
            representative_id,
            sale_date: sale_date.to_string(),
            total_amount: total,
            status: status.to_string(),
        });
        id
    }

    pub fn event(
        &mut self,
        representative_id: Uuid,
        start_date: NaiveDate,
        end_date: Option<NaiveDate>,
        start_time: Option<NaiveTime>,
    ) -> Uuid {
        let id = Uuid::new_v4();
        self.store.events.push(EventRecord {
            id,
            title: format!("Visit {}", CompanyName().fake::<String>()),
            event_type: "visit".to_string(),
            start_date,
            end_date,
            start_time,
            end_time: None,
            status: "scheduled".to_string(),
            representative_id,
            customer_id: None,
        });
        id
    }
}

/// Two representatives, three customers and a spread of orders around June 2025.
///
/// June 2025 sales: 800 over three orders; a cancelled 5000 order is excluded.
/// May 2025 sales: 550. One 200 order from 2024 and one 30 order with an
/// unreadable date.
pub struct Scenario {
    pub store: MemoryStore,
    pub north_rep: Uuid,
    pub south_rep: Uuid,
    pub north_customer: Uuid,
    pub second_north_customer: Uuid,
    pub south_customer: Uuid,
    pub exclusive: Uuid,
    pub regulated: Uuid,
    pub uncategorized: Uuid,
}

pub fn june_2025() -> Scenario {
    let mut fx = SalesFixture::new();
    let north_rep = fx.representative("North");
    let south_rep = fx.representative("South");
    let north_customer = fx.customer(Some(north_rep), Some("North"));
    let second_north_customer = fx.customer(Some(north_rep), None);
    let south_customer = fx.customer(Some(south_rep), Some("South"));

    let exclusive = fx.product(Some("exclusive"), 100, 5);
    let regulated = fx.product(Some("regulated"), 50, 40);
    let uncategorized = fx.product(None, 10, 20);

    // June 2025
    fx.order(north_customer, "06/02/2025", "completed", &[(exclusive, 5), (regulated, 2)]);
    fx.order(second_north_customer, "06/18/2025", "pending", &[(uncategorized, 10)]);
    fx.order(south_customer, "06/20/2025", "completed", &[(regulated, 2)]);
    fx.order(south_customer, "06/25/2025", "cancelled", &[(exclusive, 50)]);
    // May 2025
    fx.order(north_customer, "05/30/2025", "completed", &[(exclusive, 5), (regulated, 1)]);
    // Earlier and unreadable
    fx.order(south_customer, "12/31/2024", "completed", &[(regulated, 4)]);
    fx.order(north_customer, "2025-06-10", "completed", &[(uncategorized, 3)]);

    fx.event(
        north_rep,
        NaiveDate::from_ymd_opt(2025, 6, 5).unwrap(),
        NaiveDate::from_ymd_opt(2025, 6, 7),
        None,
    );
    fx.event(
        north_rep,
        NaiveDate::from_ymd_opt(2025, 6, 6).unwrap(),
        None,
        NaiveTime::from_hms_opt(9, 30, 0),
    );
    fx.event(
        south_rep,
        NaiveDate::from_ymd_opt(2025, 6, 6).unwrap(),
        None,
        None,
    );

    Scenario {
        store: fx.store,
        north_rep,
        south_rep,
        north_customer,
        second_north_customer,
        south_customer,
        exclusive,
        regulated,
        uncategorized,
    }
}
