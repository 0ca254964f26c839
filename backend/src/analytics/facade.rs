use chrono::{Days, NaiveDate};
use std::sync::Arc;

use super::calendar::{grid_window, project_month, project_weeks, upcoming_events, CalendarMonth};
use super::period::{resolve, DateWindow, Period, PeriodError, PeriodWindows};
use super::records::{Order, SaleLine};
use super::report::{self, Actor, AnalyticsReport, Distributions};
use super::rollup::Dimension;
use super::AnalyticsError;
use crate::config::AnalyticsConfig;
use crate::pagination::PaginationParams;
use crate::store::{OwnerScope, SalesStore};

impl Actor {
    pub fn scope(&self) -> OwnerScope {
        match self {
            Self::Administrator => OwnerScope::All,
            Self::Customer(id) => OwnerScope::Customer(*id),
            Self::Representative(id) | Self::Mobile(id) => OwnerScope::Representative(*id),
        }
    }

    fn sections(&self, config: &AnalyticsConfig) -> Sections {
        let base = Sections {
            top_products: config.top_products,
            by_region: false,
            by_representative: false,
            by_customer: false,
            inventory: false,
            calendar: false,
            orders: true,
        };
        match self {
            Self::Administrator => Sections {
                by_region: true,
                by_representative: true,
                inventory: true,
                ..base
            },
            Self::Customer(_) => base,
            Self::Representative(_) => Sections {
                by_region: true,
                by_customer: true,
                calendar: true,
                ..base
            },
            Self::Mobile(_) => Sections {
                top_products: config.mobile_top_products,
                calendar: true,
                orders: false,
                ..base
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Sections {
    top_products: usize,
    by_region: bool,
    by_representative: bool,
    by_customer: bool,
    inventory: bool,
    calendar: bool,
    orders: bool,
}

/// Parameters of one report request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportRequest {
    pub year: Option<i64>,
    pub month: Option<i64>,
    /// The caller's current date; drives defaults and `is_today`.
    pub today: NaiveDate,
    pub pagination: PaginationParams,
}

impl ReportRequest {
    pub fn for_today(today: NaiveDate) -> Self {
        Self {
            year: None,
            month: None,
            today,
            pagination: PaginationParams::default(),
        }
    }

    pub fn with_period(mut self, year: i64, month: i64) -> Self {
        self.year = Some(year);
        self.month = Some(month);
        self
    }

    /// Omitted parts default to the month containing `today`.
    pub fn windows(&self) -> Result<PeriodWindows, PeriodError> {
        let current = Period::containing(self.today);
        resolve(
            self.year.unwrap_or_else(|| i64::from(current.year())),
            self.month.unwrap_or_else(|| i64::from(current.month())),
        )
    }

    pub fn period(&self) -> Result<Period, PeriodError> {
        self.windows().map(|windows| windows.period())
    }
}

/// Builds analytics reports for every actor over one store.
#[derive(Clone)]
pub struct AnalyticsFacade {
    store: Arc<dyn SalesStore>,
    config: AnalyticsConfig,
}

impl AnalyticsFacade {
    pub fn new(store: Arc<dyn SalesStore>, config: AnalyticsConfig) -> Self {
        Self { store, config }
    }

    pub async fn report(
        &self,
        actor: Actor,
        request: &ReportRequest,
    ) -> Result<AnalyticsReport, AnalyticsError> {
        let windows = request.windows()?;
        let period = windows.period();
        let scope = actor.scope();
        let sections = actor.sections(&self.config);

        tracing::info!(
            actor = ?actor,
            year = windows.year,
            month = windows.month,
            "building analytics report"
        );

        let products = async {
            if sections.inventory {
                self.store.products().await
            } else {
                Ok(Vec::new())
            }
        };
        let events = async {
            if sections.calendar {
                self.store.events(scope, self.event_window(period, request.today)).await
            } else {
                Ok(Vec::new())
            }
        };
        let (order_rows, line_rows, customers, products, events) = futures::try_join!(
            self.store.orders(scope),
            self.store.sale_lines(scope),
            self.store.customers(scope),
            products,
            events,
        )?;

        let orders: Vec<Order> = order_rows.into_iter().map(Order::from).collect();
        let lines: Vec<SaleLine> = line_rows.into_iter().map(SaleLine::from).collect();
        let sold: Vec<&Order> = orders.iter().filter(|o| o.status.counts_as_sale()).collect();
        let sold_lines: Vec<&SaleLine> = lines.iter().filter(|l| l.status.counts_as_sale()).collect();

        tracing::debug!(
            orders = orders.len(),
            lines = lines.len(),
            customers = customers.len(),
            events = events.len(),
            "records loaded"
        );

        let distributions = Distributions {
            by_category: report::category_distribution(&sold_lines, &windows),
            top_products: report::top_products(&sold_lines, &windows, sections.top_products),
            by_region: sections
                .by_region
                .then(|| report::owner_distribution(&sold_lines, &windows, Dimension::Region)),
            by_representative: sections.by_representative.then(|| {
                report::owner_distribution(&sold_lines, &windows, Dimension::Representative)
            }),
            by_customer: sections
                .by_customer
                .then(|| report::owner_distribution(&sold_lines, &windows, Dimension::Customer)),
        };

        Ok(AnalyticsReport {
            actor,
            period: windows,
            today: request.today,
            statistics: report::statistics(&windows, &orders, &sold, &sold_lines, &customers),
            distributions,
            trends: report::trends(period, &sold, &sold_lines),
            inventory: sections
                .inventory
                .then(|| report::inventory(&products, self.config.low_stock_threshold)),
            calendar: sections
                .calendar
                .then(|| project_month(period, &events, request.today)),
            upcoming_events: sections
                .calendar
                .then(|| upcoming_events(&events, request.today, self.config.upcoming_events)),
            orders: sections.orders.then(|| {
                let params = request.pagination.clone().or_per_page(self.config.page_size);
                report::order_listing(&orders, &params)
            }),
        })
    }

    /// The actor's events on a month grid padded to whole weeks.
    pub async fn calendar(
        &self,
        actor: Actor,
        request: &ReportRequest,
    ) -> Result<CalendarMonth, AnalyticsError> {
        let period = request.period()?;
        let week_start = self.config.week_start;
        let events = self
            .store
            .events(actor.scope(), grid_window(period, week_start))
            .await?;

        tracing::debug!(actor = ?actor, events = events.len(), "projecting calendar");
        Ok(project_weeks(period, &events, request.today, week_start))
    }

    /// The month plus the upcoming-events horizon after `today`.
    fn event_window(&self, period: Period, today: NaiveDate) -> DateWindow {
        let month = period.month_window();
        let horizon = today
            .checked_add_days(Days::new(self.config.upcoming_horizon_days))
            .unwrap_or(today);
        DateWindow::new(month.start.min(today), month.end.max(horizon))
    }
}
