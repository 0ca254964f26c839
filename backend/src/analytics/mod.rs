//! Sales analytics engine.
//!
//! Records come in through [`crate::store::SalesStore`], are canonicalized in
//! [`records`], grouped by [`rollup`], compared month over month by [`trend`]
//! and laid out on a month grid by [`calendar`]. [`AnalyticsFacade`] composes
//! those into one report per actor.

pub mod calendar;
pub mod facade;
pub mod period;
pub mod records;
pub mod report;
pub mod rollup;
pub mod trend;

pub use facade::{AnalyticsFacade, ReportRequest};
pub use report::{Actor, AnalyticsReport};

use crate::store::StoreError;
use period::PeriodError;

#[derive(Debug, thiserror::Error)]
pub enum AnalyticsError {
    #[error(transparent)]
    Period(#[from] PeriodError),
    #[error(transparent)]
    Store(#[from] StoreError),
}
