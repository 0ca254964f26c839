//! Projects scheduled events onto a month grid.

use chrono::{Datelike, Days, NaiveDate, NaiveTime, Weekday};
use serde::Serialize;
use uuid::Uuid;

use fieldrep_shared::EventRow;

use super::period::{DateWindow, Period};

/// An event as it appears on one calendar day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalendarEvent {
    pub id: Uuid,
    pub title: String,
    pub event_type: String,
    pub status: String,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
    pub customer_id: Option<Uuid>,
    pub customer_name: Option<String>,
    pub is_first_day: bool,
    pub is_last_day: bool,
    pub is_multi_day: bool,
}

impl CalendarEvent {
    fn on_day(event: &EventRow, day: NaiveDate) -> Self {
        Self {
            id: event.id,
            title: event.title.clone(),
            event_type: event.event_type.clone(),
            status: event.status.clone(),
            start_date: event.start_date,
            end_date: event.end_date,
            start_time: event.start_time,
            end_time: event.end_time,
            customer_id: event.customer_id,
            customer_name: event.customer_name.clone(),
            is_first_day: day == event.start_date,
            is_last_day: day == event.effective_end(),
            is_multi_day: event.is_multi_day(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalendarDay {
    pub date: NaiveDate,
    pub day: u32,
    pub is_current_month: bool,
    pub is_today: bool,
    pub events: Vec<CalendarEvent>,
}

/// Month grid padded to whole weeks.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalendarMonth {
    pub year: i32,
    pub month: u32,
    pub week_start: Weekday,
    pub weeks: Vec<Vec<CalendarDay>>,
}

/// Orders events by start date, then start time. Untimed events lead their day.
pub fn sort_events(events: &mut [EventRow]) {
    events.sort_by(|a, b| (a.start_date, a.start_time).cmp(&(b.start_date, b.start_time)));
}

/// One entry per day of `period`, each listing the events whose date span covers it.
///
/// Events are sorted before projection, so the order within a day follows
/// start date and start time whatever the input order was.
pub fn project_month(period: Period, events: &[EventRow], today: NaiveDate) -> Vec<CalendarDay> {
    project_window(period, period.month_window(), events, today)
}

/// Same projection as [`project_month`], widened with adjacent-month days so
/// that the grid starts on `week_start` and ends on the day before it.
pub fn project_weeks(
    period: Period,
    events: &[EventRow],
    today: NaiveDate,
    week_start: Weekday,
) -> CalendarMonth {
    let days = project_window(period, grid_window(period, week_start), events, today);

    CalendarMonth {
        year: period.year(),
        month: period.month(),
        week_start,
        weeks: days.chunks(7).map(<[CalendarDay]>::to_vec).collect(),
    }
}

/// The padded window covered by [`project_weeks`].
pub fn grid_window(period: Period, week_start: Weekday) -> DateWindow {
    let first = period.first_day();
    let last = period.last_day();
    let lead = days_after(first.weekday(), week_start);
    let trail = 6 - days_after(last.weekday(), week_start);
    DateWindow::new(first - Days::new(lead), last + Days::new(trail))
}

/// Events still open on or after `today`, soonest first.
pub fn upcoming_events(events: &[EventRow], today: NaiveDate, limit: usize) -> Vec<CalendarEvent> {
    let mut pending: Vec<EventRow> = events
        .iter()
        .filter(|event| event.effective_end() >= today)
        .cloned()
        .collect();
    sort_events(&mut pending);

    pending
        .iter()
        .take(limit)
        .map(|event| CalendarEvent::on_day(event, event.start_date.max(today)))
        .collect()
}

fn project_window(
    period: Period,
    window: DateWindow,
    events: &[EventRow],
    today: NaiveDate,
) -> Vec<CalendarDay> {
    let mut sorted = events.to_vec();
    sort_events(&mut sorted);

    let visible: Vec<&EventRow> = sorted
        .iter()
        .filter(|event| window.overlaps(event.start_date, event.effective_end()))
        .collect();

    window
        .days()
        .map(|date| CalendarDay {
            date,
            day: date.day(),
            is_current_month: date.year() == period.year() && date.month() == period.month(),
            is_today: date == today,
            events: visible
                .iter()
                .filter(|event| event.start_date <= date && date <= event.effective_end())
                .map(|event| CalendarEvent::on_day(event, date))
                .collect(),
        })
        .collect()
}

fn days_after(day: Weekday, week_start: Weekday) -> u64 {
    u64::from((day.num_days_from_monday() + 7 - week_start.num_days_from_monday()) % 7)
}
