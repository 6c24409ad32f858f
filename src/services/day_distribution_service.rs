//! Day Distribution Scheduler
//!
//! Spreads a flat activity list over a trip's dates. Activities are ranked by
//! priority then clock time, dealt out so that day loads differ by at most one
//! (the first `total % days` days take the extra activity), and finally
//! re-sorted by time within each day to assign the 1-based `order`.

use std::collections::BTreeMap;

use chrono::{NaiveDate, NaiveTime};
use log::debug;
use uuid::Uuid;

use crate::models::activity::{Category, GeneratedActivity, Priority, ScheduledItem};
use crate::models::trip::DateRange;

const PLACEHOLDER_TITLE: &str = "Free exploration";
const PLACEHOLDER_DESCRIPTION: &str = "Unplanned time to wander and discover the area at your own pace.";
const PLACEHOLDER_HOUR: u32 = 10;

pub type DaySchedule = BTreeMap<NaiveDate, Vec<ScheduledItem>>;

pub struct DayDistributionScheduler {
    placeholder_location: String,
}

impl DayDistributionScheduler {
    /// `placeholder_location` is used for the filler activity on otherwise empty days.
    pub fn new(placeholder_location: impl Into<String>) -> Self {
        Self {
            placeholder_location: placeholder_location.into(),
        }
    }

    pub fn distribute(&self, activities: Vec<GeneratedActivity>, date_range: &DateRange) -> DaySchedule {
        let mut schedule = DaySchedule::new();
        if date_range.is_empty() {
            debug!(
                "Empty date range, {} activities left unscheduled",
                activities.len()
            );
            return schedule;
        }

        let mut ranked = activities;
        ranked.sort_by(|a, b| {
            a.priority
                .rank()
                .cmp(&b.priority.rank())
                .then_with(|| a.time.cmp(&b.time))
        });

        let days = date_range.len();
        let base = ranked.len() / days;
        let extra = ranked.len() % days;

        let mut remaining = ranked.into_iter();
        for (day_index, date) in date_range.dates().iter().enumerate() {
            let count = base + usize::from(day_index < extra);
            let mut day_activities: Vec<GeneratedActivity> = remaining.by_ref().take(count).collect();

            if day_activities.is_empty() {
                day_activities.push(self.placeholder());
            }

            day_activities.sort_by(|a, b| a.time.cmp(&b.time));

            let items = day_activities
                .into_iter()
                .enumerate()
                .map(|(i, activity)| ScheduledItem::new(*date, i as u32 + 1, activity))
                .collect();
            schedule.insert(*date, items);
        }

        schedule
    }

    fn placeholder(&self) -> GeneratedActivity {
        GeneratedActivity {
            id: Uuid::new_v4().to_string(),
            title: PLACEHOLDER_TITLE.to_string(),
            description: PLACEHOLDER_DESCRIPTION.to_string(),
            time: NaiveTime::from_hms_opt(PLACEHOLDER_HOUR, 0, 0).unwrap_or(NaiveTime::MIN),
            location: self.placeholder_location.clone(),
            category: Category::Activity,
            priority: Priority::Low,
        }
    }
}
