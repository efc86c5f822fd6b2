use std::collections::HashMap;

use chrono::NaiveDate;

use crate::db::models::ClassReview;

/// Reports indexed by `"{schedule_id}-{date}"`.
#[derive(Debug, Clone, Default)]
pub struct ReportLookup {
    by_key: HashMap<String, ClassReview>,
}

impl ReportLookup {
    pub fn key(schedule_id: &str, date: NaiveDate) -> String {
        format!("{}-{}", schedule_id, date.format("%Y-%m-%d"))
    }

    /// Later reviews for the same key replace earlier ones.
    pub fn from_reviews<I>(reviews: I) -> Self
    where
        I: IntoIterator<Item = ClassReview>,
    {
        let by_key = reviews
            .into_iter()
            .map(|review| (Self::key(&review.schedule_id, review.date), review))
            .collect();
        Self { by_key }
    }

    pub fn get(&self, schedule_id: &str, date: NaiveDate) -> Option<&ClassReview> {
        self.by_key.get(&Self::key(schedule_id, date))
    }

    pub fn len(&self) -> usize {
        self.by_key.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_key.is_empty()
    }
}
