use std::time::Duration;

use chrono::{NaiveDate, Utc};
use sqlx::SqlitePool;
use tracing::{debug, info, warn};

use crate::db::courses;
use crate::error::AppError;
use crate::models::{CourseQuery, CourseStatus};

/// Keeps each course's status in line with its dates as days pass.
pub struct StatusScheduler {
    db: SqlitePool,
    interval: Duration,
}

impl StatusScheduler {
    pub fn new(db: SqlitePool, interval_secs: u64) -> Self {
        Self {
            db,
            interval: Duration::from_secs(interval_secs.max(1)),
        }
    }

    /// Runs forever; a failed pass is logged and retried on the next tick.
    pub async fn start(self) {
        info!("Starting course status scheduler (interval: {:?})", self.interval);

        let mut ticker = tokio::time::interval(self.interval);
        loop {
            // first tick fires immediately so statuses are fresh at startup
            ticker.tick().await;

            match refresh_course_statuses(&self.db, Utc::now().date_naive()).await {
                Ok(0) => debug!("course statuses already current"),
                Ok(changed) => info!("updated status of {} course(s)", changed),
                Err(e) => warn!("course status refresh failed: {:?}", e),
            }
        }
    }
}

/// Recomputes every course's status for `today` and returns how many changed.
pub async fn refresh_course_statuses(db: &SqlitePool, today: NaiveDate) -> Result<usize, AppError> {
    let mut tx = db.begin().await?;
    let all = courses::list_courses(&mut *tx, &CourseQuery::default()).await?;

    let mut changed = 0;
    for course in all {
        let status = CourseStatus::for_dates(course.start_date, course.end_date, today);
        if status != course.status && courses::set_status(&mut *tx, &course.id, status).await? {
            changed += 1;
        }
    }
    tx.commit().await?;

    Ok(changed)
}
