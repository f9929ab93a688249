use std::collections::HashMap;

use chrono::NaiveDate;
use sqlx::PgPool;

use crate::dto::admin_dto::{
    ApplicationStats, DashboardStatsResponse, FeedbackStats, JobStats, PublicStatsResponse,
    TrendPoint, Trends, UserStats,
};
use crate::error::Result;
use crate::utils::time::{month_day_label, start_of_day, today, trailing_days};

pub const TREND_DAYS: u32 = 7;

/// One point per day in `days`; days with no rows count as zero.
pub fn fill_daily_counts(days: &[NaiveDate], rows: &[(NaiveDate, i64)]) -> Vec<TrendPoint> {
    let counts: HashMap<NaiveDate, i64> = rows.iter().copied().collect();
    days.iter()
        .map(|day| TrendPoint {
            date: month_day_label(*day),
            count: counts.get(day).copied().unwrap_or(0),
        })
        .collect()
}

#[derive(Clone)]
pub struct StatsService {
    pool: PgPool,
}

impl StatsService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn dashboard(&self) -> Result<DashboardStatsResponse> {
        let today = today();
        let today_start = start_of_day(today);

        let (total, students, enterprises, admins, users_today) =
            sqlx::query_as::<_, (i64, i64, i64, i64, i64)>(
                r#"
                SELECT
                    COUNT(*),
                    COUNT(*) FILTER (WHERE user_type = 'student'),
                    COUNT(*) FILTER (WHERE user_type = 'enterprise'),
                    COUNT(*) FILTER (WHERE user_type = 'admin'),
                    COUNT(*) FILTER (WHERE created_at >= $1)
                FROM users
                "#,
            )
            .bind(today_start)
            .fetch_one(&self.pool)
            .await?;

        let (jobs_total, jobs_active, jobs_draft) = sqlx::query_as::<_, (i64, i64, i64)>(
            r#"
            SELECT
                COUNT(*),
                COUNT(*) FILTER (WHERE status = 'published'),
                COUNT(*) FILTER (WHERE status = 'draft')
            FROM jobs
            "#,
        )
        .fetch_one(&self.pool)
        .await?;

        let (apps_total, apps_pending, apps_accepted, apps_today) =
            sqlx::query_as::<_, (i64, i64, i64, i64)>(
                r#"
                SELECT
                    COUNT(*),
                    COUNT(*) FILTER (WHERE status = 'pending'),
                    COUNT(*) FILTER (WHERE status = 'accepted'),
                    COUNT(*) FILTER (WHERE applied_at >= $1)
                FROM job_applications
                "#,
            )
            .bind(today_start)
            .fetch_one(&self.pool)
            .await?;

        let (feedback_total, feedback_pending, feedback_today) =
            sqlx::query_as::<_, (i64, i64, i64)>(
                r#"
                SELECT
                    COUNT(*),
                    COUNT(*) FILTER (WHERE status = 'pending'),
                    COUNT(*) FILTER (WHERE created_at >= $1)
                FROM feedbacks
                "#,
            )
            .bind(today_start)
            .fetch_one(&self.pool)
            .await?;

        let days = trailing_days(today, TREND_DAYS);
        let window_start = start_of_day(days[0]);
        let rows = sqlx::query_as::<_, (NaiveDate, i64)>(
            r#"
            SELECT (created_at AT TIME ZONE 'UTC')::date AS day, COUNT(*)
            FROM users
            WHERE created_at >= $1
            GROUP BY day
            "#,
        )
        .bind(window_start)
        .fetch_all(&self.pool)
        .await?;

        Ok(DashboardStatsResponse {
            user_stats: UserStats {
                total,
                students,
                enterprises,
                admins,
                today_new: users_today,
            },
            job_stats: JobStats {
                total: jobs_total,
                active: jobs_active,
                draft: jobs_draft,
            },
            application_stats: ApplicationStats {
                total: apps_total,
                pending: apps_pending,
                accepted: apps_accepted,
                today_new: apps_today,
            },
            feedback_stats: FeedbackStats {
                total: feedback_total,
                pending: feedback_pending,
                today_new: feedback_today,
            },
            trends: Trends {
                daily_registrations: fill_daily_counts(&days, &rows),
            },
        })
    }

    pub async fn public(&self) -> Result<PublicStatsResponse> {
        let (total_users, total_jobs, total_applications, successful_placements) =
            sqlx::query_as::<_, (i64, i64, i64, i64)>(
                r#"
                SELECT
                    (SELECT COUNT(*) FROM users),
                    (SELECT COUNT(*) FROM jobs WHERE status = 'published'),
                    (SELECT COUNT(*) FROM job_applications),
                    (SELECT COUNT(*) FROM job_applications WHERE status = 'accepted')
                "#,
            )
            .fetch_one(&self.pool)
            .await?;

        Ok(PublicStatsResponse {
            total_users,
            total_jobs,
            total_applications,
            successful_placements,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, d).unwrap()
    }

    #[test]
    fn missing_days_are_zero_filled() {
        let days = trailing_days(day(7), TREND_DAYS);
        let rows = vec![(day(2), 3), (day(7), 1)];
        let points = fill_daily_counts(&days, &rows);

        assert_eq!(points.len(), 7);
        assert_eq!(points[0].date, "03-01");
        assert_eq!(points[6].date, "03-07");
        let counts: Vec<i64> = points.iter().map(|p| p.count).collect();
        assert_eq!(counts, vec![0, 3, 0, 0, 0, 0, 1]);
        assert_eq!(counts.iter().sum::<i64>(), 4);
    }

    #[test]
    fn rows_outside_window_are_ignored() {
        let days = trailing_days(day(10), TREND_DAYS);
        let points = fill_daily_counts(&days, &[(day(1), 9)]);
        assert!(points.iter().all(|p| p.count == 0));
    }
}
