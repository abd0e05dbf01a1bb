//! Aggregate reads for the admin dashboard.

use crate::recorder::format_timestamp;
use chrono::{Duration, Utc};
use db::{Database, Row, params};
use serde::Serialize;

/// How many times one event was opened.
#[derive(Debug, Clone, Serialize)]
pub struct EventViews {
    pub name: String,
    pub views: i64,
}

/// Interactions on one calendar day.
#[derive(Debug, Clone, Serialize)]
pub struct DailyCount {
    pub date: String,
    pub count: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct StatsSnapshot {
    pub total_users: i64,
    pub active_24h: i64,
    pub top_events: Vec<EventViews>,
    pub daily_activity: Vec<DailyCount>,
}

/// One pass over the store: user totals, 24h liveness, the five most-viewed
/// events, and a week of daily interaction counts.
pub async fn snapshot(db: &Database) -> db::Result<StatsSnapshot> {
    let total_users = count(
        db.fetch_one("SELECT COUNT(*) AS count FROM users", params![])
            .await?,
    );

    let day_ago = format_timestamp(Utc::now() - Duration::days(1));
    let active_24h = count(
        db.fetch_one(
            "SELECT COUNT(*) AS count FROM users WHERE last_active > ?",
            params![day_ago.as_str()],
        )
        .await?,
    );

    let top_events = db
        .fetch_all(
            "SELECT metadata AS name, COUNT(*) AS views FROM telemetry \
             WHERE action = 'view_event' GROUP BY metadata \
             ORDER BY views DESC LIMIT 5",
            params![],
        )
        .await?
        .into_iter()
        .filter_map(|row| {
            Some(EventViews {
                name: row.text("name")?.to_string(),
                views: row.i64("views")?,
            })
        })
        .collect();

    let week_ago = format_timestamp(Utc::now() - Duration::days(7));
    let daily_activity = db
        .fetch_all(
            "SELECT date(created_at) AS date, COUNT(*) AS count FROM telemetry \
             WHERE created_at > ? GROUP BY date(created_at) ORDER BY date ASC",
            params![week_ago.as_str()],
        )
        .await?
        .into_iter()
        .filter_map(|row| {
            Some(DailyCount {
                date: row.text("date")?.to_string(),
                count: row.i64("count")?,
            })
        })
        .collect();

    Ok(StatsSnapshot {
        total_users,
        active_24h,
        top_events,
        daily_activity,
    })
}

fn count(row: Option<Row>) -> i64 {
    row.and_then(|row| row.i64("count")).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn count_defaults_to_zero() {
        assert_eq!(count(None), 0);

        let row: Row = [("count".to_string(), json!(41))].into_iter().collect();
        assert_eq!(count(Some(row)), 41);

        // The store serializes big integers as strings.
        let row: Row = [("count".to_string(), json!("41"))].into_iter().collect();
        assert_eq!(count(Some(row)), 41);
    }

    #[test]
    fn snapshot_serializes_for_admin_surfaces() {
        let snapshot = StatsSnapshot {
            total_users: 120,
            active_24h: 37,
            top_events: vec![EventViews {
                name: "Battle of Bands".into(),
                views: 64,
            }],
            daily_activity: vec![DailyCount {
                date: "2026-02-13".into(),
                count: 200,
            }],
        };
        let wire = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(wire["total_users"], 120);
        assert_eq!(wire["top_events"][0]["name"], "Battle of Bands");
        assert_eq!(wire["daily_activity"][0]["count"], 200);
    }
}
