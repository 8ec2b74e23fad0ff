//! # SQLite
//!
//! Single-file store for registrations and the admin credential.
//!
//! ## Requirements
//!
//! - One row per submitted registration, never deleted
//! - Status column mutated by the review endpoints only
//! - Admin table seeded exactly once, on first boot
//! - Expected volume is a few thousand rows, so the full list is returned
//!   without pagination and stats scan the table directly
//!
//! ## Implementation
//!
//! - Schema applied from `schema.sql` on open, WAL mode for concurrent reads
//! - The connection sits behind a mutex held per statement; SQLite's
//!   single-writer semantics serialize concurrent writes below us
//! - Timestamps are stored as RFC 3339 text, so `ORDER BY timestamp DESC`
//!   is newest-first
use std::{collections::HashMap, path::Path, str::FromStr, sync::Mutex};

use chrono::{DateTime, Utc};
use rusqlite::{
    Connection, OptionalExtension, Row, params,
    types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef},
};
use serde::Serialize;

use crate::error::AppError;

const SCHEMA_SQL: &str = include_str!("schema.sql");

/// Review lifecycle of a registration. Any status may move to any other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Pending,
    Approved,
    Rejected,
}

impl Status {
    pub fn as_str(self) -> &'static str {
        match self {
            Status::Pending => "pending",
            Status::Approved => "approved",
            Status::Rejected => "rejected",
        }
    }
}

impl FromStr for Status {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Status::Pending),
            "approved" => Ok(Status::Approved),
            "rejected" => Ok(Status::Rejected),
            other => Err(AppError::InvalidStatus(other.to_string())),
        }
    }
}

impl ToSql for Status {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(self.as_str().into())
    }
}

impl FromSql for Status {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        match value.as_str()? {
            "pending" => Ok(Status::Pending),
            "approved" => Ok(Status::Approved),
            "rejected" => Ok(Status::Rejected),
            _ => Err(FromSqlError::InvalidType),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    pub id: String,
    pub full_name: String,
    pub college_name: String,
    pub department: String,
    pub year: String,
    pub email: String,
    pub phone: String,
    pub selected_events: String,
    pub transaction_id: String,
    pub screenshot_path: String,
    pub status: Status,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    pub total: u64,
    pub pending: u64,
    pub approved: u64,
    pub event_counts: HashMap<String, u32>,
}

pub struct Database {
    conn: Mutex<Connection>,
}

impl Database {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, rusqlite::Error> {
        let conn = Connection::open(path)?;
        conn.execute_batch(SCHEMA_SQL)?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    pub fn in_memory() -> Result<Self, rusqlite::Error> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(SCHEMA_SQL)?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Inserts the credential if the table is empty. Returns whether a row
    /// was written.
    pub fn seed_admin(&self, username: &str, password_hash: &str) -> Result<bool, rusqlite::Error> {
        let conn = self.conn.lock().unwrap();

        let count: i64 = conn.query_row("SELECT count(*) FROM admins", [], |row| row.get(0))?;
        if count > 0 {
            return Ok(false);
        }

        conn.execute(
            "INSERT INTO admins (username, password_hash) VALUES (?1, ?2)",
            params![username, password_hash],
        )?;

        Ok(true)
    }

    pub fn admin_password_hash(&self, username: &str) -> Result<Option<String>, rusqlite::Error> {
        let conn = self.conn.lock().unwrap();

        conn.query_row(
            "SELECT password_hash FROM admins WHERE username = ?1",
            params![username],
            |row| row.get(0),
        )
        .optional()
    }

    pub fn insert_registration(&self, registration: &Registration) -> Result<(), rusqlite::Error> {
        let conn = self.conn.lock().unwrap();

        conn.execute(
            "INSERT INTO registrations
             (id, full_name, college_name, department, year, email, phone,
              selected_events, transaction_id, screenshot_path, status, timestamp)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
            params![
                registration.id,
                registration.full_name,
                registration.college_name,
                registration.department,
                registration.year,
                registration.email,
                registration.phone,
                registration.selected_events,
                registration.transaction_id,
                registration.screenshot_path,
                registration.status,
                registration.timestamp,
            ],
        )?;

        Ok(())
    }

    pub fn list_registrations(&self) -> Result<Vec<Registration>, rusqlite::Error> {
        let conn = self.conn.lock().unwrap();

        let mut stmt = conn.prepare(
            "SELECT id, full_name, college_name, department, year, email, phone,
                    selected_events, transaction_id, screenshot_path, status, timestamp
             FROM registrations
             ORDER BY timestamp DESC",
        )?;

        let rows = stmt.query_map([], row_to_registration)?;
        rows.collect()
    }

    /// Returns the number of rows touched; zero means the id is unknown.
    pub fn update_status(&self, id: &str, status: Status) -> Result<usize, rusqlite::Error> {
        let conn = self.conn.lock().unwrap();

        conn.execute(
            "UPDATE registrations SET status = ?1 WHERE id = ?2",
            params![status, id],
        )
    }

    pub fn stats(&self) -> Result<Stats, rusqlite::Error> {
        let conn = self.conn.lock().unwrap();

        let total: i64 = conn.query_row("SELECT count(*) FROM registrations", [], |row| row.get(0))?;
        let pending: i64 = conn.query_row(
            "SELECT count(*) FROM registrations WHERE status = ?1",
            params![Status::Pending],
            |row| row.get(0),
        )?;
        let approved: i64 = conn.query_row(
            "SELECT count(*) FROM registrations WHERE status = ?1",
            params![Status::Approved],
            |row| row.get(0),
        )?;

        let mut stmt = conn.prepare("SELECT selected_events FROM registrations")?;
        let selections: Vec<String> = stmt
            .query_map([], |row| row.get(0))?
            .collect::<Result<_, _>>()?;

        Ok(Stats {
            total: total as u64,
            pending: pending as u64,
            approved: approved as u64,
            event_counts: tally_events(selections.iter().map(String::as_str)),
        })
    }
}

fn row_to_registration(row: &Row) -> rusqlite::Result<Registration> {
    Ok(Registration {
        id: row.get(0)?,
        full_name: row.get(1)?,
        college_name: row.get(2)?,
        department: row.get(3)?,
        year: row.get(4)?,
        email: row.get(5)?,
        phone: row.get(6)?,
        selected_events: row.get(7)?,
        transaction_id: row.get(8)?,
        screenshot_path: row.get(9)?,
        status: row.get(10)?,
        timestamp: row.get(11)?,
    })
}

/// Splits each comma-joined selection, trims entries, and drops empties.
/// A registration listing the same event twice counts twice.
pub fn tally_events<'a>(selections: impl Iterator<Item = &'a str>) -> HashMap<String, u32> {
    let mut counts = HashMap::new();

    for selection in selections {
        for event in selection.split(',') {
            let event = event.trim();
            if !event.is_empty() {
                *counts.entry(event.to_string()).or_insert(0) += 1;
            }
        }
    }

    counts
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn sample(id: &str, events: &str, timestamp: DateTime<Utc>) -> Registration {
        Registration {
            id: id.to_string(),
            full_name: "Ada Lovelace".to_string(),
            college_name: "Analytical College".to_string(),
            department: "CSE".to_string(),
            year: "3".to_string(),
            email: "ada@example.com".to_string(),
            phone: "9876543210".to_string(),
            selected_events: events.to_string(),
            transaction_id: "TXN123456".to_string(),
            screenshot_path: String::new(),
            status: Status::Pending,
            timestamp,
        }
    }

    #[test]
    fn lists_newest_first() {
        let db = Database::in_memory().unwrap();
        let earlier = Utc.with_ymd_and_hms(2026, 2, 1, 10, 0, 0).unwrap();
        let later = Utc.with_ymd_and_hms(2026, 2, 1, 11, 0, 0).unwrap();

        db.insert_registration(&sample("VEL-AAAAAAAAA", "Dance", earlier))
            .unwrap();
        db.insert_registration(&sample("VEL-BBBBBBBBB", "Dance", later))
            .unwrap();

        let listed = db.list_registrations().unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].id, "VEL-BBBBBBBBB");
        assert_eq!(listed[1].id, "VEL-AAAAAAAAA");
        assert_eq!(listed[0].status, Status::Pending);
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let db = Database::in_memory().unwrap();
        let now = Utc::now();

        db.insert_registration(&sample("VEL-AAAAAAAAA", "Dance", now))
            .unwrap();
        assert!(
            db.insert_registration(&sample("VEL-AAAAAAAAA", "Dance", now))
                .is_err()
        );
    }

    #[test]
    fn update_status_reports_missing_rows() {
        let db = Database::in_memory().unwrap();
        db.insert_registration(&sample("VEL-AAAAAAAAA", "Dance", Utc::now()))
            .unwrap();

        assert_eq!(
            db.update_status("VEL-AAAAAAAAA", Status::Approved).unwrap(),
            1
        );
        assert_eq!(
            db.update_status("VEL-ZZZZZZZZZ", Status::Approved).unwrap(),
            0
        );
        assert_eq!(db.list_registrations().unwrap()[0].status, Status::Approved);
    }

    #[test]
    fn stats_reflect_status_changes() {
        let db = Database::in_memory().unwrap();
        db.insert_registration(&sample("VEL-AAAAAAAAA", "Hackathon, Dance", Utc::now()))
            .unwrap();
        db.insert_registration(&sample("VEL-BBBBBBBBB", "Dance", Utc::now()))
            .unwrap();

        let before = db.stats().unwrap();
        assert_eq!(before.total, 2);
        assert_eq!(before.pending, 2);
        assert_eq!(before.approved, 0);
        assert_eq!(before.event_counts.get("Hackathon"), Some(&1));
        assert_eq!(before.event_counts.get("Dance"), Some(&2));

        db.update_status("VEL-AAAAAAAAA", Status::Approved).unwrap();

        let after = db.stats().unwrap();
        assert_eq!(after.total, 2);
        assert_eq!(after.pending, 1);
        assert_eq!(after.approved, 1);
    }

    #[test]
    fn stats_are_stable_without_writes() {
        let db = Database::in_memory().unwrap();
        db.insert_registration(&sample("VEL-AAAAAAAAA", "Hackathon, Dance", Utc::now()))
            .unwrap();

        assert_eq!(db.stats().unwrap(), db.stats().unwrap());
    }

    #[test]
    fn tally_splits_and_trims() {
        let counts = tally_events(["Hackathon, Dance", " Dance ,", ""].into_iter());

        assert_eq!(counts.get("Hackathon"), Some(&1));
        assert_eq!(counts.get("Dance"), Some(&2));
        assert_eq!(counts.len(), 2);
    }

    #[test]
    fn admin_is_seeded_once() {
        let db = Database::in_memory().unwrap();

        assert!(db.seed_admin("admin", "hash-a").unwrap());
        assert!(!db.seed_admin("admin", "hash-b").unwrap());
        assert_eq!(
            db.admin_password_hash("admin").unwrap().as_deref(),
            Some("hash-a")
        );
        assert_eq!(db.admin_password_hash("nobody").unwrap(), None);
    }

    #[test]
    fn status_round_trips_through_sql() {
        let db = Database::in_memory().unwrap();
        db.insert_registration(&sample("VEL-AAAAAAAAA", "Dance", Utc::now()))
            .unwrap();

        db.update_status("VEL-AAAAAAAAA", Status::Rejected).unwrap();
        assert_eq!(db.list_registrations().unwrap()[0].status, Status::Rejected);
    }
}
