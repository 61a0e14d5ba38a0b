//! Mise en forme des résultats : tableau des activités décalées, listing du
//! cours et libellés de sélection. Les dates passent par un [`DateFormatter`]
//! fourni par l'appelant.

use crate::model::{Activity, ActivityId, CourseId};
use crate::offset::Offset;
use crate::shifter::ShiftedActivity;
use anyhow::{bail, Result};
use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, FixedOffset, Utc};
use csv::WriterBuilder;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use uuid::Uuid;

/// Format court du listing (`15.03.24-09:00`).
pub const SHORT_DATE: &str = "%d.%m.%y-%H:%M";
/// Format long, date utilisateur par défaut de l'hôte.
pub const LONG_DATE: &str = "%A, %d %B %Y, %I:%M %p";

pub trait DateFormatter {
    fn format(&self, ts: i64) -> String;
}

/// Formatage strftime dans un fuseau fixe.
#[derive(Debug, Clone)]
pub struct PatternDate {
    pattern: String,
    tz: FixedOffset,
}

impl PatternDate {
    pub fn new<S: Into<String>>(pattern: S, tz: FixedOffset) -> Result<Self> {
        let pattern = pattern.into();
        if StrftimeItems::new(&pattern).any(|item| matches!(item, Item::Error)) {
            bail!("invalid date format: {pattern}");
        }
        Ok(Self { pattern, tz })
    }

    pub fn short(tz: FixedOffset) -> Self {
        Self {
            pattern: SHORT_DATE.to_string(),
            tz,
        }
    }

    pub fn long(tz: FixedOffset) -> Self {
        Self {
            pattern: LONG_DATE.to_string(),
            tz,
        }
    }
}

impl DateFormatter for PatternDate {
    fn format(&self, ts: i64) -> String {
        match DateTime::<Utc>::from_timestamp(ts, 0) {
            Some(dt) => dt.with_timezone(&self.tz).format(&self.pattern).to_string(),
            None => ts.to_string(),
        }
    }
}

/// Ligne du tableau de résultat : activité et nouvelle date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShiftRow {
    pub activity: String,
    pub due_date: String,
}

/// Compte rendu d'un décalage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShiftReport {
    pub id: Uuid,
    pub course: CourseId,
    pub generated_at: DateTime<Utc>,
    pub offset: Offset,
    pub rows: Vec<ShiftRow>,
}

impl ShiftReport {
    pub fn new(
        course: CourseId,
        offset: Offset,
        shifted: &[ShiftedActivity],
        formatter: &dyn DateFormatter,
        now: DateTime<Utc>,
    ) -> Self {
        let rows = shifted
            .iter()
            .map(|s| ShiftRow {
                activity: s.name.clone(),
                due_date: formatter.format(s.new_due),
            })
            .collect();
        Self {
            id: Uuid::new_v4(),
            course,
            generated_at: now,
            offset,
            rows,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn render_text(&self) -> String {
        let rows: Vec<Vec<String>> = self
            .rows
            .iter()
            .map(|r| vec![r.activity.clone(), r.due_date.clone()])
            .collect();
        render_table(&["activity", "due date"], &rows)
    }

    /// Export CSV : header `activity,due_date`
    pub fn export_csv<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let mut w = WriterBuilder::new().has_headers(false).from_path(path)?;
        w.write_record(["activity", "due_date"])?;
        for row in &self.rows {
            w.write_record([row.activity.as_str(), row.due_date.as_str()])?;
        }
        w.flush()?;
        Ok(())
    }

    pub fn export_json<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let s = serde_json::to_string_pretty(self)?;
        fs::write(path, s)?;
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingRow {
    pub section: u32,
    pub activity: String,
    pub due_date: String,
}

/// Listing des activités datées d'un cours (chemin lecture).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityListing {
    pub course: CourseId,
    pub rows: Vec<ListingRow>,
}

impl ActivityListing {
    pub fn new(course: CourseId, activities: &[Activity], formatter: &dyn DateFormatter) -> Self {
        let rows = activities
            .iter()
            .map(|a| ListingRow {
                section: a.section,
                activity: a.name.clone(),
                due_date: formatter.format(a.expected),
            })
            .collect();
        Self { course, rows }
    }

    pub fn render_text(&self) -> String {
        let rows: Vec<Vec<String>> = self
            .rows
            .iter()
            .map(|r| vec![r.section.to_string(), r.activity.clone(), r.due_date.clone()])
            .collect();
        render_table(&["section", "activity", "due date"], &rows)
    }

    /// Export CSV : header `section,activity,due_date`
    pub fn export_csv<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let mut w = WriterBuilder::new().has_headers(false).from_path(path)?;
        w.write_record(["section", "activity", "due_date"])?;
        for row in &self.rows {
            let section = row.section.to_string();
            w.write_record([section.as_str(), row.activity.as_str(), row.due_date.as_str()])?;
        }
        w.flush()?;
        Ok(())
    }
}

/// Option proposée pour la sélection manuelle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionChoice {
    pub id: ActivityId,
    pub label: String,
}

/// Libellés `"<section>: <nom> <date>"`.
pub fn selection_choices(
    activities: &[Activity],
    formatter: &dyn DateFormatter,
) -> Vec<SelectionChoice> {
    activities
        .iter()
        .map(|a| SelectionChoice {
            id: a.id,
            label: format!("{}: {} {}", a.section, a.name, formatter.format(a.expected)),
        })
        .collect()
}

fn render_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (w, cell) in widths.iter_mut().zip(row) {
            *w = (*w).max(cell.chars().count());
        }
    }
    let last = widths.len().saturating_sub(1);
    let line = |cells: Vec<&str>| -> String {
        cells
            .iter()
            .enumerate()
            .map(|(i, c)| {
                if i == last {
                    c.to_string()
                } else {
                    format!("{:<width$}", c, width = widths[i])
                }
            })
            .collect::<Vec<_>>()
            .join(" | ")
    };

    let mut out = String::new();
    out.push_str(&line(headers.to_vec()));
    out.push('\n');
    let sep: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    out.push_str(&sep.join("-+-"));
    out.push('\n');
    for row in rows {
        out.push_str(&line(row.iter().map(String::as_str).collect()));
        out.push('\n');
    }
    out
}
