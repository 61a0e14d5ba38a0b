use crate::model::ActivityId;
use crate::offset::Offset;
use crate::storage::StoreError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Fenêtre de dates inclusive `[min, max]` (timestamps Unix).
/// `min > max` donne une fenêtre vide, sans erreur.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateWindow {
    pub min: i64,
    pub max: i64,
}

impl DateWindow {
    pub fn new(min: i64, max: i64) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, ts: i64) -> bool {
        self.min <= ts && ts <= self.max
    }
}

/// Politique de sélection des activités à décaler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionMode {
    /// Toutes les activités datées, éventuellement limitées à une fenêtre
    AllActivities { window: Option<DateWindow> },
    /// Seulement les activités choisies à la main
    SelectedActivities(HashSet<ActivityId>),
}

/// Demande de décalage, une par soumission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShiftRequest {
    pub offset: Offset,
    pub mode: SelectionMode,
}

impl ShiftRequest {
    pub fn all(offset: Offset) -> Self {
        Self {
            offset,
            mode: SelectionMode::AllActivities { window: None },
        }
    }

    pub fn within(offset: Offset, window: DateWindow) -> Self {
        Self {
            offset,
            mode: SelectionMode::AllActivities {
                window: Some(window),
            },
        }
    }

    pub fn selected<I: IntoIterator<Item = ActivityId>>(offset: Offset, ids: I) -> Self {
        Self {
            offset,
            mode: SelectionMode::SelectedActivities(ids.into_iter().collect()),
        }
    }
}

/// Ordre de parcours des activités. Toujours passé explicitement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortOrder {
    /// Ordre de l'annuaire, sans tri
    AsSupplied,
    /// Section puis position dans la section
    ByCourse,
    /// Date attendue, puis ordre du cours
    ByTime,
}

impl FromStr for SortOrder {
    type Err = ShiftError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "as-supplied" | "none" => Ok(SortOrder::AsSupplied),
            "by-course" | "course" | "orderbycourse" => Ok(SortOrder::ByCourse),
            "by-time" | "time" | "orderbytime" => Ok(SortOrder::ByTime),
            _ => Err(ShiftError::InvalidSortOrder(s.to_string())),
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SortOrder::AsSupplied => "as-supplied",
            SortOrder::ByCourse => "by-course",
            SortOrder::ByTime => "by-time",
        })
    }
}

/// Une activité effectivement décalée.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShiftedActivity {
    pub id: ActivityId,
    pub name: String,
    pub section: u32,
    pub old_due: i64,
    pub new_due: i64,
}

#[derive(Error, Debug)]
pub enum ShiftError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("timestamp overflow for activity {id}: {expected} + {offset}s")]
    TimestampOverflow {
        id: ActivityId,
        expected: i64,
        offset: i64,
    },
    #[error("invalid offset: {0}")]
    InvalidOffset(String),
    #[error("unknown sort order: {0}")]
    InvalidSortOrder(String),
}
