use crate::report::{PatternDate, LONG_DATE, SHORT_DATE};
use crate::shifter::SortOrder;
use anyhow::Context;
use chrono::FixedOffset;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Réglages d'affichage et de parcours, chargés depuis un JSON optionnel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Décalage du fuseau d'affichage par rapport à UTC, en minutes
    pub utc_offset_minutes: i32,
    pub sort: SortOrder,
    /// Format strftime du listing et des libellés de sélection
    pub listing_format: String,
    /// Format strftime du tableau de résultat
    pub result_format: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            utc_offset_minutes: 0,
            sort: SortOrder::AsSupplied,
            listing_format: SHORT_DATE.to_string(),
            result_format: LONG_DATE.to_string(),
        }
    }
}

impl Settings {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let data = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
        let settings: Settings = serde_json::from_slice(&data)
            .with_context(|| format!("parsing {}", path.display()))?;
        settings.timezone()?;
        Ok(settings)
    }

    pub fn timezone(&self) -> anyhow::Result<FixedOffset> {
        self.utc_offset_minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
            .with_context(|| {
                format!("utc_offset_minutes out of range: {}", self.utc_offset_minutes)
            })
    }

    pub fn listing_formatter(&self) -> anyhow::Result<PatternDate> {
        PatternDate::new(self.listing_format.clone(), self.timezone()?)
    }

    pub fn result_formatter(&self) -> anyhow::Result<PatternDate> {
        PatternDate::new(self.result_format.clone(), self.timezone()?)
    }
}
