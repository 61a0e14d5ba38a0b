use crate::model::{ActivityId, Catalog, CompletionTracking, CourseId, CourseModule};
use crate::shifter::DateWindow;
use anyhow::{bail, Context};
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use csv::ReaderBuilder;
use std::fs;
use std::path::Path;

/// Import de modules depuis CSV, header
/// `id,course,name,module,section,completion,completion_expected[,visible][,available]`
pub fn import_modules_csv<P: AsRef<Path>>(path: P) -> anyhow::Result<Vec<CourseModule>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)?;
    let mut out = Vec::new();
    for (line, rec) in rdr.records().enumerate() {
        let rec = rec?;
        let row = line + 2;
        let field = |idx: usize, name: &str| -> anyhow::Result<String> {
            let v = rec
                .get(idx)
                .with_context(|| format!("row {row}: missing {name}"))?
                .trim();
            Ok(v.to_string())
        };
        let id: i64 = field(0, "id")?
            .parse()
            .with_context(|| format!("row {row}: invalid id"))?;
        let course: i64 = field(1, "course")?
            .parse()
            .with_context(|| format!("row {row}: invalid course"))?;
        let name = field(2, "name")?;
        if name.is_empty() {
            bail!("row {row}: empty name");
        }
        let module = field(3, "module")?;
        let section: u32 = field(4, "section")?
            .parse()
            .with_context(|| format!("row {row}: invalid section"))?;
        let completion = parse_completion(&field(5, "completion")?)
            .with_context(|| format!("row {row}: invalid completion"))?;
        let expected = field(6, "completion_expected")?;
        let completion_expected = if expected.is_empty() {
            0
        } else {
            parse_timestamp(&expected)
                .with_context(|| format!("row {row}: invalid completion_expected"))?
        };
        let visible = optional_bool(rec.get(7))
            .with_context(|| format!("row {row}: invalid visible"))?;
        let available = optional_bool(rec.get(8))
            .with_context(|| format!("row {row}: invalid available"))?;

        out.push(CourseModule {
            id: ActivityId::new(id),
            course: CourseId::new(course),
            name,
            module,
            section,
            completion,
            completion_expected,
            visible,
            available,
        });
    }
    Ok(out)
}

fn optional_bool(raw: Option<&str>) -> anyhow::Result<bool> {
    match raw.map(str::trim) {
        None | Some("") => Ok(true),
        Some(flag) => parse_bool(flag),
    }
}

fn parse_bool(s: &str) -> anyhow::Result<bool> {
    match s.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "y" => Ok(true),
        "false" | "0" | "no" | "n" => Ok(false),
        _ => bail!("expected boolean"),
    }
}

fn parse_completion(s: &str) -> anyhow::Result<CompletionTracking> {
    match s.to_ascii_lowercase().as_str() {
        "" | "none" | "0" => Ok(CompletionTracking::None),
        "manual" | "1" => Ok(CompletionTracking::Manual),
        "automatic" | "auto" | "2" => Ok(CompletionTracking::Automatic),
        _ => bail!("expected none, manual or automatic"),
    }
}

/// Timestamp Unix, RFC3339 ou date `YYYY-MM-DD` (minuit UTC).
pub fn parse_timestamp(raw: &str) -> anyhow::Result<i64> {
    if let Ok(ts) = raw.parse::<i64>() {
        return Ok(ts);
    }
    let (dt, _) = parse_point(raw)?;
    Ok(dt.timestamp())
}

fn parse_point(raw: &str) -> anyhow::Result<(DateTime<Utc>, bool)> {
    if let Ok(dt) = raw.parse::<DateTime<Utc>>() {
        return Ok((dt, false));
    }
    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .with_context(|| format!("invalid date/datetime: {raw}"))?;
    let datetime = date
        .and_hms_opt(0, 0, 0)
        .context("invalid midnight conversion")?;
    Ok((Utc.from_utc_datetime(&datetime), true))
}

/// Fenêtre inclusive à partir de deux bornes texte. Une date seule en borne
/// haute couvre toute la journée. Aucune vérification `min <= max`.
pub fn parse_window(from: &str, to: &str) -> anyhow::Result<DateWindow> {
    let min = parse_timestamp(from.trim()).context("window start")?;
    let to = to.trim();
    let max = match to.parse::<i64>() {
        Ok(ts) => ts,
        Err(_) => {
            let (dt, was_date) = parse_point(to).context("window end")?;
            if was_date {
                dt.timestamp() + 86_399
            } else {
                dt.timestamp()
            }
        }
    };
    Ok(DateWindow::new(min, max))
}

/// Liste d'identifiants `"12,15, 18"`.
pub fn parse_id_list(raw: &str) -> anyhow::Result<Vec<ActivityId>> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<i64>()
                .map(ActivityId::new)
                .with_context(|| format!("invalid activity id: {s}"))
        })
        .collect()
}

/// Export JSON du catalogue (jolie mise en forme)
pub fn export_catalog_json<P: AsRef<Path>>(path: P, catalog: &Catalog) -> anyhow::Result<()> {
    let s = serde_json::to_string_pretty(catalog)?;
    fs::write(path, s)?;
    Ok(())
}
