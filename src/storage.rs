use crate::model::{ActivityId, Catalog, CourseModule};
use anyhow::Context;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("no course module with id {0}")]
    MissingRecord(ActivityId),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Champs modifiables d'un enregistrement `course_modules`.
/// Seuls les champs renseignés sont écrits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ModuleUpdate {
    pub completion_expected: Option<i64>,
}

impl ModuleUpdate {
    pub fn completion_expected(ts: i64) -> Self {
        Self {
            completion_expected: Some(ts),
        }
    }
}

/// Accès enregistrement par enregistrement à la table des modules.
pub trait ModuleStore {
    fn read_module(&self, id: ActivityId) -> Result<Option<CourseModule>, StoreError>;
    /// Écrit les champs de `fields` ; un enregistrement absent est une erreur.
    fn update_module(&mut self, id: ActivityId, fields: &ModuleUpdate) -> Result<(), StoreError>;
}

impl<T: ModuleStore + ?Sized> ModuleStore for &mut T {
    fn read_module(&self, id: ActivityId) -> Result<Option<CourseModule>, StoreError> {
        (**self).read_module(id)
    }
    fn update_module(&mut self, id: ActivityId, fields: &ModuleUpdate) -> Result<(), StoreError> {
        (**self).update_module(id, fields)
    }
}

impl ModuleStore for Catalog {
    fn read_module(&self, id: ActivityId) -> Result<Option<CourseModule>, StoreError> {
        Ok(self.find_module(id).cloned())
    }

    fn update_module(&mut self, id: ActivityId, fields: &ModuleUpdate) -> Result<(), StoreError> {
        let record = self
            .find_module_mut(id)
            .ok_or(StoreError::MissingRecord(id))?;
        if let Some(ts) = fields.completion_expected {
            record.completion_expected = ts;
        }
        Ok(())
    }
}

pub trait Storage {
    /// Charge un catalogue depuis un support.
    fn load(&self) -> anyhow::Result<Catalog>;
    /// Sauvegarde de manière atomique.
    fn save(&self, catalog: &Catalog) -> anyhow::Result<()>;
}

pub struct JsonStorage {
    path: PathBuf,
}

impl JsonStorage {
    pub fn open<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        Ok(Self {
            path: path.as_ref().to_path_buf(),
        })
    }

    /// Charge le catalogue, ou un catalogue vide si le fichier n'existe pas encore.
    pub fn load_or_default(&self) -> anyhow::Result<Catalog> {
        if !self.path.exists() {
            return Ok(Catalog::default());
        }
        self.load()
    }
}

impl Storage for JsonStorage {
    fn load(&self) -> anyhow::Result<Catalog> {
        let data =
            fs::read(&self.path).with_context(|| format!("reading {}", self.path.display()))?;
        let catalog: Catalog = serde_json::from_slice(&data)
            .with_context(|| format!("parsing {}", self.path.display()))?;
        Ok(catalog)
    }

    fn save(&self, catalog: &Catalog) -> anyhow::Result<()> {
        let json = serde_json::to_vec_pretty(catalog)?;
        let dir = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        let mut tmp = NamedTempFile::new_in(dir).with_context(|| "creating temp file")?;
        tmp.write_all(&json)?;
        tmp.flush()?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).with_context(|| "atomic rename")?;
        tracing::debug!(
            path = %self.path.display(),
            modules = catalog.modules.len(),
            "catalog saved"
        );
        Ok(())
    }
}
