//! Persisted vocabulary model: a single JSON artifact slot on disk.
//!
//! An absent artifact is a normal state (empty corpus, or the last fit
//! failed); readers get `None` and must degrade instead of failing.

use std::fs;
use std::io::{BufReader, BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

use crate::db::{CorpusStore, DbError};
use crate::models::EngineError;
use crate::vocab::VocabularyModel;

#[derive(Error, Debug)]
pub enum ModelStoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Cannot build model: {0}")]
    Engine(#[from] EngineError),
    #[error("Corpus error: {0}")]
    Db(#[from] DbError),
}

/// Location of the serialized model.
#[derive(Debug, Clone)]
pub struct ModelStore {
    path: PathBuf,
}

impl ModelStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Replace the artifact with `model`.
    ///
    /// Writes a sibling temp file first and renames it over the slot, so
    /// readers never observe a half-written model.
    pub fn save(&self, model: &VocabularyModel) -> Result<(), ModelStoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let tmp_path = self.path.with_extension("json.tmp");
        {
            let mut writer = BufWriter::new(fs::File::create(&tmp_path)?);
            serde_json::to_writer(&mut writer, model)?;
            writer.flush()?;
        }
        fs::rename(&tmp_path, &self.path)?;
        Ok(())
    }

    /// Load the artifact, or `None` if the slot is empty.
    pub fn load(&self) -> Result<Option<VocabularyModel>, ModelStoreError> {
        let file = match fs::File::open(&self.path) {
            Ok(file) => file,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        let model = serde_json::from_reader(BufReader::new(file))?;
        Ok(Some(model))
    }

    /// Empty the slot. Returns whether an artifact was removed.
    pub fn remove(&self) -> Result<bool, ModelStoreError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(true),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(false),
            Err(err) => Err(err.into()),
        }
    }
}

/// Re-fit the model over the whole corpus and publish it.
///
/// An empty corpus clears the slot and returns `Ok(None)`. A corpus with no
/// usable terms clears the slot and returns the engine error, so a stale
/// model never outlives the documents it was fit on.
pub fn rebuild_model(
    corpus: &CorpusStore,
    artifacts: &ModelStore,
) -> Result<Option<VocabularyModel>, ModelStoreError> {
    let documents = corpus.list()?;

    if documents.is_empty() {
        if artifacts.remove()? {
            info!(path = %artifacts.path().display(), "Corpus is empty, removed old model");
        } else {
            info!("Corpus is empty, no model to build");
        }
        return Ok(None);
    }

    let texts: Vec<&str> = documents.iter().map(|doc| doc.text.as_str()).collect();
    let model = match VocabularyModel::fit(&texts) {
        Ok(model) => model,
        Err(err) => {
            artifacts.remove()?;
            return Err(err.into());
        }
    };

    artifacts.save(&model)?;
    info!(
        documents = texts.len(),
        terms = model.len(),
        path = %artifacts.path().display(),
        "Model rebuilt"
    );
    Ok(Some(model))
}
