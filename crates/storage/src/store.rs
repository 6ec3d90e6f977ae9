// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! File-backed talk store.
//!
//! One JSON envelope per talk, named by the talk's sequential number.
//! Saves are atomic (write to `.tmp`, fsync, rename) so a reader never
//! observes a partially-applied edit script. Documents are validated
//! against the schema on every load and save; deactivated talks stay on
//! disk but drop out of `active()`.

use chrono::{DateTime, Utc};
use drover_core::{schema, Talk, Talks, TalksError};
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};
use tracing::warn;

/// On-disk wrapper around the document: store bookkeeping lives here,
/// outside the schema-validated talk subtree.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct Envelope {
    active: bool,
    updated: DateTime<Utc>,
    talk: Talk,
}

/// Directory-of-JSON-files implementation of [`Talks`].
#[derive(Debug, Clone)]
pub struct TalkStore {
    dir: PathBuf,
}

impl TalkStore {
    /// Open (creating if needed) a store rooted at `dir`.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, TalksError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    fn path_for(&self, number: u64) -> PathBuf {
        self.dir.join(format!("{:08}.json", number))
    }

    fn entries(&self) -> Result<Vec<PathBuf>, TalksError> {
        let mut paths = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.extension().is_some_and(|e| e == "json") {
                paths.push(path);
            }
        }
        paths.sort();
        Ok(paths)
    }

    fn read_envelope(&self, path: &Path) -> Result<Envelope, TalksError> {
        let file = File::open(path)?;
        // Validate the raw talk subtree before deserializing, so shapes the
        // schema rejects never make it into memory.
        let raw: serde_json::Value = serde_json::from_reader(BufReader::new(file))?;
        if let Some(talk) = raw.get("talk") {
            schema::validate(talk).map_err(drover_core::TalkError::from)?;
        }
        let envelope: Envelope = serde_json::from_value(raw)?;
        Ok(envelope)
    }

    fn write_envelope(&self, envelope: &Envelope) -> Result<(), TalksError> {
        schema::validate(&envelope.talk.to_value()).map_err(drover_core::TalkError::from)?;
        let path = self.path_for(envelope.talk.number);
        let tmp = path.with_extension("tmp");
        {
            let file = File::create(&tmp)?;
            let mut writer = BufWriter::new(file);
            serde_json::to_writer_pretty(&mut writer, envelope)?;
            let file = writer.into_inner().map_err(|e| e.into_error())?;
            file.sync_all()?;
        }
        fs::rename(&tmp, &path)?;
        Ok(())
    }

    fn find(&self, name: &str) -> Result<Option<Envelope>, TalksError> {
        for path in self.entries()? {
            match self.read_envelope(&path) {
                Ok(envelope) if envelope.talk.name == name => return Ok(Some(envelope)),
                Ok(_) => {}
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "skipping unreadable talk");
                }
            }
        }
        Ok(None)
    }
}

impl Talks for TalkStore {
    fn create(&self, name: &str) -> Result<Talk, TalksError> {
        let mut max = 0;
        for path in self.entries()? {
            let envelope = self.read_envelope(&path)?;
            if envelope.talk.name == name {
                return Err(TalksError::Duplicate(name.to_string()));
            }
            max = max.max(envelope.talk.number);
        }
        let talk = Talk::new(max + 1, name);
        self.write_envelope(&Envelope {
            active: true,
            updated: Utc::now(),
            talk: talk.clone(),
        })?;
        Ok(talk)
    }

    fn get(&self, name: &str) -> Result<Talk, TalksError> {
        self.find(name)?
            .map(|e| e.talk)
            .ok_or_else(|| TalksError::NotFound(name.to_string()))
    }

    fn save(&self, talk: &Talk) -> Result<(), TalksError> {
        let path = self.path_for(talk.number);
        let active = if path.exists() {
            self.read_envelope(&path)?.active
        } else {
            true
        };
        self.write_envelope(&Envelope {
            active,
            updated: Utc::now(),
            talk: talk.clone(),
        })
    }

    fn active(&self) -> Result<Vec<String>, TalksError> {
        let mut names = Vec::new();
        for path in self.entries()? {
            match self.read_envelope(&path) {
                Ok(envelope) if envelope.active => names.push(envelope.talk.name),
                Ok(_) => {}
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "skipping unreadable talk");
                }
            }
        }
        Ok(names)
    }

    fn deactivate(&self, name: &str) -> Result<(), TalksError> {
        let mut envelope = self
            .find(name)?
            .ok_or_else(|| TalksError::NotFound(name.to_string()))?;
        envelope.active = false;
        envelope.updated = Utc::now();
        self.write_envelope(&envelope)
    }

    fn exists(&self, name: &str) -> Result<bool, TalksError> {
        Ok(self.find(name)?.is_some())
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
