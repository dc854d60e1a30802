//! Record collections with optional write-through to a JSON file
//!
//! A repository keeps its records in insertion order behind an `RwLock`.
//! When it has a path, every mutation rewrites the file atomically and is
//! rolled back in memory if the write fails.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde::{de::DeserializeOwned, Serialize};

use crate::error::{VatbookError, VatbookResult};
use crate::models::{Category, CategoryId, Transaction, TransactionId};

use super::file_io::{read_json, write_json_atomic};

/// A persisted entity with a stable id
pub trait Record: Clone + Serialize + DeserializeOwned {
    type Id: Copy + PartialEq + fmt::Display;

    /// Entity name used in error messages
    const ENTITY: &'static str;

    fn record_id(&self) -> Self::Id;
}

impl Record for Category {
    type Id = CategoryId;
    const ENTITY: &'static str = "Category";

    fn record_id(&self) -> CategoryId {
        self.id
    }
}

impl Record for Transaction {
    type Id = TransactionId;
    const ENTITY: &'static str = "Transaction";

    fn record_id(&self) -> TransactionId {
        self.id
    }
}

pub struct Repository<T: Record> {
    path: Option<PathBuf>,
    data: RwLock<Vec<T>>,
}

impl<T: Record> Repository<T> {
    /// In-memory repository
    pub fn in_memory() -> Self {
        Self {
            path: None,
            data: RwLock::new(Vec::new()),
        }
    }

    /// Repository backed by a JSON array file
    pub fn with_file(path: PathBuf) -> Self {
        Self {
            path: Some(path),
            data: RwLock::new(Vec::new()),
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Replace the in-memory records with the file contents
    pub fn load(&self) -> VatbookResult<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let records: Vec<T> = read_json(path)?;
        *self.write()? = records;
        Ok(())
    }

    /// Seed records without touching the file
    pub fn seed(&self, records: Vec<T>) -> VatbookResult<()> {
        *self.write()? = records;
        Ok(())
    }

    pub fn get_all(&self) -> VatbookResult<Vec<T>> {
        Ok(self.read()?.clone())
    }

    pub fn len(&self) -> VatbookResult<usize> {
        Ok(self.read()?.len())
    }

    pub fn is_empty(&self) -> VatbookResult<bool> {
        Ok(self.read()?.is_empty())
    }

    pub fn insert(&self, record: T) -> VatbookResult<T> {
        let mut data = self.write()?;
        let id = record.record_id();
        if data.iter().any(|r| r.record_id() == id) {
            return Err(VatbookError::Duplicate {
                entity_type: T::ENTITY,
                identifier: id.to_string(),
            });
        }

        data.push(record.clone());
        if let Err(e) = self.flush(&data) {
            data.pop();
            return Err(e);
        }
        Ok(record)
    }

    pub fn update(&self, record: T) -> VatbookResult<T> {
        let mut data = self.write()?;
        let id = record.record_id();
        let idx = data
            .iter()
            .position(|r| r.record_id() == id)
            .ok_or_else(|| Self::not_found(id))?;

        let previous = std::mem::replace(&mut data[idx], record.clone());
        if let Err(e) = self.flush(&data) {
            data[idx] = previous;
            return Err(e);
        }
        Ok(record)
    }

    pub fn delete(&self, id: T::Id) -> VatbookResult<T> {
        let mut data = self.write()?;
        let idx = data
            .iter()
            .position(|r| r.record_id() == id)
            .ok_or_else(|| Self::not_found(id))?;

        let removed = data.remove(idx);
        if let Err(e) = self.flush(&data) {
            data.insert(idx, removed);
            return Err(e);
        }
        Ok(removed)
    }

    fn flush(&self, data: &[T]) -> VatbookResult<()> {
        match &self.path {
            Some(path) => write_json_atomic(path, &data),
            None => Ok(()),
        }
    }

    fn not_found(id: T::Id) -> VatbookError {
        VatbookError::NotFound {
            entity_type: T::ENTITY,
            identifier: id.to_string(),
        }
    }

    fn read(&self) -> VatbookResult<RwLockReadGuard<'_, Vec<T>>> {
        self.data.read().map_err(|e| {
            VatbookError::Persistence(format!("Failed to acquire read lock: {}", e))
        })
    }

    fn write(&self) -> VatbookResult<RwLockWriteGuard<'_, Vec<T>>> {
        self.data.write().map_err(|e| {
            VatbookError::Persistence(format!("Failed to acquire write lock: {}", e))
        })
    }
}
