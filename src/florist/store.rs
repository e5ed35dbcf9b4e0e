use std::{
    fs,
    path::{Path, PathBuf},
};

use chrono::NaiveDate;
use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, info};

use super::{Flower, Invoice};
use crate::error::{ModelError, StoreError};

pub const FLOWERS_FILE: &str = "flowers.json";
pub const INVOICES_FILE: &str = "invoices.json";

/// Flowers and invoices kept as two flat JSON arrays.
///
/// Each call reads the whole file and, for writes, overwrites it. There is no
/// locking, so concurrent writers can lose updates.
#[derive(Debug, Clone)]
pub struct JsonRepository {
    flowers_path: PathBuf,
    invoices_path: PathBuf,
}

impl JsonRepository {
    pub fn new(
        flowers_path: impl AsRef<Path>,
        invoices_path: impl AsRef<Path>,
    ) -> Result<Self, StoreError> {
        let repo = Self {
            flowers_path: flowers_path.as_ref().to_path_buf(),
            invoices_path: invoices_path.as_ref().to_path_buf(),
        };
        for path in [&repo.flowers_path, &repo.invoices_path] {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent).map_err(|source| io_error(parent, source))?;
            }
        }
        Ok(repo)
    }

    /// Repository using the default file names inside `dir`.
    pub fn in_dir(dir: impl AsRef<Path>) -> Result<Self, StoreError> {
        let dir = dir.as_ref();
        Self::new(dir.join(FLOWERS_FILE), dir.join(INVOICES_FILE))
    }

    pub fn flowers_path(&self) -> &Path {
        &self.flowers_path
    }

    pub fn invoices_path(&self) -> &Path {
        &self.invoices_path
    }

    pub fn list_flowers(&self) -> Result<Vec<Flower>, StoreError> {
        read_list(&self.flowers_path)
    }

    pub fn get_flower(&self, id: &str) -> Result<Option<Flower>, StoreError> {
        Ok(self.list_flowers()?.into_iter().find(|f| f.id() == id))
    }

    pub fn add_flower(&self, flower: Flower) -> Result<Flower, StoreError> {
        let mut flowers = self.list_flowers()?;
        if flowers.iter().any(|f| f.id() == flower.id()) {
            return Err(StoreError::DuplicateId {
                kind: "flower",
                id: flower.id().to_string(),
            });
        }
        flowers.push(flower.clone());
        write_list(&self.flowers_path, &flowers)?;
        info!(id = flower.id(), species = flower.species(), "flower stored");
        Ok(flower)
    }

    /// Returns whether a flower was removed; unknown ids are a no-op.
    pub fn delete_flower(&self, id: &str) -> Result<bool, StoreError> {
        let mut flowers = self.list_flowers()?;
        let before = flowers.len();
        flowers.retain(|f| f.id() != id);
        write_list(&self.flowers_path, &flowers)?;
        let removed = flowers.len() != before;
        info!(id, removed, "flower delete");
        Ok(removed)
    }

    pub fn search_flowers_price_between(
        &self,
        min_price: f64,
        max_price: f64,
    ) -> Result<Vec<Flower>, StoreError> {
        if min_price > max_price {
            return Err(ModelError::InvalidRange {
                start: min_price.to_string(),
                end: max_price.to_string(),
            }
            .into());
        }
        Ok(self
            .list_flowers()?
            .into_iter()
            .filter(|f| (min_price..=max_price).contains(&f.price()))
            .collect())
    }

    pub fn search_flowers_by_cut_date(
        &self,
        cut_date: NaiveDate,
    ) -> Result<Vec<Flower>, StoreError> {
        Ok(self
            .list_flowers()?
            .into_iter()
            .filter(|f| f.cut_date() == cut_date)
            .collect())
    }

    pub fn list_invoices(&self) -> Result<Vec<Invoice>, StoreError> {
        read_list(&self.invoices_path)
    }

    pub fn get_invoice(&self, id: &str) -> Result<Option<Invoice>, StoreError> {
        Ok(self.list_invoices()?.into_iter().find(|inv| inv.id() == id))
    }

    /// Stores `invoice` once every bouquet flower is known and its id is free.
    pub fn add_invoice(&self, invoice: Invoice) -> Result<Invoice, StoreError> {
        let known = self.list_flowers()?;
        if let Some(missing) = invoice
            .bouquet()
            .iter()
            .find(|f| !known.iter().any(|k| k.id() == f.id()))
        {
            return Err(StoreError::UnknownFlower(missing.id().to_string()));
        }

        let mut invoices = self.list_invoices()?;
        if invoices.iter().any(|inv| inv.id() == invoice.id()) {
            return Err(StoreError::DuplicateId {
                kind: "invoice",
                id: invoice.id().to_string(),
            });
        }
        invoices.push(invoice.clone());
        write_list(&self.invoices_path, &invoices)?;
        info!(
            id = invoice.id(),
            client = invoice.client(),
            sale_price = invoice.sale_price(),
            "invoice stored"
        );
        Ok(invoice)
    }

    pub fn delete_invoice(&self, id: &str) -> Result<bool, StoreError> {
        let mut invoices = self.list_invoices()?;
        let before = invoices.len();
        invoices.retain(|inv| inv.id() != id);
        write_list(&self.invoices_path, &invoices)?;
        let removed = invoices.len() != before;
        info!(id, removed, "invoice delete");
        Ok(removed)
    }

    pub fn invoices_by_client(&self, client: &str) -> Result<Vec<Invoice>, StoreError> {
        Ok(self
            .list_invoices()?
            .into_iter()
            .filter(|inv| inv.client() == client)
            .collect())
    }
}

fn io_error(path: &Path, source: std::io::Error) -> StoreError {
    StoreError::Io {
        path: path.display().to_string(),
        source,
    }
}

fn read_list<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, StoreError> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let text = fs::read_to_string(path).map_err(|source| io_error(path, source))?;
    if text.trim().is_empty() {
        return Ok(Vec::new());
    }
    let items: Vec<T> = serde_json::from_str(&text).map_err(|source| StoreError::Json {
        path: path.display().to_string(),
        source,
    })?;
    debug!(path = %path.display(), count = items.len(), "loaded records");
    Ok(items)
}

fn write_list<T: Serialize>(path: &Path, items: &[T]) -> Result<(), StoreError> {
    let json = serde_json::to_string_pretty(items).map_err(|source| StoreError::Json {
        path: path.display().to_string(),
        source,
    })?;
    fs::write(path, json).map_err(|source| io_error(path, source))
}
