use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ModelError;

pub const SALES_TAX_RATE: f64 = 0.20;

fn new_id() -> String {
    Uuid::new_v4().to_string()
}

fn require_non_empty(field: &'static str, value: &str) -> Result<(), ModelError> {
    if value.trim().is_empty() {
        return Err(ModelError::EmptyField(field));
    }
    Ok(())
}

fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn ends_with_99_cents(price: f64) -> bool {
    let cents = (price * 100.0).round() as i64;
    cents % 100 == 99
}

/// A cut flower offered for sale. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "FlowerRecord")]
pub struct Flower {
    id: String,
    species: String,
    cut_date: NaiveDate,
    quality: String,
    price: f64,
}

#[derive(Debug, Deserialize)]
struct FlowerRecord {
    id: Option<String>,
    species: String,
    cut_date: NaiveDate,
    quality: String,
    price: f64,
}

impl TryFrom<FlowerRecord> for Flower {
    type Error = ModelError;

    fn try_from(record: FlowerRecord) -> Result<Self, Self::Error> {
        Flower::with_id(
            record.id.unwrap_or_else(new_id),
            record.species,
            record.cut_date,
            record.quality,
            record.price,
        )
    }
}

impl Flower {
    pub fn new(
        species: impl Into<String>,
        cut_date: NaiveDate,
        quality: impl Into<String>,
        price: f64,
    ) -> Result<Self, ModelError> {
        Self::with_id(new_id(), species, cut_date, quality, price)
    }

    pub fn with_id(
        id: impl Into<String>,
        species: impl Into<String>,
        cut_date: NaiveDate,
        quality: impl Into<String>,
        price: f64,
    ) -> Result<Self, ModelError> {
        let species = species.into();
        let quality = quality.into();
        require_non_empty("species", &species)?;
        require_non_empty("quality", &quality)?;
        if price <= 0.0 || price.is_nan() {
            return Err(ModelError::NonPositivePrice(price));
        }
        if !ends_with_99_cents(price) {
            return Err(ModelError::PriceNotEnding99(price));
        }
        Ok(Self {
            id: id.into(),
            species,
            cut_date,
            quality,
            price,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn species(&self) -> &str {
        &self.species
    }

    pub fn cut_date(&self) -> NaiveDate {
        self.cut_date
    }

    pub fn quality(&self) -> &str {
        &self.quality
    }

    pub fn price(&self) -> f64 {
        self.price
    }
}

/// A sale of one bouquet. `sale_price` includes tax and is fixed at
/// construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "InvoiceRecord")]
pub struct Invoice {
    id: String,
    client: String,
    sale_date: NaiveDate,
    bouquet: Vec<Flower>,
    sale_price: f64,
}

// sale_price on disk is ignored and recomputed.
#[derive(Debug, Deserialize)]
struct InvoiceRecord {
    id: Option<String>,
    client: String,
    sale_date: NaiveDate,
    bouquet: Vec<Flower>,
}

impl TryFrom<InvoiceRecord> for Invoice {
    type Error = ModelError;

    fn try_from(record: InvoiceRecord) -> Result<Self, Self::Error> {
        Invoice::with_id(
            record.id.unwrap_or_else(new_id),
            record.client,
            record.sale_date,
            record.bouquet,
        )
    }
}

impl Invoice {
    pub fn new(
        client: impl Into<String>,
        sale_date: NaiveDate,
        bouquet: Vec<Flower>,
    ) -> Result<Self, ModelError> {
        Self::with_id(new_id(), client, sale_date, bouquet)
    }

    pub fn with_id(
        id: impl Into<String>,
        client: impl Into<String>,
        sale_date: NaiveDate,
        bouquet: Vec<Flower>,
    ) -> Result<Self, ModelError> {
        let client = client.into();
        require_non_empty("client", &client)?;
        if bouquet.is_empty() {
            return Err(ModelError::EmptyBouquet);
        }
        if let Some(flower) = bouquet.iter().find(|f| sale_date < f.cut_date()) {
            return Err(ModelError::SaleBeforeCut {
                sale_date,
                cut_date: flower.cut_date(),
                flower_id: flower.id().to_string(),
            });
        }
        let sale_price = Self::price_with_tax(&bouquet);
        Ok(Self {
            id: id.into(),
            client,
            sale_date,
            bouquet,
            sale_price,
        })
    }

    fn price_with_tax(bouquet: &[Flower]) -> f64 {
        let total: f64 = bouquet.iter().map(Flower::price).sum();
        round_cents(total * (1.0 + SALES_TAX_RATE))
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn client(&self) -> &str {
        &self.client
    }

    pub fn sale_date(&self) -> NaiveDate {
        self.sale_date
    }

    pub fn bouquet(&self) -> &[Flower] {
        &self.bouquet
    }

    pub fn sale_price(&self) -> f64 {
        self.sale_price
    }
}
