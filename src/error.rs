use std::io;

use chrono::NaiveDate;
use thiserror::Error;

use crate::combat::UnitId;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CombatError {
    #[error("{operation} amount must not be negative (got {amount})")]
    NegativeAmount { operation: &'static str, amount: i64 },
    #[error("unknown unit {0}")]
    UnknownUnit(UnitId),
    #[error("unit {0} is not a group")]
    NotAGroup(UnitId),
    #[error("unit {member} is not a member of group {group}")]
    NotAMember { group: UnitId, member: UnitId },
    #[error("adding {member} to group {group} would make the group contain itself")]
    Cycle { group: UnitId, member: UnitId },
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ModelError {
    #[error("{0} must be non-empty")]
    EmptyField(&'static str),
    #[error("price must be positive (got {0})")]
    NonPositivePrice(f64),
    #[error("price must end with .99 (got {0:.2})")]
    PriceNotEnding99(f64),
    #[error("bouquet must contain at least one flower")]
    EmptyBouquet,
    #[error("sale date {sale_date} is earlier than cut date {cut_date} of flower {flower_id}")]
    SaleBeforeCut {
        sale_date: NaiveDate,
        cut_date: NaiveDate,
        flower_id: String,
    },
    #[error("invoice client '{invoice}' does not match card owner '{card}'")]
    ClientMismatch { card: String, invoice: String },
    #[error("range start {start} is after range end {end}")]
    InvalidRange { start: String, end: String },
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store io error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error("malformed store file {path}: {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("{kind} id {id} already exists")]
    DuplicateId { kind: &'static str, id: String },
    #[error("invoice contains unknown flower {0}")]
    UnknownFlower(String),
    #[error(transparent)]
    Model(#[from] ModelError),
}

impl StoreError {
    /// Errors caused by the caller's input rather than by the store itself.
    pub fn is_invalid_argument(&self) -> bool {
        matches!(
            self,
            StoreError::DuplicateId { .. } | StoreError::UnknownFlower(_) | StoreError::Model(_)
        )
    }
}
