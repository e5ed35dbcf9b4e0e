pub mod combat;
pub mod config;
pub mod error;
pub mod florist;
pub mod logging;
pub mod web;

pub use combat::{Commander, UnitId};
pub use error::{CombatError, ModelError, StoreError};
pub use florist::{Flower, Invoice, JsonRepository, LoyaltyCard, Tier};
