mod loyalty;
mod model;
mod store;

pub use loyalty::{LoyaltyCard, Tier};
pub use model::{Flower, Invoice, SALES_TAX_RATE};
pub use store::{JsonRepository, FLOWERS_FILE, INVOICES_FILE};
