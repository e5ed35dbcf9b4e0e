use std::fmt;

use chrono::NaiveDate;
use serde::Serialize;

use super::Invoice;
use crate::error::ModelError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Tier {
    Bronze,
    Silver,
    Gold,
}

impl Tier {
    pub fn for_total(total: f64) -> Tier {
        if total < 200.0 {
            return Tier::Bronze;
        }
        if total < 500.0 {
            return Tier::Silver;
        }
        if total < 2000.0 {
            return Tier::Gold;
        }
        // No tier above Gold yet.
        Tier::Gold
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Tier::Bronze => "Bronze",
            Tier::Silver => "Silver",
            Tier::Gold => "Gold",
        };
        f.write_str(label)
    }
}

/// Purchase history of one client and the tier it earns.
#[derive(Debug, Clone)]
pub struct LoyaltyCard {
    client: String,
    invoices: Vec<Invoice>,
    tier: Tier,
}

impl LoyaltyCard {
    pub fn new(client: impl Into<String>, invoices: Vec<Invoice>) -> Result<Self, ModelError> {
        let client = client.into();
        if client.trim().is_empty() {
            return Err(ModelError::EmptyField("client"));
        }
        if let Some(other) = invoices.iter().find(|inv| inv.client() != client) {
            return Err(ModelError::ClientMismatch {
                card: client,
                invoice: other.client().to_string(),
            });
        }
        let mut card = Self {
            client,
            invoices,
            tier: Tier::Bronze,
        };
        card.tier = card.compute_tier();
        Ok(card)
    }

    pub fn client(&self) -> &str {
        &self.client
    }

    pub fn invoices(&self) -> &[Invoice] {
        &self.invoices
    }

    pub fn tier(&self) -> Tier {
        self.tier
    }

    pub fn total_spent(&self) -> f64 {
        self.invoices.iter().map(Invoice::sale_price).sum()
    }

    pub fn add_invoice(&mut self, invoice: Invoice) -> Result<(), ModelError> {
        if invoice.client() != self.client {
            return Err(ModelError::ClientMismatch {
                card: self.client.clone(),
                invoice: invoice.client().to_string(),
            });
        }
        self.invoices.push(invoice);
        self.tier = self.compute_tier();
        Ok(())
    }

    pub fn reset(&mut self) {
        self.invoices.clear();
        self.tier = Tier::Bronze;
    }

    /// Invoices sold within `[start, end]`, in insertion order.
    pub fn invoices_between(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<&Invoice>, ModelError> {
        if start > end {
            return Err(ModelError::InvalidRange {
                start: start.to_string(),
                end: end.to_string(),
            });
        }
        Ok(self
            .invoices
            .iter()
            .filter(|inv| (start..=end).contains(&inv.sale_date()))
            .collect())
    }

    fn compute_tier(&self) -> Tier {
        Tier::for_total(self.total_spent())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::florist::Flower;

    fn date(month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, month, day).unwrap()
    }

    fn invoice(client: &str, sale: NaiveDate) -> Invoice {
        let flower = Flower::new("Rose", date(1, 1), "A", 99.99).unwrap();
        Invoice::new(client, sale, vec![flower]).unwrap()
    }

    #[test]
    fn tier_thresholds_both_sides() {
        assert_eq!(Tier::for_total(0.0), Tier::Bronze);
        assert_eq!(Tier::for_total(199.99), Tier::Bronze);
        assert_eq!(Tier::for_total(200.0), Tier::Silver);
        assert_eq!(Tier::for_total(250.0), Tier::Silver);
        assert_eq!(Tier::for_total(499.99), Tier::Silver);
        assert_eq!(Tier::for_total(500.0), Tier::Gold);
        assert_eq!(Tier::for_total(600.0), Tier::Gold);
        assert_eq!(Tier::for_total(1999.99), Tier::Gold);
        assert_eq!(Tier::for_total(2000.0), Tier::Gold);
        assert_eq!(Tier::for_total(10_000.0), Tier::Gold);
    }

    #[test]
    fn construction_checks_owner() {
        assert_eq!(
            LoyaltyCard::new(" ", Vec::new()).unwrap_err(),
            ModelError::EmptyField("client")
        );
        let err = LoyaltyCard::new("Niko", vec![invoice("Other", date(1, 2))]).unwrap_err();
        assert!(matches!(err, ModelError::ClientMismatch { .. }));
    }

    #[test]
    fn construction_computes_tier() {
        let history = vec![invoice("Niko", date(1, 2)), invoice("Niko", date(1, 3))];
        let card = LoyaltyCard::new("Niko", history).unwrap();
        assert_eq!(card.tier(), Tier::Silver);
    }

    #[test]
    fn add_invoice_matches_client() {
        let mut card = LoyaltyCard::new("Niko", Vec::new()).unwrap();
        card.add_invoice(invoice("Niko", date(1, 2))).unwrap();
        assert_eq!(card.invoices().len(), 1);
        assert!(card.add_invoice(invoice("Other", date(1, 2))).is_err());
        assert_eq!(card.invoices().len(), 1);
    }

    #[test]
    fn tier_climbs_with_history() {
        let mut card = LoyaltyCard::new("Niko", Vec::new()).unwrap();
        card.add_invoice(invoice("Niko", date(1, 2))).unwrap();
        assert_eq!(card.tier(), Tier::Bronze);
        card.add_invoice(invoice("Niko", date(1, 3))).unwrap();
        assert_eq!(card.tier(), Tier::Silver);
        for day in 4..7 {
            card.add_invoice(invoice("Niko", date(1, day))).unwrap();
        }
        assert_eq!(card.tier(), Tier::Gold);
    }

    #[test]
    fn reset_clears_history() {
        let mut card = LoyaltyCard::new("Niko", Vec::new()).unwrap();
        for day in 2..6 {
            card.add_invoice(invoice("Niko", date(1, day))).unwrap();
        }
        assert_eq!(card.tier(), Tier::Silver);
        card.reset();
        assert!(card.invoices().is_empty());
        assert_eq!(card.tier(), Tier::Bronze);
        assert_eq!(card.total_spent(), 0.0);
    }

    #[test]
    fn invoices_between_is_inclusive_and_ordered() {
        let mut card = LoyaltyCard::new("Niko", Vec::new()).unwrap();
        let late = invoice("Niko", date(1, 20));
        let early = invoice("Niko", date(1, 2));
        let middle = invoice("Niko", date(1, 10));
        for inv in [late.clone(), early, middle.clone()] {
            card.add_invoice(inv).unwrap();
        }
        let ids: Vec<&str> = card
            .invoices_between(date(1, 10), date(1, 20))
            .unwrap()
            .into_iter()
            .map(Invoice::id)
            .collect();
        assert_eq!(ids, vec![late.id(), middle.id()]);
    }

    #[test]
    fn invoices_between_rejects_inverted_range() {
        let card = LoyaltyCard::new("Niko", Vec::new()).unwrap();
        assert!(matches!(
            card.invoices_between(date(2, 1), date(1, 1)),
            Err(ModelError::InvalidRange { .. })
        ));
    }
}
