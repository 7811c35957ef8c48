//! Theft tracking.
//!
//! A transfer that would put someone else's property into player hands is
//! refused by the inventory layer and recorded here. The host game's law
//! systems decide what the report is worth; this module only keeps the
//! ledger and suggests a fine.

use log::warn;

use crate::Id;
use crate::item::Item;
use crate::owner::Owner;

/// One refused attempt to take claimed property.
#[derive(Debug, Clone)]
pub struct TheftReport {
    /// Lowercase id of whoever tried to take it.
    pub offender: Id,
    pub item_id: Id,
    pub item_name: String,
    /// The claim that stopped them.
    pub owner: Owner,
    /// Suggested fine in gold: the stack's cost times the configured
    /// multiplier, rounded up.
    pub fine: u64,
}

/// Ledger of theft attempts for the current session.
#[derive(Debug)]
pub struct CrimeLog {
    fine_multiplier: f32,
    reports: Vec<TheftReport>,
}

impl Default for CrimeLog {
    fn default() -> Self {
        Self::new(2.0)
    }
}

impl CrimeLog {
    pub fn new(fine_multiplier: f32) -> Self {
        Self {
            fine_multiplier,
            reports: Vec::new(),
        }
    }

    /// Record that `offender` tried to take `item` and got caught by its
    /// owner descriptor.
    #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn report_theft(&mut self, offender: &str, item: &Item) {
        let fine = (item.stack_cost() as f64 * f64::from(self.fine_multiplier.max(0.0))).ceil() as u64;
        warn!(
            "{offender} tried to take {} claimed by {}; suggested fine {fine} gold",
            item.name, item.owner
        );
        self.reports.push(TheftReport {
            offender: offender.to_lowercase(),
            item_id: item.id.clone(),
            item_name: item.name.clone(),
            owner: item.owner.clone(),
            fine,
        });
    }

    pub fn reports(&self) -> &[TheftReport] {
        &self.reports
    }

    pub fn is_empty(&self) -> bool {
        self.reports.is_empty()
    }

    /// Hand the batch to the law systems and start fresh.
    pub fn drain(&mut self) -> Vec<TheftReport> {
        std::mem::take(&mut self.reports)
    }
}
