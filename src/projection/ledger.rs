//! Unit/price ledgers composing a policy's value
//!
//! A policy is tracked as three parallel ledgers: the client ledger (price
//! pinned at 1, never compounds), the invested ledger, and the tax-bonus
//! ledger. Value = units × price. Deposits add units at the current price;
//! fees and withdrawals remove units through a single multiplicative factor
//! `(value − amount) / value`, which preserves inter-ledger value ratios
//! and can never drive a unit count negative.

use serde::{Deserialize, Serialize};

/// Division that substitutes zero for a non-positive or non-finite result.
pub fn safe_div(numerator: f64, denominator: f64) -> f64 {
    if denominator <= 0.0 || !denominator.is_finite() {
        return 0.0;
    }
    let q = numerator / denominator;
    if q.is_finite() {
        q
    } else {
        0.0
    }
}

/// Clamp a monetary intermediate to a usable non-negative value.
pub fn clamp_amount(amount: f64) -> f64 {
    if amount.is_finite() && amount > 0.0 {
        amount
    } else {
        0.0
    }
}

/// A single unit/price value tracker.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Ledger {
    units: f64,
    price: f64,
}

impl Ledger {
    /// New empty ledger with unit price 1.
    pub fn new() -> Self {
        Self { units: 0.0, price: 1.0 }
    }

    /// Current value (units × price).
    pub fn value(&self) -> f64 {
        self.units * self.price
    }

    /// Current unit count.
    pub fn units(&self) -> f64 {
        self.units
    }

    /// Current unit price.
    pub fn price(&self) -> f64 {
        self.price
    }

    /// Add units worth `amount` at the current price.
    pub fn deposit(&mut self, amount: f64) {
        let amount = clamp_amount(amount);
        if amount > 0.0 && self.price > 0.0 {
            self.units += amount / self.price;
        }
    }

    /// Remove up to `amount` of value proportionally; returns the amount
    /// actually removed (capped at the available value).
    pub fn deduct(&mut self, amount: f64) -> f64 {
        let value = self.value();
        let taken = clamp_amount(amount).min(value);
        if taken <= 0.0 || value <= 0.0 {
            return 0.0;
        }
        self.units *= (value - taken) / value;
        taken
    }

    /// Compound the unit price by a daily growth factor.
    pub fn compound(&mut self, factor: f64) {
        if factor.is_finite() && factor > 0.0 {
            self.price *= factor;
        }
    }
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new()
    }
}

/// Which ledger a deposit or per-ledger fee targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LedgerKind {
    Client,
    Invested,
    TaxBonus,
}

/// The three-ledger account of one policy.
///
/// All proportional operations live here so the ratio-preservation
/// invariant is enforced at one site rather than at every fee call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub client: Ledger,
    pub invested: Ledger,
    pub tax_bonus: Ledger,
}

impl Account {
    /// New account with three empty ledgers.
    pub fn new() -> Self {
        Self {
            client: Ledger::new(),
            invested: Ledger::new(),
            tax_bonus: Ledger::new(),
        }
    }

    /// Total policy value across the three ledgers.
    pub fn total_value(&self) -> f64 {
        self.client.value() + self.invested.value() + self.tax_bonus.value()
    }

    /// Deposit into one ledger at its current price.
    pub fn deposit(&mut self, kind: LedgerKind, amount: f64) {
        self.ledger_mut(kind).deposit(amount);
    }

    /// Deduct up to `amount` from the whole account, split across ledgers
    /// by current value share. Returns the amount actually deducted.
    pub fn deduct_proportional(&mut self, amount: f64) -> f64 {
        let total = self.total_value();
        let taken = clamp_amount(amount).min(total);
        if taken <= 0.0 || total <= 0.0 {
            return 0.0;
        }
        let mut removed = 0.0;
        for kind in [LedgerKind::Client, LedgerKind::Invested, LedgerKind::TaxBonus] {
            let share = safe_div(self.ledger(kind).value(), total);
            removed += self.ledger_mut(kind).deduct(taken * share);
        }
        removed
    }

    /// Deduct from a single ledger, capped at its value.
    pub fn deduct_from(&mut self, kind: LedgerKind, amount: f64) -> f64 {
        self.ledger_mut(kind).deduct(amount)
    }

    /// Compound the invested and tax-bonus prices. The client ledger's
    /// price stays pinned at 1.
    pub fn compound(&mut self, invested_factor: f64, tax_bonus_factor: f64) {
        self.invested.compound(invested_factor);
        self.tax_bonus.compound(tax_bonus_factor);
    }

    fn ledger(&self, kind: LedgerKind) -> &Ledger {
        match kind {
            LedgerKind::Client => &self.client,
            LedgerKind::Invested => &self.invested,
            LedgerKind::TaxBonus => &self.tax_bonus,
        }
    }

    fn ledger_mut(&mut self, kind: LedgerKind) -> &mut Ledger {
        match kind {
            LedgerKind::Client => &mut self.client,
            LedgerKind::Invested => &mut self.invested,
            LedgerKind::TaxBonus => &mut self.tax_bonus,
        }
    }
}

impl Default for Account {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_deposit_and_value() {
        let mut ledger = Ledger::new();
        ledger.deposit(1000.0);
        assert_relative_eq!(ledger.value(), 1000.0);
        assert_relative_eq!(ledger.units(), 1000.0);

        ledger.compound(1.10);
        assert_relative_eq!(ledger.value(), 1100.0);
        // Deposits after compounding buy fewer units
        ledger.deposit(110.0);
        assert_relative_eq!(ledger.units(), 1100.0);
    }

    #[test]
    fn test_deduct_caps_at_value() {
        let mut ledger = Ledger::new();
        ledger.deposit(100.0);
        assert_relative_eq!(ledger.deduct(250.0), 100.0);
        assert_relative_eq!(ledger.value(), 0.0);
        assert!(ledger.units() >= 0.0);
    }

    #[test]
    fn test_deduct_ignores_negative_and_nan() {
        let mut ledger = Ledger::new();
        ledger.deposit(100.0);
        assert_eq!(ledger.deduct(-5.0), 0.0);
        assert_eq!(ledger.deduct(f64::NAN), 0.0);
        assert_relative_eq!(ledger.value(), 100.0);
    }

    #[test]
    fn test_proportional_deduction_preserves_ratios() {
        let mut account = Account::new();
        account.deposit(LedgerKind::Client, 200.0);
        account.deposit(LedgerKind::Invested, 600.0);
        account.deposit(LedgerKind::TaxBonus, 200.0);

        let before = safe_div(account.client.value(), account.invested.value());
        let taken = account.deduct_proportional(100.0);
        assert_relative_eq!(taken, 100.0, epsilon = 1e-9);
        assert_relative_eq!(account.total_value(), 900.0, epsilon = 1e-9);

        let after = safe_div(account.client.value(), account.invested.value());
        assert_relative_eq!(before, after, epsilon = 1e-12);
    }

    #[test]
    fn test_proportional_deduction_caps_at_total() {
        let mut account = Account::new();
        account.deposit(LedgerKind::Client, 30.0);
        account.deposit(LedgerKind::Invested, 70.0);

        let taken = account.deduct_proportional(1_000.0);
        assert_relative_eq!(taken, 100.0, epsilon = 1e-9);
        assert!(account.total_value().abs() < 1e-9);
        assert!(account.client.units() >= 0.0);
        assert!(account.invested.units() >= 0.0);
    }

    #[test]
    fn test_compound_leaves_client_price_pinned() {
        let mut account = Account::new();
        account.deposit(LedgerKind::Client, 100.0);
        account.deposit(LedgerKind::Invested, 100.0);
        account.compound(1.01, 1.02);

        assert_eq!(account.client.price(), 1.0);
        assert_relative_eq!(account.invested.price(), 1.01);
        assert_relative_eq!(account.tax_bonus.price(), 1.02);
    }

    #[test]
    fn test_safe_div() {
        assert_eq!(safe_div(1.0, 0.0), 0.0);
        assert_eq!(safe_div(1.0, -2.0), 0.0);
        assert_eq!(safe_div(1.0, f64::NAN), 0.0);
        assert_relative_eq!(safe_div(6.0, 3.0), 2.0);
    }
}
