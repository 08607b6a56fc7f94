//! Portfolio aggregator
//!
//! Sums `account_info` balances over the configured accounts. A refresh
//! cycle is complete once every account has answered, successfully or not.
//! The total is only defined for a complete cycle; a new refresh hides it
//! again until every answer is in.

use crate::quote::DROPS_PER_XRP;

/// Most accounts that can be tracked
pub const MAX_ACCOUNTS: usize = 8;

#[derive(Debug, Clone)]
pub struct Portfolio {
    /// Per-account balance in XRP for the current cycle
    balances: [f64; MAX_ACCOUNTS],
    received: [bool; MAX_ACCOUNTS],
    expected: usize,
    received_count: usize,
    running_total: f64,
    /// Some cycle has completed since boot
    loaded: bool,
    started: bool,
}

impl Default for Portfolio {
    fn default() -> Self {
        Self::new()
    }
}

impl Portfolio {
    pub fn new() -> Self {
        Self {
            balances: [0.0; MAX_ACCOUNTS],
            received: [false; MAX_ACCOUNTS],
            expected: 0,
            received_count: 0,
            running_total: 0.0,
            loaded: false,
            started: false,
        }
    }

    /// Start a cycle over `account_count` accounts
    ///
    /// Returns the number of accounts that will be queried.
    pub fn begin_refresh(&mut self, account_count: usize) -> usize {
        self.expected = account_count.min(MAX_ACCOUNTS);
        self.balances = [0.0; MAX_ACCOUNTS];
        self.received = [false; MAX_ACCOUNTS];
        self.received_count = 0;
        self.running_total = 0.0;
        self.started = true;
        self.complete_if_done();
        self.expected
    }

    /// Account for one balance answer
    ///
    /// Failed lookups and missing or unparseable balances count as received
    /// with a zero balance. Returns false for out-of-range or repeated slots.
    pub fn on_balance_response(
        &mut self,
        index: usize,
        success: bool,
        raw_drops: Option<&str>,
    ) -> bool {
        if index >= self.expected || self.received[index] {
            return false;
        }

        let balance = if success {
            raw_drops
                .and_then(|raw| raw.trim().parse::<f64>().ok())
                .filter(|drops| drops.is_finite() && *drops >= 0.0)
                .map(|drops| drops / DROPS_PER_XRP)
                .unwrap_or(0.0)
        } else {
            0.0
        };

        self.balances[index] = balance;
        self.received[index] = true;
        self.received_count += 1;
        self.running_total += balance;
        self.complete_if_done();
        true
    }

    fn complete_if_done(&mut self) {
        if self.is_complete() {
            self.loaded = true;
        }
    }

    /// Every account of the current cycle has been accounted for
    pub fn is_complete(&self) -> bool {
        self.started && self.received_count >= self.expected
    }

    /// Total of the current cycle, `None` until it is complete
    pub fn total(&self) -> Option<f64> {
        self.is_complete().then_some(self.running_total)
    }

    /// At least one cycle has completed
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Balance of one account in the current cycle, once received
    pub fn balance(&self, index: usize) -> Option<f64> {
        (index < self.expected && self.received[index]).then(|| self.balances[index])
    }

    pub fn received(&self) -> usize {
        self.received_count
    }

    pub fn expected(&self) -> usize {
        self.expected
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_three_accounts_one_failed() {
        let mut portfolio = Portfolio::new();
        assert_eq!(portfolio.begin_refresh(3), 3);

        assert!(portfolio.on_balance_response(0, true, Some("1000000")));
        assert!(!portfolio.is_complete());
        assert!(portfolio.on_balance_response(2, true, Some("2000000")));
        assert!(portfolio.on_balance_response(1, false, None));

        assert!(portfolio.is_complete());
        assert_eq!(portfolio.total(), Some(3.0));
        assert_eq!(portfolio.balance(1), Some(0.0));
    }

    #[test]
    fn test_total_unset_before_completion() {
        let mut portfolio = Portfolio::new();
        portfolio.begin_refresh(2);
        portfolio.on_balance_response(0, true, Some("5000000"));

        assert_eq!(portfolio.total(), None);
        assert!(!portfolio.is_loaded());
    }

    #[test]
    fn test_missing_balance_counts_as_zero() {
        let mut portfolio = Portfolio::new();
        portfolio.begin_refresh(1);
        portfolio.on_balance_response(0, true, None);

        assert!(portfolio.is_complete());
        assert_eq!(portfolio.total(), Some(0.0));
    }

    #[test]
    fn test_duplicate_and_out_of_range_ignored() {
        let mut portfolio = Portfolio::new();
        portfolio.begin_refresh(2);

        assert!(portfolio.on_balance_response(0, true, Some("1000000")));
        assert!(!portfolio.on_balance_response(0, true, Some("9000000")));
        assert!(!portfolio.on_balance_response(5, true, Some("1000000")));
        assert_eq!(portfolio.received(), 1);
    }

    #[test]
    fn test_second_cycle_hides_total_until_complete() {
        let mut portfolio = Portfolio::new();
        portfolio.begin_refresh(1);
        portfolio.on_balance_response(0, true, Some("1500000"));
        assert_eq!(portfolio.total(), Some(1.5));

        portfolio.begin_refresh(1);
        assert!(!portfolio.is_complete());
        assert!(portfolio.is_loaded());
        assert_eq!(portfolio.balance(0), None);
        assert_eq!(portfolio.total(), None);

        portfolio.on_balance_response(0, true, Some("2500000"));
        assert_eq!(portfolio.total(), Some(2.5));
    }

    #[test]
    fn test_no_accounts_completes_immediately() {
        let mut portfolio = Portfolio::new();
        assert!(!portfolio.is_complete());
        assert_eq!(portfolio.begin_refresh(0), 0);
        assert!(portfolio.is_complete());
        assert_eq!(portfolio.total(), Some(0.0));
    }
}
