//! Quote aggregator
//!
//! Turns the first offer of each `book_offers` answer into a best bid or
//! best ask and keeps a mid-price derived from them. Bad input never touches
//! the last known good values.

use obol_protocol::ledger::{OfferQuote, Side};

/// Drops in one XRP
pub const DROPS_PER_XRP: f64 = 1_000_000.0;

/// Prices at or above this are treated as corrupt
pub const PRICE_CEILING: f64 = 10_000.0;

/// Finite, positive and below the ceiling
pub fn is_plausible(price: f64) -> bool {
    price.is_finite() && price > 0.0 && price < PRICE_CEILING
}

/// Parse a decimal amount string, keeping only finite positive values
pub fn parse_positive(raw: &str) -> Option<f64> {
    let value: f64 = raw.trim().parse().ok()?;
    (value.is_finite() && value > 0.0).then_some(value)
}

/// Quote-currency units per XRP for one offer
fn offer_price(raw_drops: &str, raw_counter: &str) -> Option<f64> {
    let xrp = parse_positive(raw_drops)? / DROPS_PER_XRP;
    let counter = parse_positive(raw_counter)?;
    let price = counter / xrp;
    price.is_finite().then_some(price)
}

/// Current best bid / best ask / mid
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct QuoteBook {
    best_bid: Option<f64>,
    best_ask: Option<f64>,
    mid: Option<f64>,
}

impl QuoteBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Offer where the taker gets XRP (`raw_drops`) and pays the quote currency
    ///
    /// Returns false when either leg is missing or not positive.
    pub fn on_bid_response(&mut self, raw_drops: &str, raw_counter: &str) -> bool {
        match offer_price(raw_drops, raw_counter) {
            Some(price) => {
                self.best_bid = Some(price);
                self.update_mid();
                true
            }
            None => false,
        }
    }

    /// Offer where the taker gets the quote currency and pays XRP (`raw_drops`)
    pub fn on_ask_response(&mut self, raw_counter: &str, raw_drops: &str) -> bool {
        match offer_price(raw_drops, raw_counter) {
            Some(price) => {
                self.best_ask = Some(price);
                self.update_mid();
                true
            }
            None => false,
        }
    }

    /// Apply an offer classified by the shape of its legs
    pub fn apply_offer(&mut self, quote: &OfferQuote<'_>) -> bool {
        match quote.side {
            Side::Bid => self.on_bid_response(quote.drops, quote.counter),
            Side::Ask => self.on_ask_response(quote.counter, quote.drops),
        }
    }

    fn update_mid(&mut self) {
        let bid = self.best_bid.filter(|p| is_plausible(*p));
        let ask = self.best_ask.filter(|p| is_plausible(*p));

        match (bid, ask) {
            (Some(bid), Some(ask)) => self.mid = Some((bid + ask) / 2.0),
            (Some(one), None) | (None, Some(one)) => self.mid = Some(one),
            // Keep the previous mid
            (None, None) => {}
        }
    }

    pub fn best_bid(&self) -> Option<f64> {
        self.best_bid
    }

    pub fn best_ask(&self) -> Option<f64> {
        self.best_ask
    }

    /// Mid-price, the value shown as "the price"
    pub fn mid(&self) -> Option<f64> {
        self.mid
    }
}
