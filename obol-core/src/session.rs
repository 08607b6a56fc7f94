//! Ticker session and tick scheduler
//!
//! One [`Session`] owns every piece of ticker state. The firmware calls
//! [`Session::tick`] periodically; each tick runs, in order:
//!
//! 1. button sampling (debounced mode toggle)
//! 2. draining every buffered transport event and message
//! 3. time triggers: price query, sample recording, portfolio refresh
//! 4. the alert timeout
//!
//! Nothing here blocks on the network. Requests go out through a
//! [`RequestSink`] and their answers are matched by id on a later tick.

use alloc::string::String;

use obol_protocol::ledger::{self, IssuedCurrency, Offer, Side};
use obol_protocol::ProtocolError;

use crate::alert::{AlertEvent, AlertLatch};
use crate::config::TickerConfig;
use crate::correlator::{Correlator, RequestRole};
use crate::history::PriceHistory;
use crate::input::Debouncer;
use crate::portfolio::Portfolio;
use crate::quote::QuoteBook;
use crate::state::{DisplayMode, LinkState};
use crate::traits::{Inbound, Inbox, RequestSink};

/// Periodic trigger against a millisecond clock
///
/// An interval that has never fired is due immediately.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interval {
    period_ms: u64,
    last_ms: Option<u64>,
}

impl Interval {
    pub const fn new(period_ms: u64) -> Self {
        Self {
            period_ms,
            last_ms: None,
        }
    }

    pub fn is_due(&self, now_ms: u64) -> bool {
        match self.last_ms {
            None => true,
            Some(last) => now_ms.saturating_sub(last) >= self.period_ms,
        }
    }

    pub fn mark(&mut self, now_ms: u64) {
        self.last_ms = Some(now_ms);
    }

    /// Make the next check due immediately
    pub fn reset(&mut self) {
        self.last_ms = None;
    }

    /// `is_due` + `mark`
    pub fn poll(&mut self, now_ms: u64) -> bool {
        let due = self.is_due(now_ms);
        if due {
            self.mark(now_ms);
        }
        due
    }
}

/// Transport open/close
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LinkEvent {
    Opened,
    Closed,
}

/// What happened to one inbound message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MessageOutcome {
    /// Not JSON, or not a response we understand
    Malformed,
    /// Id not pending (stale, duplicate or never issued)
    Unmatched(u32),
    /// Server reported a non-success status
    Rejected(RequestRole),
    /// Best bid or ask updated
    Quote(Side),
    /// Balance accounted for
    Balance(u8),
    /// Matched, but nothing usable in it (no id, empty book, bad amounts)
    Ignored,
}

/// Summary of one tick, for logging
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TickReport {
    pub mode_changed: bool,
    pub link: Option<LinkEvent>,
    pub messages: u16,
    pub malformed: u16,
    pub unmatched: u16,
    pub rejected: u16,
    pub last_unmatched: Option<u32>,
    pub requests_sent: u16,
    pub send_failures: u16,
    pub sample_recorded: bool,
    pub alert: Option<AlertEvent>,
    /// Anything the screen shows may have changed
    pub changed: bool,
}

impl TickReport {
    fn note(&mut self, outcome: MessageOutcome) {
        self.messages = self.messages.saturating_add(1);
        match outcome {
            MessageOutcome::Malformed => self.malformed = self.malformed.saturating_add(1),
            MessageOutcome::Unmatched(id) => {
                self.unmatched = self.unmatched.saturating_add(1);
                self.last_unmatched = Some(id);
            }
            MessageOutcome::Rejected(role) => {
                self.rejected = self.rejected.saturating_add(1);
                if matches!(role, RequestRole::BalanceQuery(_)) {
                    self.changed = true;
                }
            }
            MessageOutcome::Quote(_) | MessageOutcome::Balance(_) => self.changed = true,
            MessageOutcome::Ignored => {}
        }
    }
}

/// Everything the renderer needs, by value
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Snapshot {
    pub mode: DisplayMode,
    pub link: LinkState,
    pub price: Option<f64>,
    pub best_bid: Option<f64>,
    pub best_ask: Option<f64>,
    /// Retained history samples
    pub samples: usize,
    pub percent_change: f64,
    pub alert_active: bool,
    pub portfolio_total: Option<f64>,
    pub portfolio_complete: bool,
    pub accounts: usize,
}

/// The single ticker session
pub struct Session<'a> {
    config: &'a TickerConfig,
    correlator: Correlator,
    quotes: QuoteBook,
    history: PriceHistory,
    alert: AlertLatch,
    portfolio: Portfolio,
    debouncer: Debouncer,
    mode: DisplayMode,
    link: LinkState,
    price_timer: Interval,
    sample_timer: Interval,
    portfolio_timer: Interval,
}

impl<'a> Session<'a> {
    pub fn new(config: &'a TickerConfig) -> Self {
        let polling = &config.polling;
        Self {
            config,
            correlator: Correlator::new(),
            quotes: QuoteBook::new(),
            history: PriceHistory::new(),
            alert: AlertLatch::new(config.alert.threshold_percent, config.alert.flash_ms as u64),
            portfolio: Portfolio::new(),
            debouncer: Debouncer::default(),
            mode: DisplayMode::Ticker,
            link: LinkState::Connecting,
            price_timer: Interval::new(polling.price_interval_ms as u64),
            sample_timer: Interval::new(polling.sample_interval_ms as u64),
            portfolio_timer: Interval::new(polling.portfolio_interval_ms as u64),
        }
    }

    /// Run one scheduler tick
    pub fn tick<I, S>(
        &mut self,
        now_ms: u64,
        button_pressed: bool,
        inbox: &mut I,
        outbox: &mut S,
    ) -> TickReport
    where
        I: Inbox + ?Sized,
        S: RequestSink + ?Sized,
    {
        let mut report = TickReport::default();

        if self.debouncer.update(button_pressed, now_ms).is_some() {
            self.toggle_mode(now_ms, outbox, &mut report);
        }

        while let Some(item) = inbox.try_next() {
            match item {
                Inbound::Opened => {
                    self.on_link_event(LinkEvent::Opened);
                    report.link = Some(LinkEvent::Opened);
                    report.changed = true;
                }
                Inbound::Closed => {
                    self.on_link_event(LinkEvent::Closed);
                    report.link = Some(LinkEvent::Closed);
                    report.changed = true;
                }
                Inbound::Message(text) => {
                    let outcome = self.on_message(&text);
                    report.note(outcome);
                }
            }
        }

        self.run_timers(now_ms, outbox, &mut report);

        if let Some(event) = self.alert.expire(now_ms) {
            report.alert = Some(event);
            report.changed = true;
        }

        report
    }

    /// Transport opened or closed
    ///
    /// On open the price query (and the portfolio refresh, in portfolio
    /// mode) become due at once. On close every pending id is abandoned;
    /// the values on screen stay.
    pub fn on_link_event(&mut self, event: LinkEvent) {
        match event {
            LinkEvent::Opened => {
                self.link = LinkState::Live;
                self.price_timer.reset();
                self.portfolio_timer.reset();
            }
            LinkEvent::Closed => {
                self.link = LinkState::Connecting;
                self.correlator.abandon_all();
            }
        }
    }

    /// Classify one inbound text message and apply it
    pub fn on_message(&mut self, text: &str) -> MessageOutcome {
        let response = match ledger::parse_response(text) {
            Ok(response) => response,
            Err(ProtocolError::MissingId) => return MessageOutcome::Ignored,
            Err(_) => return MessageOutcome::Malformed,
        };

        let Some(role) = self.correlator.resolve(response.id) else {
            return MessageOutcome::Unmatched(response.id);
        };

        match role {
            RequestRole::BalanceQuery(index) => {
                // A failed lookup still completes its slot
                self.portfolio.on_balance_response(
                    index as usize,
                    response.is_success(),
                    response.balance(),
                );
                if response.is_success() {
                    MessageOutcome::Balance(index)
                } else {
                    MessageOutcome::Rejected(role)
                }
            }
            RequestRole::BidQuery | RequestRole::AskQuery => {
                if !response.is_success() {
                    return MessageOutcome::Rejected(role);
                }
                // The shape of the offer decides the side, not the role
                match response.first_offer().and_then(Offer::quote) {
                    Some(quote) if self.quotes.apply_offer(&quote) => {
                        MessageOutcome::Quote(quote.side)
                    }
                    _ => MessageOutcome::Ignored,
                }
            }
        }
    }

    fn toggle_mode<S>(&mut self, now_ms: u64, outbox: &mut S, report: &mut TickReport)
    where
        S: RequestSink + ?Sized,
    {
        self.mode = self.mode.toggle();
        report.mode_changed = true;
        report.changed = true;

        let needs_data = !self.portfolio.is_loaded() && self.link.is_live();
        if self.mode == DisplayMode::Portfolio && needs_data {
            self.refresh_portfolio(now_ms, outbox, report);
        }
    }

    fn run_timers<S>(&mut self, now_ms: u64, outbox: &mut S, report: &mut TickReport)
    where
        S: RequestSink + ?Sized,
    {
        if !self.link.is_live() {
            return;
        }

        if self.price_timer.poll(now_ms) {
            self.send_request(RequestRole::BidQuery, outbox, report);
            self.send_request(RequestRole::AskQuery, outbox, report);
        }

        if let Some(price) = self.quotes.mid() {
            if self.sample_timer.poll(now_ms) {
                if self.history.record(price, now_ms) {
                    report.sample_recorded = true;
                    report.changed = true;
                }
                if let Some(event) = self.alert.check(price, self.history.oldest(), now_ms) {
                    report.alert = Some(event);
                    report.changed = true;
                }
            }
        }

        if self.mode == DisplayMode::Portfolio && self.portfolio_timer.is_due(now_ms) {
            self.refresh_portfolio(now_ms, outbox, report);
        }
    }

    fn refresh_portfolio<S>(&mut self, now_ms: u64, outbox: &mut S, report: &mut TickReport)
    where
        S: RequestSink + ?Sized,
    {
        self.portfolio_timer.mark(now_ms);
        let count = self.portfolio.begin_refresh(self.config.portfolio.accounts.len());
        for index in 0..count {
            self.send_request(RequestRole::BalanceQuery(index as u8), outbox, report);
        }
        report.changed = true;
    }

    fn send_request<S>(&mut self, role: RequestRole, outbox: &mut S, report: &mut TickReport)
    where
        S: RequestSink + ?Sized,
    {
        let Ok(id) = self.correlator.issue(role) else {
            report.send_failures = report.send_failures.saturating_add(1);
            return;
        };

        let sent = self
            .build_request(id, role)
            .map(|text| outbox.send(&text).is_ok())
            .unwrap_or(false);

        if sent {
            report.requests_sent = report.requests_sent.saturating_add(1);
        } else {
            // Nothing will answer this id
            self.correlator.resolve(id);
            report.send_failures = report.send_failures.saturating_add(1);
        }
    }

    fn build_request(&self, id: u32, role: RequestRole) -> Option<String> {
        let quote = IssuedCurrency {
            currency: &self.config.quote.currency,
            issuer: &self.config.quote.issuer,
        };
        let text = match role {
            RequestRole::BidQuery => ledger::bid_request(id, &quote),
            RequestRole::AskQuery => ledger::ask_request(id, &quote),
            RequestRole::BalanceQuery(index) => {
                let account = self.config.portfolio.accounts.get(index as usize)?;
                ledger::account_info_request(id, account)
            }
        };
        text.ok()
    }

    /// Copy of the state the renderer reads
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            mode: self.mode,
            link: self.link,
            price: self.quotes.mid(),
            best_bid: self.quotes.best_bid(),
            best_ask: self.quotes.best_ask(),
            samples: self.history.len(),
            percent_change: self.alert.percent_change(),
            alert_active: self.alert.is_active(),
            portfolio_total: self.portfolio.total(),
            portfolio_complete: self.portfolio.is_complete(),
            accounts: self.config.portfolio.accounts.len(),
        }
    }

    pub fn mode(&self) -> DisplayMode {
        self.mode
    }

    pub fn link(&self) -> LinkState {
        self.link
    }

    pub fn quotes(&self) -> &QuoteBook {
        &self.quotes
    }

    pub fn history(&self) -> &PriceHistory {
        &self.history
    }

    pub fn alert(&self) -> &AlertLatch {
        &self.alert
    }

    pub fn portfolio(&self) -> &Portfolio {
        &self.portfolio
    }

    pub fn correlator(&self) -> &Correlator {
        &self.correlator
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::LinkError;
    use alloc::collections::VecDeque;
    use alloc::format;
    use alloc::vec::Vec;

    const ACCOUNTS: [&str; 3] = [
        "rN7n7otQDd6FczFgLdSqtcsAUxDkw6fzRH",
        "rPT1Sjq2YGrBMTttX4GZHjKu9dyfzbpAYe",
        "rHb9CJAWyB4rj91VRWn96DkukG4bwdtyTh",
    ];

    fn test_config() -> TickerConfig {
        let mut config = TickerConfig::new();
        config.polling.price_interval_ms = 5_000;
        config.polling.sample_interval_ms = 5_000;
        config.alert.threshold_percent = 1.0;
        config.alert.flash_ms = 10_000;
        for account in ACCOUNTS {
            config
                .portfolio
                .accounts
                .push(heapless::String::try_from(account).unwrap())
                .unwrap();
        }
        config
    }

    fn bid_reply(id: u32, drops: &str, value: &str) -> Inbound {
        Inbound::Message(format!(
            r#"{{"id":{},"status":"success","result":{{"offers":[{{"TakerGets":"{}","TakerPays":{{"currency":"USD","issuer":"rI","value":"{}"}}}}]}}}}"#,
            id, drops, value
        ))
    }

    fn ask_reply(id: u32, value: &str, drops: &str) -> Inbound {
        Inbound::Message(format!(
            r#"{{"id":{},"status":"success","result":{{"offers":[{{"TakerGets":{{"currency":"USD","issuer":"rI","value":"{}"}},"TakerPays":"{}"}}]}}}}"#,
            id, value, drops
        ))
    }

    fn balance_reply(id: u32, drops: &str) -> Inbound {
        Inbound::Message(format!(
            r#"{{"id":{},"status":"success","result":{{"account_data":{{"Balance":"{}"}}}}}}"#,
            id, drops
        ))
    }

    fn error_reply(id: u32) -> Inbound {
        Inbound::Message(format!(r#"{{"id":{},"status":"error","error":"actNotFound"}}"#, id))
    }

    struct Harness<'a> {
        session: Session<'a>,
        inbox: VecDeque<Inbound>,
        outbox: Vec<String>,
    }

    impl<'a> Harness<'a> {
        fn new(config: &'a TickerConfig) -> Self {
            Self {
                session: Session::new(config),
                inbox: VecDeque::new(),
                outbox: Vec::new(),
            }
        }

        fn tick(&mut self, now_ms: u64, items: impl IntoIterator<Item = Inbound>) -> TickReport {
            self.inbox.extend(items);
            self.session.tick(now_ms, false, &mut self.inbox, &mut self.outbox)
        }

        fn press(&mut self, now_ms: u64) -> TickReport {
            self.session.tick(now_ms, true, &mut self.inbox, &mut self.outbox);
            let report = self
                .session
                .tick(now_ms + 50, true, &mut self.inbox, &mut self.outbox);
            self.session
                .tick(now_ms + 100, false, &mut self.inbox, &mut self.outbox);
            report
        }

        fn pending(&self, role: RequestRole) -> u32 {
            self.session.correlator().pending_id(role).unwrap()
        }
    }

    fn approx(a: Option<f64>, b: f64) -> bool {
        a.map(|a| (a - b).abs() < 1e-9).unwrap_or(false)
    }

    #[test]
    fn test_no_requests_before_open() {
        let config = test_config();
        let mut h = Harness::new(&config);

        let report = h.tick(0, []);
        assert_eq!(report.requests_sent, 0);
        assert!(h.outbox.is_empty());
        assert_eq!(h.session.link(), LinkState::Connecting);
    }

    #[test]
    fn test_open_requests_prices_and_applies_quotes() {
        let config = test_config();
        let mut h = Harness::new(&config);

        let report = h.tick(0, [Inbound::Opened]);
        assert_eq!(report.link, Some(LinkEvent::Opened));
        assert_eq!(report.requests_sent, 2);
        assert!(h.outbox[0].contains("\"book_offers\""));

        let bid = h.pending(RequestRole::BidQuery);
        let ask = h.pending(RequestRole::AskQuery);
        assert_eq!((bid, ask), (1, 2));

        // Ask answers first
        let report = h.tick(
            50,
            [ask_reply(ask, "2.02", "1000000"), bid_reply(bid, "1000000", "2.00")],
        );
        assert_eq!(report.messages, 2);
        assert!(report.changed);

        let snapshot = h.session.snapshot();
        assert!(approx(snapshot.best_bid, 2.00));
        assert!(approx(snapshot.best_ask, 2.02));
        assert!(approx(snapshot.price, 2.01));
    }

    #[test]
    fn test_stale_and_unknown_ids_ignored() {
        let config = test_config();
        let mut h = Harness::new(&config);
        h.tick(0, [Inbound::Opened]);
        let stale_bid = h.pending(RequestRole::BidQuery);

        // Next round supersedes the unanswered one
        h.tick(5_000, []);
        assert_ne!(h.pending(RequestRole::BidQuery), stale_bid);

        let report = h.tick(
            5_050,
            [bid_reply(stale_bid, "1000000", "9.00"), bid_reply(999, "1000000", "9.00")],
        );
        assert_eq!(report.unmatched, 2);
        assert_eq!(report.last_unmatched, Some(999));
        assert_eq!(h.session.quotes().mid(), None);
    }

    #[test]
    fn test_rejected_and_malformed_keep_last_price() {
        let config = test_config();
        let mut h = Harness::new(&config);
        h.tick(0, [Inbound::Opened]);
        let bid = h.pending(RequestRole::BidQuery);
        h.tick(10, [bid_reply(bid, "1000000", "2.00")]);

        h.tick(5_000, []);
        let bid = h.pending(RequestRole::BidQuery);
        let ask = h.pending(RequestRole::AskQuery);
        let report = h.tick(
            5_010,
            [
                error_reply(bid),
                ask_reply(ask, "0", "1000000"),
                Inbound::Message(String::from("{garbage")),
            ],
        );

        assert_eq!(report.rejected, 1);
        assert_eq!(report.malformed, 1);
        assert!(approx(h.session.quotes().mid(), 2.00));
    }

    #[test]
    fn test_offer_shape_overrides_role() {
        let config = test_config();
        let mut h = Harness::new(&config);
        h.tick(0, [Inbound::Opened]);
        let bid = h.pending(RequestRole::BidQuery);

        // Ask-shaped offer answering the bid query
        let Inbound::Message(text) = ask_reply(bid, "2.02", "1000000") else {
            unreachable!()
        };
        assert_eq!(h.session.on_message(&text), MessageOutcome::Quote(Side::Ask));
        assert!(approx(h.session.quotes().best_ask(), 2.02));
        assert_eq!(h.session.quotes().best_bid(), None);
    }

    #[test]
    fn test_close_abandons_pending_and_keeps_values() {
        let config = test_config();
        let mut h = Harness::new(&config);
        h.tick(0, [Inbound::Opened]);
        let bid = h.pending(RequestRole::BidQuery);
        h.tick(10, [bid_reply(bid, "1000000", "2.00")]);

        h.tick(5_000, []);
        let ask = h.pending(RequestRole::AskQuery);
        let sent = h.outbox.len();

        let report = h.tick(5_010, [Inbound::Closed, ask_reply(ask, "3.00", "1000000")]);
        assert_eq!(report.link, Some(LinkEvent::Closed));
        assert_eq!(report.unmatched, 1);
        assert_eq!(h.session.correlator().pending_count(), 0);

        // No traffic while the link is down
        h.tick(20_000, []);
        assert_eq!(h.outbox.len(), sent);

        let snapshot = h.session.snapshot();
        assert_eq!(snapshot.link, LinkState::Connecting);
        assert!(approx(snapshot.price, 2.00));

        // Reopening queries at once
        let report = h.tick(20_050, [Inbound::Opened]);
        assert_eq!(report.requests_sent, 2);
    }

    #[test]
    fn test_portfolio_refresh_on_toggle() {
        let config = test_config();
        let mut h = Harness::new(&config);
        h.tick(0, [Inbound::Opened]);
        let before = h.outbox.len();

        let report = h.press(100);
        assert!(report.mode_changed);
        assert_eq!(h.session.mode(), DisplayMode::Portfolio);
        assert_eq!(h.outbox.len(), before + 3);
        assert!(h.outbox[before].contains("\"account_info\""));
        assert!(h.outbox[before].contains(ACCOUNTS[0]));

        let ids: Vec<u32> = (0..3).map(|i| h.pending(RequestRole::BalanceQuery(i))).collect();
        h.tick(300, [balance_reply(ids[0], "1000000"), balance_reply(ids[2], "2000000")]);
        assert!(!h.session.portfolio().is_complete());
        assert_eq!(h.session.snapshot().portfolio_total, None);

        h.tick(350, [error_reply(ids[1])]);
        let snapshot = h.session.snapshot();
        assert!(snapshot.portfolio_complete);
        assert_eq!(snapshot.portfolio_total, Some(3.0));
        assert_eq!(snapshot.accounts, 3);
    }

    #[test]
    fn test_second_portfolio_cycle_reports_no_total_until_complete() {
        let mut config = test_config();
        config.portfolio.accounts.truncate(1);
        let mut h = Harness::new(&config);
        h.tick(0, [Inbound::Opened]);

        h.press(100);
        let id = h.pending(RequestRole::BalanceQuery(0));
        h.tick(300, [balance_reply(id, "3000000")]);
        assert_eq!(h.session.snapshot().portfolio_total, Some(3.0));

        // Periodic refresh starts a new cycle
        h.tick(30_300, []);
        let snapshot = h.session.snapshot();
        assert!(!snapshot.portfolio_complete);
        assert_eq!(snapshot.portfolio_total, None);

        let id = h.pending(RequestRole::BalanceQuery(0));
        h.tick(30_400, [balance_reply(id, "4000000")]);
        let snapshot = h.session.snapshot();
        assert!(snapshot.portfolio_complete);
        assert_eq!(snapshot.portfolio_total, Some(4.0));
    }

    #[test]
    fn test_portfolio_periodic_refresh_only_in_portfolio_mode() {
        let config = test_config();
        let mut h = Harness::new(&config);
        h.tick(0, [Inbound::Opened]);
        h.tick(40_000, []);
        assert!(h.outbox.iter().all(|r| !r.contains("account_info")));

        h.press(40_100);
        let count = |h: &Harness| h.outbox.iter().filter(|r| r.contains("account_info")).count();
        assert_eq!(count(&h), 3);

        h.tick(50_000, []);
        assert_eq!(count(&h), 3);
        h.tick(70_200, []);
        assert_eq!(count(&h), 6);
    }

    #[test]
    fn test_alert_scenario() {
        let config = test_config();
        let mut h = Harness::new(&config);
        h.tick(0, [Inbound::Opened]);

        let (bid, ask) = (h.pending(RequestRole::BidQuery), h.pending(RequestRole::AskQuery));
        let report = h.tick(
            50,
            [bid_reply(bid, "1000000", "2.000"), ask_reply(ask, "2.000", "1000000")],
        );
        assert!(report.sample_recorded);

        h.tick(5_000, []);
        let (bid, ask) = (h.pending(RequestRole::BidQuery), h.pending(RequestRole::AskQuery));
        h.tick(
            5_010,
            [bid_reply(bid, "1000000", "2.021"), ask_reply(ask, "2.021", "1000000")],
        );

        let report = h.tick(5_050, []);
        assert_eq!(report.alert, Some(AlertEvent::Raised));
        let snapshot = h.session.snapshot();
        assert!(snapshot.alert_active);
        assert!((snapshot.percent_change - 1.05).abs() < 1e-6);

        // Price stays put; the flash ends on time alone
        assert!(h.session.snapshot().alert_active);
        h.tick(15_049, []);
        assert!(h.session.snapshot().alert_active);
        let report = h.tick(15_050, []);
        assert_eq!(report.alert, Some(AlertEvent::Cleared));
        assert!(!h.session.snapshot().alert_active);
    }

    struct FailingSink;

    impl RequestSink for FailingSink {
        fn send(&mut self, _text: &str) -> Result<(), LinkError> {
            Err(LinkError::QueueFull)
        }
    }

    #[test]
    fn test_failed_send_abandons_id() {
        let config = test_config();
        let mut session = Session::new(&config);
        let mut inbox = VecDeque::from([Inbound::Opened]);

        let report = session.tick(0, false, &mut inbox, &mut FailingSink);
        assert_eq!(report.send_failures, 2);
        assert_eq!(session.correlator().pending_count(), 0);
    }

    #[test]
    fn test_interval() {
        let mut interval = Interval::new(1_000);
        assert!(interval.poll(0));
        assert!(!interval.poll(999));
        assert!(interval.poll(1_000));
        interval.reset();
        assert!(interval.is_due(1_001));
    }
}
