//! Screen layouts
//!
//! Coordinates are for a 128x64 panel; `y` is the top of the text.

use obol_core::config::TickerConfig;
use obol_core::{DisplayMode, LinkState, Snapshot};

use crate::canvas::{Align, Canvas, DisplayError, Font, SCREEN_WIDTH};
use crate::format;

const CENTER: i32 = SCREEN_WIDTH / 2;
const RIGHT: i32 = SCREEN_WIDTH;

/// Static text the layouts need from the configuration
#[derive(Debug, Clone, Copy)]
pub struct RenderConfig<'a> {
    pub label: &'a str,
    pub symbol: &'a str,
    pub decimals: u8,
}

impl<'a> From<&'a TickerConfig> for RenderConfig<'a> {
    fn from(config: &'a TickerConfig) -> Self {
        Self {
            label: &config.display.label,
            symbol: &config.quote.symbol,
            decimals: config.quote.decimals,
        }
    }
}

fn link_marker(link: LinkState) -> &'static str {
    match link {
        LinkState::Live => "LIVE",
        LinkState::Connecting => "...",
    }
}

/// Draw the screen for the current mode
pub fn render<C: Canvas + ?Sized>(
    snapshot: &Snapshot,
    config: &RenderConfig<'_>,
    canvas: &mut C,
) -> Result<(), DisplayError> {
    canvas.clear()?;
    match snapshot.mode {
        DisplayMode::Ticker => render_ticker(snapshot, config, canvas),
        DisplayMode::Portfolio => render_portfolio(snapshot, config, canvas),
    }
}

fn render_ticker<C: Canvas + ?Sized>(
    snapshot: &Snapshot,
    config: &RenderConfig<'_>,
    canvas: &mut C,
) -> Result<(), DisplayError> {
    canvas.set_inverted(snapshot.alert_active)?;

    let Some(price) = snapshot.price else {
        canvas.draw_text(CENTER, 8, Font::Medium, Align::Center, config.label)?;
        let status = match snapshot.link {
            LinkState::Live => "Fetching price...",
            LinkState::Connecting => "Connecting...",
        };
        return canvas.draw_text(CENTER, 32, Font::Small, Align::Center, status);
    };

    canvas.draw_text(0, 0, Font::Small, Align::Left, config.label)?;
    canvas.draw_text(RIGHT, 0, Font::Small, Align::Right, link_marker(snapshot.link))?;

    let text = format::price(config.symbol, price, config.decimals);
    canvas.draw_text(CENTER, 18, Font::Large, Align::Center, &text)?;

    // A change needs a baseline and a newer sample
    if snapshot.samples >= 2 {
        let text = format::change(snapshot.percent_change);
        canvas.draw_text(CENTER, 44, Font::Small, Align::Center, &text)?;
    }

    let bid = format::amount(snapshot.best_bid, config.decimals);
    let ask = format::amount(snapshot.best_ask, config.decimals);
    canvas.draw_text(0, 54, Font::Small, Align::Left, &bid)?;
    canvas.draw_text(RIGHT, 54, Font::Small, Align::Right, &ask)
}

fn render_portfolio<C: Canvas + ?Sized>(
    snapshot: &Snapshot,
    config: &RenderConfig<'_>,
    canvas: &mut C,
) -> Result<(), DisplayError> {
    canvas.set_inverted(false)?;
    canvas.draw_text(0, 0, Font::Small, Align::Left, "XRP Portfolio")?;
    canvas.draw_text(RIGHT, 0, Font::Small, Align::Right, link_marker(snapshot.link))?;

    if snapshot.accounts == 0 {
        return canvas.draw_text(CENTER, 28, Font::Small, Align::Center, "No wallets configured");
    }

    if !snapshot.portfolio_complete {
        return canvas.draw_text(CENTER, 28, Font::Small, Align::Center, "Loading...");
    }

    match snapshot.portfolio_total {
        Some(total) if total > 0.0 => {
            let text = format::xrp(total);
            canvas.draw_text(CENTER, 14, Font::Medium, Align::Center, &text)?;

            if let Some(price) = snapshot.price {
                let text = format::fiat(config.symbol, total * price);
                canvas.draw_text(CENTER, 32, Font::Large, Align::Center, &text)?;

                let text = format::at_price(config.symbol, price);
                canvas.draw_text(CENTER, 54, Font::Small, Align::Center, &text)?;
            }
            Ok(())
        }
        Some(_) => canvas.draw_text(CENTER, 28, Font::Small, Align::Center, "No balance"),
        None => canvas.draw_text(CENTER, 28, Font::Small, Align::Center, "Loading..."),
    }
}

/// Boot and connection progress, up to three lines
pub fn render_status<C>(lines: &[&str], canvas: &mut C) -> Result<(), DisplayError>
where
    C: Canvas + ?Sized,
{
    canvas.clear()?;
    canvas.set_inverted(false)?;
    for (i, line) in lines.iter().take(3).enumerate() {
        canvas.draw_text(0, i as i32 * 16, Font::Small, Align::Left, line)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw_list::DrawList;

    const CONFIG: RenderConfig<'static> = RenderConfig {
        label: "XRP/USD",
        symbol: "$",
        decimals: 4,
    };

    fn snapshot() -> Snapshot {
        Snapshot {
            mode: DisplayMode::Ticker,
            link: LinkState::Live,
            price: Some(2.01),
            best_bid: Some(2.00),
            best_ask: Some(2.02),
            samples: 2,
            percent_change: 1.05,
            alert_active: false,
            portfolio_total: None,
            portfolio_complete: false,
            accounts: 3,
        }
    }

    fn draw(snapshot: &Snapshot) -> DrawList {
        let mut list = DrawList::new();
        render(snapshot, &CONFIG, &mut list).unwrap();
        list
    }

    #[test]
    fn test_ticker_layout() {
        let list = draw(&snapshot());

        let price = list.find("$2.0100").unwrap();
        assert_eq!(
            (price.x, price.y, price.font, price.align),
            (64, 18, Font::Large, Align::Center)
        );
        assert_eq!(list.find("LIVE").unwrap().align, Align::Right);
        assert_eq!(list.find("^ 1.050%").unwrap().y, 44);

        let bid = list.find("2.0000").unwrap();
        assert_eq!((bid.x, bid.y, bid.align), (0, 54, Align::Left));
        let ask = list.find("2.0200").unwrap();
        assert_eq!((ask.x, ask.y, ask.align), (128, 54, Align::Right));
        assert!(!list.is_inverted());
    }

    #[test]
    fn test_ticker_inverted_on_alert() {
        let mut snap = snapshot();
        snap.alert_active = true;
        assert!(draw(&snap).is_inverted());
    }

    #[test]
    fn test_change_line_needs_two_samples() {
        let mut snap = snapshot();
        snap.samples = 1;
        let list = draw(&snap);
        assert!(list.ops().iter().all(|op| op.y != 44));

        snap.samples = 5;
        snap.percent_change = 0.0;
        assert!(draw(&snap).find("-- 0.00%").is_some());
    }

    #[test]
    fn test_ticker_stale_marker() {
        let mut snap = snapshot();
        snap.link = LinkState::Connecting;
        let list = draw(&snap);
        assert!(list.find("...").is_some());
        assert!(list.find("$2.0100").is_some());
    }

    #[test]
    fn test_ticker_without_price() {
        let mut snap = snapshot();
        snap.price = None;
        snap.link = LinkState::Connecting;
        let list = draw(&snap);

        assert_eq!(list.find("XRP/USD").unwrap().font, Font::Medium);
        assert!(list.find("Connecting...").is_some());

        snap.link = LinkState::Live;
        assert!(draw(&snap).find("Fetching price...").is_some());
    }

    #[test]
    fn test_portfolio_layout() {
        let mut snap = snapshot();
        snap.mode = DisplayMode::Portfolio;
        snap.alert_active = true;
        snap.portfolio_total = Some(3.0);
        snap.portfolio_complete = true;
        let list = draw(&snap);

        assert!(!list.is_inverted());
        assert!(list.find("XRP Portfolio").is_some());
        assert_eq!(list.find("3.00 XRP").unwrap().y, 14);
        assert_eq!(list.find("$6.03").unwrap().font, Font::Large);
        assert!(list.find("@ $2.0100").is_some());
    }

    #[test]
    fn test_portfolio_states() {
        let mut snap = snapshot();
        snap.mode = DisplayMode::Portfolio;
        assert!(draw(&snap).find("Loading...").is_some());

        snap.portfolio_total = Some(0.0);
        snap.portfolio_complete = true;
        assert!(draw(&snap).find("No balance").is_some());

        snap.accounts = 0;
        assert!(draw(&snap).find("No wallets configured").is_some());
    }

    #[test]
    fn test_portfolio_refresh_in_flight_shows_loading() {
        let mut snap = snapshot();
        snap.mode = DisplayMode::Portfolio;
        snap.portfolio_total = Some(3.0);
        snap.portfolio_complete = false;
        let list = draw(&snap);

        assert!(list.find("Loading...").is_some());
        assert!(list.find("3.00 XRP").is_none());
    }

    #[test]
    fn test_status_screen() {
        let mut list = DrawList::new();
        render_status(&["Obol", "Joining Wi-Fi", "home", "ignored"], &mut list).unwrap();
        assert_eq!(list.ops().len(), 3);
        assert_eq!(list.find("home").unwrap().y, 32);
    }

    #[test]
    fn test_unchanged_state_renders_equal_frames() {
        assert_eq!(draw(&snapshot()), draw(&snapshot()));

        let mut snap = snapshot();
        snap.best_ask = Some(2.03);
        assert_ne!(draw(&snapshot()), draw(&snap));
    }
}
