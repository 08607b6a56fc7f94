//! Ledger server JSON schema
//!
//! Requests are built from borrowed data and serialized with `serde_json`.
//! Responses are decoded into [`Response`], keeping only what the ticker
//! reads: the echoed id, the status, and either the order-book entries or
//! the account data.

use alloc::string::String;
use alloc::vec::Vec;
use serde::{Deserialize, Serialize};

use crate::error::ProtocolError;

/// Native asset code on the ledger
pub const NATIVE_CURRENCY: &str = "XRP";

/// The issued (non-native) side of the traded pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IssuedCurrency<'a> {
    pub currency: &'a str,
    pub issuer: &'a str,
}

#[derive(Serialize)]
struct CurrencySpec<'a> {
    currency: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    issuer: Option<&'a str>,
}

impl<'a> CurrencySpec<'a> {
    fn native() -> Self {
        Self {
            currency: NATIVE_CURRENCY,
            issuer: None,
        }
    }

    fn issued(quote: &IssuedCurrency<'a>) -> Self {
        Self {
            currency: quote.currency,
            issuer: Some(quote.issuer),
        }
    }
}

#[derive(Serialize)]
struct BookOffersRequest<'a> {
    id: u32,
    command: &'static str,
    taker_gets: CurrencySpec<'a>,
    taker_pays: CurrencySpec<'a>,
    limit: u32,
}

#[derive(Serialize)]
struct AccountInfoRequest<'a> {
    id: u32,
    command: &'static str,
    account: &'a str,
    ledger_index: &'static str,
}

/// Best offer selling XRP for the quote currency (taker gets XRP)
pub fn bid_request(id: u32, quote: &IssuedCurrency<'_>) -> Result<String, ProtocolError> {
    let request = BookOffersRequest {
        id,
        command: "book_offers",
        taker_gets: CurrencySpec::native(),
        taker_pays: CurrencySpec::issued(quote),
        limit: 1,
    };
    Ok(serde_json::to_string(&request)?)
}

/// Best offer selling the quote currency for XRP (taker gets the quote currency)
pub fn ask_request(id: u32, quote: &IssuedCurrency<'_>) -> Result<String, ProtocolError> {
    let request = BookOffersRequest {
        id,
        command: "book_offers",
        taker_gets: CurrencySpec::issued(quote),
        taker_pays: CurrencySpec::native(),
        limit: 1,
    };
    Ok(serde_json::to_string(&request)?)
}

/// Balance lookup against the last validated ledger
pub fn account_info_request(id: u32, account: &str) -> Result<String, ProtocolError> {
    let request = AccountInfoRequest {
        id,
        command: "account_info",
        account,
        ledger_index: "validated",
    };
    Ok(serde_json::to_string(&request)?)
}

/// An amount as it appears on the wire
///
/// XRP amounts are bare strings of drops; issued-currency amounts are
/// objects. The shape alone tells the two apart.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum Amount {
    Drops(String),
    Issued(IssuedAmount),
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct IssuedAmount {
    pub currency: String,
    #[serde(default)]
    pub issuer: Option<String>,
    pub value: String,
}

/// Which side of the book an offer quotes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Side {
    Bid,
    Ask,
}

/// Order-book entry, reduced to its two legs
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Offer {
    #[serde(rename = "TakerGets", default)]
    pub taker_gets: Option<Amount>,
    #[serde(rename = "TakerPays", default)]
    pub taker_pays: Option<Amount>,
}

/// Raw amount pair of an offer, classified by shape
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OfferQuote<'a> {
    pub side: Side,
    /// XRP leg, in drops
    pub drops: &'a str,
    /// Quote-currency leg, decimal string
    pub counter: &'a str,
}

impl Offer {
    /// Classify by which leg is the bare drops string
    ///
    /// `None` when both legs have the same shape or one is missing.
    pub fn quote(&self) -> Option<OfferQuote<'_>> {
        match (self.taker_gets.as_ref()?, self.taker_pays.as_ref()?) {
            (Amount::Drops(drops), Amount::Issued(issued)) => Some(OfferQuote {
                side: Side::Bid,
                drops,
                counter: &issued.value,
            }),
            (Amount::Issued(issued), Amount::Drops(drops)) => Some(OfferQuote {
                side: Side::Ask,
                drops,
                counter: &issued.value,
            }),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AccountData {
    #[serde(rename = "Balance", default)]
    pub balance: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Status {
    Success,
    /// `error` or anything else the server reports
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    Offers(Vec<Offer>),
    Account(AccountData),
    Other,
}

/// A decoded server response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub id: u32,
    pub status: Status,
    pub payload: Payload,
}

impl Response {
    pub fn is_success(&self) -> bool {
        self.status == Status::Success
    }

    /// First order-book entry, if this is a non-empty `book_offers` result
    pub fn first_offer(&self) -> Option<&Offer> {
        match &self.payload {
            Payload::Offers(offers) => offers.first(),
            _ => None,
        }
    }

    /// Balance string of an `account_info` result
    pub fn balance(&self) -> Option<&str> {
        match &self.payload {
            Payload::Account(data) => data.balance.as_deref(),
            _ => None,
        }
    }
}

#[derive(Deserialize)]
struct RawResult {
    #[serde(default)]
    offers: Option<Vec<Offer>>,
    #[serde(default)]
    account_data: Option<AccountData>,
}

#[derive(Deserialize)]
struct RawResponse {
    #[serde(default)]
    id: Option<u64>,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    result: Option<RawResult>,
}

/// Decode one text message from the server
pub fn parse_response(text: &str) -> Result<Response, ProtocolError> {
    let raw: RawResponse = serde_json::from_str(text)?;

    let id = raw
        .id
        .and_then(|id| u32::try_from(id).ok())
        .filter(|&id| id != 0)
        .ok_or(ProtocolError::MissingId)?;

    let status = match raw.status.as_deref() {
        Some("success") => Status::Success,
        _ => Status::Failed,
    };

    let payload = match raw.result {
        Some(RawResult {
            offers: Some(offers),
            ..
        }) => Payload::Offers(offers),
        Some(RawResult {
            account_data: Some(data),
            ..
        }) => Payload::Account(data),
        _ => Payload::Other,
    };

    Ok(Response {
        id,
        status,
        payload,
    })
}
