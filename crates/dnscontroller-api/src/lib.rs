//! Async client for the dnscontroller HTTP API.
//!
//! [`DnsClient`] speaks to the `/api/v1/records` endpoints and returns the
//! same [`Record`](dnscontroller_core::Record) and
//! [`Answer`](dnscontroller_core::Answer) values the server serializes.
//! Non-success responses are decoded from the server's `{message, error}`
//! body into [`Error::Api`].

pub mod client;
pub mod error;

pub use client::DnsClient;
pub use error::Error;
