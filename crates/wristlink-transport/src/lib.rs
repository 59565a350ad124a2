//! `wristlink-transport` – the paired-device link.
//!
//! The wrist node and the phone node never talk to each other directly; each
//! holds one end of a [`TransportLink`][link::TransportLink] and exchanges
//! small key-value payloads through it. The link is best-effort: lossy, no
//! acknowledgments, no ordering guarantee across sends.
//!
//! # Modules
//!
//! - [`link`] – the [`TransportLink`][link::TransportLink] trait and the
//!   in-process [`LoopbackLink`][link::LoopbackLink] pair built on Tokio
//!   broadcast channels.
//! - [`sim`] – scripted links for headless tests: a send-failure injector
//!   and a permanently unsupported link.

pub mod link;
pub mod sim;

pub use link::{LoopbackLink, TransportLink};
pub use sim::{FlakyLink, UnsupportedLink};
