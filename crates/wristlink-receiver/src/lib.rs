//! `wristlink-receiver` – the phone-side half of the pipeline.
//!
//! Consumes whatever orientation payloads actually arrive from the wrist,
//! smooths the attitude angles, remaps them into the hand model's frame, and
//! pushes the result to the rendering collaborator. Arrival order is applied
//! as-is; there is no reorder buffer, no acknowledgment, and no reaction to
//! gaps — when messages stop, the hand simply holds its last pose.
//!
//! # Modules
//!
//! - [`receiver`] – [`Receiver`][receiver::Receiver]: inbox dispatch,
//!   defensive decode, filter state.
//! - [`render`] – the [`Renderer`][render::Renderer] collaborator trait and
//!   a recording test double.

pub mod receiver;
pub mod render;

pub use receiver::Receiver;
pub use render::{RecordingRenderer, Renderer};
