//! Wire decoding for the line-oriented view synchronization protocol spoken
//! between the authoritative core process and this front-end.
//!
//! The core sends compact delta messages describing how the previously
//! rendered view becomes the new view. This crate turns those generic JSON
//! documents into typed values: [`Update`] envelopes holding ordered [`Op`]
//! instructions over [`Line`] records. Applying them to view state lives in
//! `ribbon-view`.

mod envelope;
mod line;
mod ops;
mod plugin;
mod style;

pub use envelope::{
  ProtocolError,
  Update,
};
pub use line::Line;
pub use ops::Op;
pub use plugin::Plugin;
pub use style::{
  StyleSpan,
  decode_style_runs,
};
