//! Application module: the reducer that owns client state.
//!
//! `App` lives in `app::model`, navigation state in `app::nav`, and the
//! message / operation vocabulary in `app::messages`.

mod messages;
mod model;
mod nav;

pub use messages::{Action, Msg, Op, OpKind, PlaybackAction};
pub use model::*;
pub use nav::View;

#[cfg(test)]
mod tests;
