//! Backend-agnostic draw commands and the layered compositor for
//! quotecard caption frames.

#![cfg_attr(
    not(test),
    deny(
        clippy::expect_used,
        clippy::unwrap_used,
        clippy::panic,
        clippy::todo,
        clippy::unimplemented
    )
)]

mod compositor;
mod render_ir;

pub use compositor::compose;
pub use render_ir::{
    Anchor, BackgroundCommand, Baseline, CaptionFrame, DrawCommand, RuleCommand, TextCommand,
};
