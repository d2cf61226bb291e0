//! Caret behaviour around attribute boundaries.

pub mod two_step;

pub use two_step::{CaretDirection, CaretMove, CaretState, TwoStepCaretMovement};
