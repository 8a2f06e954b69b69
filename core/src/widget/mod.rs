//! Headless client OTP widget
//!
//! The browser widget is modeled as an explicit event-driven state machine so
//! the entry/verify/resend behavior is testable without a UI harness. Events
//! come in (digits, backspace, timer ticks, network results), commands come
//! out (`WidgetCommand`) for the embedder to execute as network calls. The
//! embedder owns the 1-second interval driving `tick` and drops it when
//! `tick` reports the timer has gone idle.

mod state;

pub use state::{
    OtpWidget, WidgetCommand, WidgetNotice, WidgetState, CELL_COUNT, RESEND_COOLDOWN_SECONDS,
};
