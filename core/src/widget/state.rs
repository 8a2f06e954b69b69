//! OTP widget state machine

use crate::domain::entities::otp_record::{MAX_ATTEMPTS, MAX_RESENDS};

/// Number of single-character input cells
pub const CELL_COUNT: usize = 6;

/// Client-side cooldown between resend requests, in seconds
///
/// Re-armed on every successful resend. This is UI state, independent of the
/// server-side rate limiting.
pub const RESEND_COOLDOWN_SECONDS: u32 = 180;

/// Primary widget states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WidgetState {
    /// Not shown; no events are processed
    Hidden,
    /// Visible and accepting digits
    Entering,
    /// A verify call is in flight; entry controls are disabled
    Verifying,
    /// Terminal: the contact point was verified and the widget may close
    Verified,
    /// Terminal for entry: attempt quota used up, input and submission
    /// disabled (a resend within quota still revives the widget)
    Exhausted,
}

/// Side effects the embedder must execute
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WidgetCommand {
    /// POST the assembled code to the verify endpoint
    Verify { code: String },
    /// POST a resend request to the send endpoint
    Resend,
}

/// User-visible notices; wrong code, exhaustion, and service failure render
/// as three distinct messages
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WidgetNotice {
    WrongCode { attempts_remaining: i32 },
    Exhausted,
    ServiceError,
}

/// Six-cell OTP entry widget
pub struct OtpWidget {
    state: WidgetState,
    cells: [Option<char>; CELL_COUNT],
    focus: usize,
    attempts_remaining: i32,
    resend_remaining: i32,
    cooldown_seconds: u32,
    is_resending: bool,
    notice: Option<WidgetNotice>,
    parent_notified: bool,
}

impl OtpWidget {
    /// Create a hidden widget with full quotas
    pub fn new() -> Self {
        Self {
            state: WidgetState::Hidden,
            cells: [None; CELL_COUNT],
            focus: 0,
            attempts_remaining: MAX_ATTEMPTS,
            resend_remaining: MAX_RESENDS,
            cooldown_seconds: 0,
            is_resending: false,
            notice: None,
            parent_notified: false,
        }
    }

    /// Show the widget; focus lands on the first cell
    pub fn show(&mut self) {
        if self.state == WidgetState::Hidden {
            self.state = WidgetState::Entering;
            self.focus = 0;
        }
    }

    /// Hide the widget (unmount); the embedder drops its tick interval
    pub fn dismiss(&mut self) {
        self.state = WidgetState::Hidden;
        self.cooldown_seconds = 0;
    }

    /// Enter a digit at the focused cell
    ///
    /// Filling the last empty cell triggers verification automatically; there
    /// is no explicit submit. Input is ignored outside `Entering` (including
    /// the exhausted state) and for non-digit characters.
    pub fn input_digit(&mut self, digit: char) -> Option<WidgetCommand> {
        if self.state != WidgetState::Entering || !digit.is_ascii_digit() {
            return None;
        }

        self.cells[self.focus] = Some(digit);
        if self.focus < CELL_COUNT - 1 {
            self.focus += 1;
        }

        match self.code() {
            Some(code) => {
                self.state = WidgetState::Verifying;
                self.notice = None;
                Some(WidgetCommand::Verify { code })
            }
            None => None,
        }
    }

    /// Backspace: clear the focused cell, or step back from an empty one
    pub fn backspace(&mut self) {
        if self.state != WidgetState::Entering {
            return;
        }
        if self.cells[self.focus].is_some() {
            self.cells[self.focus] = None;
        } else if self.focus > 0 {
            self.focus -= 1;
            self.cells[self.focus] = None;
        }
    }

    /// The verify call resolved successfully
    ///
    /// Returns `true` exactly once so the parent form is notified a single
    /// time no matter how often the embedder re-renders.
    pub fn verify_succeeded(&mut self) -> bool {
        self.state = WidgetState::Verified;
        self.notice = None;
        if self.parent_notified {
            false
        } else {
            self.parent_notified = true;
            true
        }
    }

    /// The verify call resolved with a mismatch
    ///
    /// Adopts the server's remaining-attempts count when present, otherwise
    /// decrements the local counter. Cells are cleared and focus returns to
    /// the first cell for the next try.
    pub fn verify_failed(&mut self, attempts_remaining: Option<i32>) {
        self.attempts_remaining = attempts_remaining
            .unwrap_or_else(|| (self.attempts_remaining - 1).max(0));
        self.cells = [None; CELL_COUNT];
        self.focus = 0;

        if self.attempts_remaining <= 0 {
            self.state = WidgetState::Exhausted;
            self.notice = Some(WidgetNotice::Exhausted);
        } else {
            self.state = WidgetState::Entering;
            self.notice = Some(WidgetNotice::WrongCode {
                attempts_remaining: self.attempts_remaining,
            });
        }
    }

    /// The verify call failed in transit (network/service error)
    ///
    /// No attempt is burned and the entered digits are kept; the user may
    /// simply retry.
    pub fn verify_errored(&mut self) {
        if self.state == WidgetState::Verifying {
            self.state = WidgetState::Entering;
        }
        self.notice = Some(WidgetNotice::ServiceError);
    }

    /// Request a resend, if the quota, cooldown, and in-flight guards allow
    pub fn request_resend(&mut self) -> Option<WidgetCommand> {
        if !self.can_resend() {
            return None;
        }
        self.is_resending = true;
        Some(WidgetCommand::Resend)
    }

    /// The resend call resolved successfully
    ///
    /// A fresh record is live: attempts reset to the ceiling, cells clear,
    /// and the cooldown re-arms to its full 180 seconds.
    pub fn resend_succeeded(&mut self, resend_remaining: Option<i32>) {
        self.is_resending = false;
        self.resend_remaining =
            resend_remaining.unwrap_or_else(|| (self.resend_remaining - 1).max(0));
        self.attempts_remaining = MAX_ATTEMPTS;
        self.cells = [None; CELL_COUNT];
        self.focus = 0;
        self.cooldown_seconds = RESEND_COOLDOWN_SECONDS;
        self.state = WidgetState::Entering;
        self.notice = None;
    }

    /// The resend call failed
    pub fn resend_failed(&mut self) {
        self.is_resending = false;
        self.notice = Some(WidgetNotice::ServiceError);
    }

    /// One-second countdown pulse
    ///
    /// Returns `true` while the cooldown timer is still running; on `false`
    /// the embedder clears its interval so no tick leaks past the countdown.
    pub fn tick(&mut self) -> bool {
        if self.cooldown_seconds > 0 {
            self.cooldown_seconds -= 1;
        }
        self.cooldown_seconds > 0
    }

    /// Whether the resend control is currently enabled
    pub fn can_resend(&self) -> bool {
        self.resend_remaining > 0
            && self.cooldown_seconds == 0
            && !self.is_resending
            && !matches!(
                self.state,
                WidgetState::Hidden | WidgetState::Verified | WidgetState::Verifying
            )
    }

    /// Assembled code once all six cells are filled
    pub fn code(&self) -> Option<String> {
        self.cells.iter().copied().collect::<Option<String>>()
    }

    pub fn state(&self) -> WidgetState {
        self.state
    }

    pub fn focus(&self) -> usize {
        self.focus
    }

    pub fn attempts_remaining(&self) -> i32 {
        self.attempts_remaining
    }

    pub fn resend_remaining(&self) -> i32 {
        self.resend_remaining
    }

    pub fn cooldown_seconds(&self) -> u32 {
        self.cooldown_seconds
    }

    pub fn notice(&self) -> Option<&WidgetNotice> {
        self.notice.as_ref()
    }
}

impl Default for OtpWidget {
    fn default() -> Self {
        Self::new()
    }
}
