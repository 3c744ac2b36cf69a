//! Interactive session state shared by the TUI front-end.
//!
//! The session owns the mix parameters, the last estimate and the display state:
//!
//! ```text
//! IDLE --(parameter change)--> COMPUTING --(delay elapsed)--> IDLE (new result)
//! ```
//!
//! Each request gets a fresh [`RequestToken`]. A newer request replaces the
//! pending one outright, and resolving any token other than the latest is a
//! no-op, so a stale computation can never overwrite a fresher result.
//!
//! Time is passed in by the caller so the state machine can be driven from
//! tests without sleeping.

use std::time::{Duration, Instant};

use tracing::{debug, trace};

use crate::domain::{EstimationResult, MaturityPoint, MixField, MixParameters};
use crate::engine::{JitterSource, estimate, maturity_for};
use crate::error::AppError;

/// Artificial "calculating" delay before a new result is shown.
pub const DEFAULT_DELAY: Duration = Duration::from_millis(650);

/// Identifies one estimate request. Tokens increase monotonically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RequestToken(u64);

/// Display state of the result panel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Phase {
    Idle,
    Computing {
        token: RequestToken,
        ready_at: Instant,
        params: MixParameters,
    },
}

/// Top-level view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Analysis,
    Reference,
}

impl Tab {
    pub const ALL: [Tab; 2] = [Tab::Analysis, Tab::Reference];

    pub fn title(self) -> &'static str {
        match self {
            Tab::Analysis => "Analysis Engine",
            Tab::Reference => "Calibration Data",
        }
    }

    pub fn index(self) -> usize {
        match self {
            Tab::Analysis => 0,
            Tab::Reference => 1,
        }
    }

    pub fn next(self) -> Self {
        match self {
            Tab::Analysis => Tab::Reference,
            Tab::Reference => Tab::Analysis,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct SessionConfig {
    pub delay: Duration,
    pub show_guide: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            delay: DEFAULT_DELAY,
            show_guide: false,
        }
    }
}

pub struct Session<J: JitterSource> {
    params: MixParameters,
    result: Option<EstimationResult>,
    phase: Phase,
    last_token: u64,
    delay: Duration,
    jitter: J,
    tab: Tab,
    show_guide: bool,
}

impl<J: JitterSource> Session<J> {
    /// Create a session with default parameters and an initial request pending.
    pub fn new(config: SessionConfig, jitter: J, now: Instant) -> Self {
        let mut session = Self {
            params: MixParameters::default(),
            result: None,
            phase: Phase::Idle,
            last_token: 0,
            delay: config.delay,
            jitter,
            tab: Tab::Analysis,
            show_guide: config.show_guide,
        };
        session.request_estimate(now);
        session
    }

    pub fn params(&self) -> &MixParameters {
        &self.params
    }

    pub fn result(&self) -> Option<&EstimationResult> {
        self.result.as_ref()
    }

    pub fn maturity(&self) -> Option<[MaturityPoint; 4]> {
        self.result.as_ref().map(maturity_for)
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_computing(&self) -> bool {
        matches!(self.phase, Phase::Computing { .. })
    }

    pub fn tab(&self) -> Tab {
        self.tab
    }

    pub fn set_tab(&mut self, tab: Tab) {
        self.tab = tab;
    }

    pub fn next_tab(&mut self) {
        self.tab = self.tab.next();
    }

    pub fn show_guide(&self) -> bool {
        self.show_guide
    }

    pub fn toggle_guide(&mut self) -> bool {
        self.show_guide = !self.show_guide;
        self.show_guide
    }

    /// Set a field (clamped to its range) and request a new estimate if it changed.
    ///
    /// Returns the value actually stored.
    pub fn set_param(&mut self, field: MixField, value: f64, now: Instant) -> f64 {
        let before = self.params.get(field);
        let stored = self.params.set_clamped(field, value);
        if stored != before {
            self.request_estimate(now);
        }
        stored
    }

    /// Move a field by `steps` slider increments.
    pub fn step_param(&mut self, field: MixField, steps: i32, now: Instant) -> f64 {
        let target = self.params.get(field) + f64::from(steps) * field.step();
        self.set_param(field, target, now)
    }

    /// Queue a computation for the current parameters, superseding any pending one.
    pub fn request_estimate(&mut self, now: Instant) -> RequestToken {
        self.last_token += 1;
        let token = RequestToken(self.last_token);
        if let Phase::Computing { token: stale, .. } = self.phase {
            trace!(?stale, ?token, "superseding pending estimate");
        }
        self.phase = Phase::Computing {
            token,
            ready_at: now + self.delay,
            params: self.params,
        };
        token
    }

    /// Resolve the pending computation once its delay has elapsed.
    ///
    /// Returns `Ok(true)` when a new result was published.
    pub fn poll(&mut self, now: Instant) -> Result<bool, AppError> {
        match self.phase {
            Phase::Computing { token, .. } => self.resolve(token, now),
            Phase::Idle => Ok(false),
        }
    }

    /// Resolve a specific request.
    ///
    /// Tokens other than the pending one are ignored, as are requests whose
    /// delay has not elapsed yet. On engine failure the session returns to
    /// idle and keeps the previous result.
    pub fn resolve(&mut self, token: RequestToken, now: Instant) -> Result<bool, AppError> {
        let Phase::Computing {
            token: pending,
            ready_at,
            params,
        } = self.phase
        else {
            return Ok(false);
        };

        if token != pending {
            trace!(?token, ?pending, "ignoring stale estimate request");
            return Ok(false);
        }
        if now < ready_at {
            return Ok(false);
        }

        self.phase = Phase::Idle;
        let result = estimate(&params, &mut self.jitter)?;
        debug!(?token, strength_mpa = result.strength_mpa, "published estimate");
        self.result = Some(result);
        Ok(true)
    }
}
