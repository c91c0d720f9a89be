//! HOME/EDIT state machine
//!
//! Entering edit mode freezes the shared clock and snapshots its fields.
//! The dial moves the current field relative to where it stood when the
//! field was entered; advancing commits that value into the pending fields
//! and re-baselines the dial; confirming writes the pending fields back into
//! the clock and lets it tick again.

use crate::calendar::{CalendarFields, compose, decompose};
use crate::clock::SharedClock;
use crate::config::EngineConfig;
use crate::field::{DialScale, Field};
use crate::input::{Action, Buttons};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Mode {
    Home,
    Edit(Field),
}

/// State of an edit interaction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EditSession {
    field: Field,
    baseline_dial: u16,
    pending: CalendarFields,
}

impl EditSession {
    /// Fields committed so far.
    pub fn pending(&self) -> &CalendarFields {
        &self.pending
    }

    /// Pending fields with the dial movement applied to the current field.
    fn adjusted(&self, scale: &DialScale, dial: u16) -> CalendarFields {
        let current = self.pending.get(self.field);
        let bounds = self.pending.bounds(self.field);
        let delta = scale.delta(dial, self.baseline_dial);
        let value = scale.adjust(self.field, delta, current, bounds);
        self.pending.with(self.field, value)
    }
}

/// The time/edit engine.
pub struct Engine {
    config: EngineConfig,
    session: Option<EditSession>,
}

impl Engine {
    pub const fn new(config: EngineConfig) -> Self {
        Self {
            config,
            session: None,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn mode(&self) -> Mode {
        match &self.session {
            Some(session) => Mode::Edit(session.field),
            None => Mode::Home,
        }
    }

    pub fn is_editing(&self) -> bool {
        self.session.is_some()
    }

    pub fn session(&self) -> Option<&EditSession> {
        self.session.as_ref()
    }

    /// HOME -> EDIT(first editable field).
    ///
    /// Returns false if already editing or nothing is editable.
    pub fn enter(&mut self, clock: &SharedClock, dial: u16) -> bool {
        if self.session.is_some() {
            return false;
        }
        let Some(field) = self.config.editable.first() else {
            warn!("edit: no editable fields configured");
            return false;
        };

        let total_seconds = clock.freeze();
        let session = EditSession {
            field,
            baseline_dial: self.config.dial.clamp(dial),
            pending: decompose(total_seconds),
        };
        debug!(
            "edit: enter {:?} at {} (dial {})",
            field, total_seconds, session.baseline_dial
        );
        self.session = Some(session);
        true
    }

    /// EDIT(f) -> EDIT(next editable field after f).
    pub fn advance(&mut self, clock: &SharedClock, dial: u16) -> bool {
        let scale = self.config.dial;
        let editable = self.config.editable;
        let Some(session) = self.session.as_mut() else {
            return false;
        };

        session.pending = session.adjusted(&scale, dial);
        session.field = editable.after(session.field).unwrap_or(session.field);
        session.baseline_dial = scale.clamp(dial);
        debug!("edit: advance to {:?}", session.field);
        clock.request_redraw();
        true
    }

    /// EDIT(f) -> HOME, committing the edited fields into the clock.
    pub fn confirm(&mut self, clock: &SharedClock, dial: u16) -> bool {
        let Some(session) = self.session.take() else {
            return false;
        };
        let fields = session.adjusted(&self.config.dial, dial);
        let total_seconds = compose(&fields);
        clock.commit(total_seconds);
        info!("edit: committed {}", total_seconds);
        true
    }

    /// Leave edit mode and discard the pending fields.
    pub fn cancel(&mut self, clock: &SharedClock) -> bool {
        if self.session.take().is_none() {
            return false;
        }
        clock.thaw();
        warn!("edit: cancelled");
        true
    }

    pub fn apply(&mut self, action: Action, clock: &SharedClock, dial: u16) -> bool {
        match action {
            Action::Edit => self.enter(clock, dial),
            Action::Advance => self.advance(clock, dial),
            Action::Confirm => self.confirm(clock, dial),
        }
    }

    /// Decode newly pressed buttons and run the resulting action.
    pub fn handle(&mut self, clock: &SharedClock, pressed: Buttons, dial: u16) -> Option<Action> {
        let action = self.config.buttons.decode(pressed, self.is_editing())?;
        self.apply(action, clock, dial).then_some(action)
    }

    /// What the display shows while editing.
    pub fn preview(&self, dial: u16) -> Option<CalendarFields> {
        self.session
            .as_ref()
            .map(|session| session.adjusted(&self.config.dial, dial))
    }

    /// Fields to display: the edit preview, or the running clock.
    pub fn fields(&self, clock: &SharedClock, dial: u16) -> CalendarFields {
        self.preview(dial).unwrap_or_else(|| clock.fields())
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}
