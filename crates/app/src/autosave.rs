//! Auto-save state machine for the rule editor.
//!
//! Rapid successive edits must coalesce into a single persisted write per
//! settling period, and an edit arriving while a save is in flight must
//! re-trigger exactly one follow-up save when the in-flight one completes.
//! Modeled as an explicit state machine so the coalescing behavior is
//! testable without timers or IO: callers feed it [`on_edit`] and
//! [`on_save_result`] and execute the returned [`SaveEffect`].
//!
//! [`on_edit`]: AutoSave::on_edit
//! [`on_save_result`]: AutoSave::on_save_result

/// Where the editor's save cycle currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SaveState {
    /// No unsaved edits, no save in flight.
    #[default]
    Idle,
    /// A save is in flight and covers every edit so far.
    Saving,
    /// A save is in flight and at least one edit arrived after it started.
    SavingWithPending,
    /// The last save succeeded and nothing changed since.
    Saved,
    /// The last save failed and nothing changed since. The next edit
    /// retries; there is no automatic retry loop.
    Failed,
}

/// What the caller must do after a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveEffect {
    /// Nothing to do.
    None,
    /// Start persisting the current config snapshot, then report back via
    /// [`AutoSave::on_save_result`].
    StartSave,
}

/// The auto-save state machine. Starts [`Idle`](SaveState::Idle).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AutoSave {
    state: SaveState,
}

impl AutoSave {
    /// Create a machine in the [`Idle`](SaveState::Idle) state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The current state.
    #[must_use]
    pub fn state(&self) -> SaveState {
        self.state
    }

    /// Record an edit. Starts a save unless one is already in flight, in
    /// which case the edit is folded into a single pending follow-up.
    pub fn on_edit(&mut self) -> SaveEffect {
        match self.state {
            SaveState::Idle | SaveState::Saved | SaveState::Failed => {
                self.state = SaveState::Saving;
                SaveEffect::StartSave
            }
            SaveState::Saving | SaveState::SavingWithPending => {
                self.state = SaveState::SavingWithPending;
                SaveEffect::None
            }
        }
    }

    /// Record the outcome of the in-flight save.
    ///
    /// If edits arrived meanwhile, a single follow-up save starts
    /// regardless of the outcome; the follow-up snapshots the latest
    /// config, so even a failed first save is superseded rather than
    /// retried.
    pub fn on_save_result(&mut self, success: bool) -> SaveEffect {
        match self.state {
            SaveState::SavingWithPending => {
                self.state = SaveState::Saving;
                SaveEffect::StartSave
            }
            SaveState::Saving => {
                self.state = if success {
                    SaveState::Saved
                } else {
                    SaveState::Failed
                };
                SaveEffect::None
            }
            // Spurious completion with no save in flight.
            SaveState::Idle | SaveState::Saved | SaveState::Failed => SaveEffect::None,
        }
    }
}
