use crate::content::settings::{SettingsIssue, SettingsUpdate, SiteSettings};

/// What happened to an update handed to [`SettingsEditor::apply`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditOutcome {
    Applied,
    /// The update is held until [`SettingsEditor::confirm`] or
    /// [`SettingsEditor::cancel`]; the draft is untouched.
    NeedsConfirmation,
}

/// Saved and draft copies of the site settings.
#[derive(Debug, Clone, Default)]
pub struct SettingsEditor {
    saved: SiteSettings,
    draft: SiteSettings,
    pending: Option<SettingsUpdate>,
}

impl SettingsEditor {
    pub fn new(saved: SiteSettings) -> Self {
        Self {
            draft: saved.clone(),
            saved,
            pending: None,
        }
    }

    pub fn draft(&self) -> &SiteSettings {
        &self.draft
    }

    pub fn saved(&self) -> &SiteSettings {
        &self.saved
    }

    pub fn pending(&self) -> Option<&SettingsUpdate> {
        self.pending.as_ref()
    }

    pub fn has_changes(&self) -> bool {
        self.draft != self.saved
    }

    /// Apply one field update to the draft. Switching maintenance mode on
    /// takes the site offline, so it waits for confirmation.
    pub fn apply(&mut self, update: SettingsUpdate) -> EditOutcome {
        if matches!(update, SettingsUpdate::MaintenanceMode(true)) && !self.draft.general.maintenance_mode {
            self.pending = Some(update);
            return EditOutcome::NeedsConfirmation;
        }
        update.apply(&mut self.draft);
        EditOutcome::Applied
    }

    /// Apply the held update. Returns false when nothing was pending.
    pub fn confirm(&mut self) -> bool {
        match self.pending.take() {
            Some(update) => {
                update.apply(&mut self.draft);
                true
            }
            None => false,
        }
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }

    pub fn validate(&self) -> Vec<SettingsIssue> {
        self.draft.issues()
    }

    /// The draft to persist, or the issues that block saving it.
    pub fn prepare_save(&self) -> Result<&SiteSettings, Vec<SettingsIssue>> {
        let issues = self.validate();
        if issues.is_empty() {
            Ok(&self.draft)
        } else {
            Err(issues)
        }
    }

    /// Record that `settings` is now what the store holds.
    pub fn mark_saved(&mut self, settings: SiteSettings) {
        self.draft = settings.clone();
        self.saved = settings;
        self.pending = None;
    }

    pub fn discard(&mut self) {
        self.draft = self.saved.clone();
        self.pending = None;
    }
}
