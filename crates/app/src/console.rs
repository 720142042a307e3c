use dizai_core::model::AppSettings;
use services::Narrator;

/// Terminal stand-in for speech synthesis: utterances are printed as captions.
#[derive(Debug, Clone, Copy)]
pub struct ConsoleNarrator {
    muted: bool,
}

impl ConsoleNarrator {
    /// Silent when the volume is zero.
    #[must_use]
    pub fn from_settings(settings: &AppSettings) -> Self {
        Self {
            muted: settings.is_muted(),
        }
    }

    #[must_use]
    pub fn is_muted(&self) -> bool {
        self.muted
    }
}

impl Narrator for ConsoleNarrator {
    fn say(&self, text: &str) {
        if !self.muted {
            println!("  🔊 {text}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dizai_core::model::AppSettingsDraft;

    #[test]
    fn zero_volume_mutes() {
        let mut draft = AppSettingsDraft::new();
        draft.volume = 0.0;
        let narrator = ConsoleNarrator::from_settings(&draft.validate().unwrap());
        assert!(narrator.is_muted());
        assert!(!ConsoleNarrator::from_settings(&AppSettings::default()).is_muted());
    }
}
