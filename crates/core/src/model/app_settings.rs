use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const MIN_SPEECH_RATE: f32 = 0.5;
pub const MAX_SPEECH_RATE: f32 = 1.5;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontSize {
    Small,
    #[default]
    Medium,
    Large,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontType {
    #[default]
    Lexend,
    Sans,
    Serif,
    Dyslexic,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
    Contrast,
}

/// Validated speech and display preferences.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
#[allow(clippy::struct_excessive_bools)]
pub struct AppSettings {
    volume: f32,
    speech_rate: f32,
    #[serde(rename = "voiceURI")]
    voice_uri: String,
    auto_repeat: bool,
    font_size: FontSize,
    font_type: FontType,
    theme: Theme,
    highlight_color: String,
    show_captions: bool,
}

/// Editable settings. Missing JSON fields take their default values, so a
/// partial stored blob merges over the defaults.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AppSettingsDraft {
    pub volume: f32,
    pub speech_rate: f32,
    #[serde(rename = "voiceURI")]
    pub voice_uri: String,
    pub auto_repeat: bool,
    pub font_size: FontSize,
    pub font_type: FontType,
    pub theme: Theme,
    pub highlight_color: String,
    pub show_captions: bool,
}

#[derive(Debug, Error, Clone, PartialEq)]
#[non_exhaustive]
pub enum AppSettingsError {
    #[error("volume must be between 0 and 1, got {0}")]
    InvalidVolume(f32),
    #[error("speech rate must be between 0.5 and 1.5, got {0}")]
    InvalidSpeechRate(f32),
}

impl Default for AppSettingsDraft {
    fn default() -> Self {
        Self {
            volume: 1.0,
            speech_rate: 1.0,
            voice_uri: String::new(),
            auto_repeat: false,
            font_size: FontSize::default(),
            font_type: FontType::default(),
            theme: Theme::default(),
            highlight_color: "bg-yellow-200".into(),
            show_captions: true,
        }
    }
}

impl AppSettingsDraft {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate and normalize the draft into settings.
    ///
    /// # Errors
    ///
    /// Returns `AppSettingsError` if volume or speech rate is out of range.
    pub fn validate(self) -> Result<AppSettings, AppSettingsError> {
        if !(0.0..=1.0).contains(&self.volume) {
            return Err(AppSettingsError::InvalidVolume(self.volume));
        }
        if !(MIN_SPEECH_RATE..=MAX_SPEECH_RATE).contains(&self.speech_rate) {
            return Err(AppSettingsError::InvalidSpeechRate(self.speech_rate));
        }

        Ok(AppSettings {
            volume: self.volume,
            speech_rate: self.speech_rate,
            voice_uri: self.voice_uri.trim().to_string(),
            auto_repeat: self.auto_repeat,
            font_size: self.font_size,
            font_type: self.font_type,
            theme: self.theme,
            highlight_color: self.highlight_color.trim().to_string(),
            show_captions: self.show_captions,
        })
    }
}

impl AppSettings {
    /// Copy the settings back into an editable draft.
    #[must_use]
    pub fn to_draft(&self) -> AppSettingsDraft {
        AppSettingsDraft {
            volume: self.volume,
            speech_rate: self.speech_rate,
            voice_uri: self.voice_uri.clone(),
            auto_repeat: self.auto_repeat,
            font_size: self.font_size,
            font_type: self.font_type,
            theme: self.theme,
            highlight_color: self.highlight_color.clone(),
            show_captions: self.show_captions,
        }
    }

    #[must_use]
    pub fn volume(&self) -> f32 {
        self.volume
    }

    #[must_use]
    pub fn speech_rate(&self) -> f32 {
        self.speech_rate
    }

    /// Preferred voice; empty means the platform default Portuguese voice.
    #[must_use]
    pub fn voice_uri(&self) -> &str {
        &self.voice_uri
    }

    #[must_use]
    pub fn auto_repeat(&self) -> bool {
        self.auto_repeat
    }

    #[must_use]
    pub fn font_size(&self) -> FontSize {
        self.font_size
    }

    #[must_use]
    pub fn font_type(&self) -> FontType {
        self.font_type
    }

    #[must_use]
    pub fn theme(&self) -> Theme {
        self.theme
    }

    #[must_use]
    pub fn highlight_color(&self) -> &str {
        &self.highlight_color
    }

    #[must_use]
    pub fn show_captions(&self) -> bool {
        self.show_captions
    }

    #[must_use]
    pub fn is_muted(&self) -> bool {
        self.volume <= 0.0
    }
}

impl Default for AppSettings {
    fn default() -> Self {
        let draft = AppSettingsDraft::default();
        Self {
            volume: draft.volume,
            speech_rate: draft.speech_rate,
            voice_uri: draft.voice_uri,
            auto_repeat: draft.auto_repeat,
            font_size: draft.font_size,
            font_type: draft.font_type,
            theme: draft.theme,
            highlight_color: draft.highlight_color,
            show_captions: draft.show_captions,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        let settings = AppSettingsDraft::new().validate().unwrap();
        assert_eq!(settings, AppSettings::default());
        assert!((settings.speech_rate() - 1.0).abs() < f32::EPSILON);
        assert_eq!(settings.theme(), Theme::Light);
    }

    #[test]
    fn rejects_out_of_range_audio() {
        let mut draft = AppSettingsDraft::new();
        draft.volume = 1.2;
        assert_eq!(draft.validate().unwrap_err(), AppSettingsError::InvalidVolume(1.2));

        let mut draft = AppSettingsDraft::new();
        draft.speech_rate = 0.25;
        assert_eq!(
            draft.validate().unwrap_err(),
            AppSettingsError::InvalidSpeechRate(0.25)
        );

        let mut draft = AppSettingsDraft::new();
        draft.volume = f32::NAN;
        assert!(draft.validate().is_err());
    }

    #[test]
    fn partial_json_merges_over_defaults() {
        let draft: AppSettingsDraft =
            serde_json::from_str(r#"{"theme":"contrast","speechRate":0.5}"#).unwrap();
        let settings = draft.validate().unwrap();
        assert_eq!(settings.theme(), Theme::Contrast);
        assert!((settings.speech_rate() - 0.5).abs() < f32::EPSILON);
        assert!((settings.volume() - 1.0).abs() < f32::EPSILON);
        assert!(settings.show_captions());
    }

    #[test]
    fn serializes_with_stored_field_names() {
        let mut draft = AppSettingsDraft::new();
        draft.voice_uri = "pt-BR-voz".into();
        draft.font_type = FontType::Dyslexic;
        let json = serde_json::to_value(draft.validate().unwrap()).unwrap();
        assert_eq!(json["voiceURI"], "pt-BR-voz");
        assert_eq!(json["fontType"], "dyslexic");
        assert_eq!(json["fontSize"], "medium");
    }
}
