use serde::{Deserialize, Serialize};

/// Voice identifier plus the locale it speaks, passed unchanged to every chunk
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoiceSelection {
    pub name: String,
    pub language_code: String,
}

impl VoiceSelection {
    /// Build a selection from a provider voice name.
    ///
    /// Google voice names start with their locale (`ja-JP-Neural2-B`), which is
    /// used when present. Other names (Polly's `Takumi`) fall back to
    /// `default_language_code`.
    pub fn from_name(name: &str, default_language_code: &str) -> Self {
        let language_code =
            locale_prefix(name).unwrap_or_else(|| default_language_code.to_string());

        Self {
            name: name.to_string(),
            language_code,
        }
    }
}

impl std::fmt::Display for VoiceSelection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.name, self.language_code)
    }
}

fn locale_prefix(name: &str) -> Option<String> {
    let mut parts = name.splitn(3, '-');
    let language = parts.next()?;
    let region = parts.next()?;
    parts.next()?;

    let is_language = (2..=3).contains(&language.len())
        && language.chars().all(|c| c.is_ascii_lowercase());
    let is_region = region.len() == 2 && region.chars().all(|c| c.is_ascii_uppercase());

    (is_language && is_region).then(|| format!("{}-{}", language, region))
}

/// Check if a Polly voice supports the neural engine
pub fn is_voice_neural_compatible(voice: &str) -> bool {
    // Based on AWS Polly documentation
    const NEURAL_VOICES: &[&str] = &[
        // Japanese
        "Takumi", "Kazuha", "Tomoko", // English
        "Joanna", "Matthew", "Ivy", "Kendra", "Kimberly", "Salli", "Joey", "Justin", "Kevin",
        // Korean
        "Seoyeon", // Mandarin Chinese
        "Zhiyu",
    ];

    NEURAL_VOICES.contains(&voice)
}
