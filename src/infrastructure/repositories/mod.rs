pub mod fallback_audio_repository;
pub mod google_tts_repository;
pub mod polly_tts_repository;
pub mod readability_extractor;
pub mod tts_repository;

pub use fallback_audio_repository::{FallbackAudioRepository, FileFallbackAudioRepository};
pub use google_tts_repository::GoogleTtsRepository;
pub use polly_tts_repository::PollyTtsRepository;
pub use readability_extractor::{ContentExtractor, ReadabilityExtractor};
pub use tts_repository::TtsRepository;
