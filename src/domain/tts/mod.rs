pub mod dto;
pub mod error;
pub mod segmenter;
pub mod service;
pub mod voice;

pub use dto::SynthesizeRequest;
pub use error::{SynthesisError, TtsServiceError};
pub use segmenter::{split_text, MAX_TTS_BYTES};
pub use service::{
    FallbackAsset, FallbackResult, SynthesisResult, TtsService, TtsServiceApi, TtsSettings,
};
pub use voice::{is_voice_neural_compatible, VoiceSelection};
