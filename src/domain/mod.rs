pub mod extract;
pub mod tts;
