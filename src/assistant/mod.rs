pub mod chat;
pub mod voice;

pub use chat::{ChatAction, ChatMessage, ChatReply, Conversation, ReplyOutcome, Role};
pub use voice::{
    clean_for_speech, CommandRecognizer, Recognizer, Speaker, SpeechError,
    SystemSpeaker, VoiceError, VoiceInput, VoiceRunner, VoiceSession, VoiceState,
};
