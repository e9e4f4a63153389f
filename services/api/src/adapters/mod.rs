pub mod deepgram;

pub use deepgram::DeepgramAdapter;
