pub mod engine;
pub mod io;
pub mod llm;
pub mod models;
pub mod registry;
pub mod settings;
pub mod store;
pub mod transcription;

pub use engine::{analyze, build_segments, score, Grade, ScoreSummary, TopicVerdict};
pub use io::{parse_deepgram_json, read_transcript, AnalysisReport, Scorecard};
pub use llm::{AnthropicClient, AnthropicConfig, TextGenerator};
pub use models::{
    CallRecord, CallType, MatchPosition, MoveSize, ScoringMode, Segment, Topic, TopicPattern,
    TopicResult,
};
pub use registry::{AnalysisOverlay, TopicRegistry};
pub use settings::{FailBehavior, Settings};
pub use store::{CallStore, JsonFileStore, MemoryStore};
pub use transcription::{DeepgramClient, DeepgramConfig, Transcriber};
