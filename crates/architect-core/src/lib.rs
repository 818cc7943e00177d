pub mod client;
pub mod config;
pub mod dialogue;
pub mod knowledge;
pub mod map;
pub mod site;
pub mod state;
pub mod submission;
pub mod task;

// Re-export main types for convenience
pub use client::{ChatApiClient, CompletionRequest, CompletionService, IntakeOutcome, IntakeService, Web3FormsClient};
pub use config::Config;
pub use dialogue::{DialogueController, DialogueError, DialogueSession, DialogueState};
pub use knowledge::{KnowledgeBase, KnowledgeEntry, KnowledgeError};
pub use map::{LngLat, MapView, Marker};
pub use state::{ChatMessage, ChatRole};
pub use submission::{ContactForm, SubmissionController, SubmissionError, SubmissionState};
