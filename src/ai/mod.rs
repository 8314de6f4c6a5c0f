pub mod agent;
pub mod session;
pub mod tools;
pub mod tutor;

pub use agent::{Agent, AgentInput, AgentReply, OpenAIAgent};
pub use session::{ChatSession, DEFAULT_USER_ID, MAX_HISTORY, SessionSnapshot, SessionStore};
pub use tutor::{FALLBACK_RESPONSE, TurnOutcome, Tutor};
