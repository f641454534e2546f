#![forbid(unsafe_code)]

//! Services over the domain core: the owned session object, account
//! sign-up/login/logout, the quiz attempt state machine, simulation score
//! intake, and the progress engine that persists account mutations.

pub mod accounts;
pub mod error;
pub mod progress;
pub mod quiz;
pub mod session;
pub mod simulation;

pub use drive_core::Clock;

pub use accounts::AccountService;
pub use error::{AuthError, ProgressError, QuizError};
pub use progress::ProgressService;
pub use quiz::{AnswerOutcome, QuizAttempt, QuizProgress};
pub use session::Session;
pub use simulation::{SCORE_EVENT_TYPE, SimulationRun};
