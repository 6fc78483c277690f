mod attempt;
mod file_store;
mod history;
mod limiter;
pub mod message;
mod state;
mod store;

#[cfg(any(test, feature = "mocks"))]
mod store_mock;

pub use attempt::LoginAttempt;
pub use file_store::FileStore;
pub use history::AttemptHistory;
pub use limiter::{LoginOutcome, LoginRateLimiter};
pub use state::{Evaluation, LockState, evaluate};
pub use store::{InMemoryStore, KeyValueStore};
#[cfg(any(test, feature = "mocks"))]
pub use store_mock::UnavailableStore;
