pub mod client;
pub mod error;
pub mod extract;
pub mod locations;
pub mod probe;
pub(crate) mod retry;
pub mod session;
pub mod types;

pub use client::{ClientSettings, DominosClient, RawResponse};
pub use error::DominosError;
pub use probe::probe_codes;
pub use session::{CodeOutcome, OrderSession, SessionState};
