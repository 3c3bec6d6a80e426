//! Resource simulator: loads content, runs an effect script over a set of
//! owners and reports the resulting state.
//!
//! # Architecture
//!
//! ```text
//! SimConfig ─► ContentFactory / loaders ─► Session ─► SessionReport (JSON)
//!                                            ▲
//!                                   script steps (RON)
//! ```

pub mod config;
pub mod script;
pub mod session;

pub use config::SimConfig;
pub use script::{ScriptStep, load_script, parse_script};
pub use session::{OwnerTransition, Session, SessionReport, TracingObserver};
