//! Environment composition for harness-spawned processes.
//!
//! - `snapshot` — OS environment plus runtime override table
//! - `compose` — the pure precedence/blocking transform
//! - `session` — session-lifetime stores and snapshot discipline
//! - `markers` — variables the harness guarantees in isolated mode

mod compose;
mod errors;
pub mod markers;
mod session;
mod snapshot;
mod types;

pub use compose::{ComposeRequest, compose};
pub use errors::EnvError;
pub use session::HarnessEnv;
pub use snapshot::ProcessEnvironment;
pub use types::{BlockList, ComposedEnv, EnvMap};
