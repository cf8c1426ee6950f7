// The core module contains all business logic.
// Each feature gets its own submodule.

#[path = "antitag/mod.rs"]
pub mod antitag;
