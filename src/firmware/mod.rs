pub(crate) mod config;
pub mod join;
mod net;
mod runtime;
mod settings;
pub mod stream;
pub mod telemetry;
pub mod types;

pub use runtime::run;
