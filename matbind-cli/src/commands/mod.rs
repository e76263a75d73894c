//! CLI command implementations.
//!
//! - `bind`: Bind a material directly or through a collection
//! - `unbind`: Iterative unbind for one purpose
//! - `unbind_all`: Single-pass unbind over every purpose
//! - `show`: Resolve and print bound materials
//! - `completions`: Generate shell completion scripts

pub mod bind;
pub mod completions;
pub mod show;
pub mod unbind;
pub mod unbind_all;

pub use bind::BindCommand;
pub use completions::CompletionsCommand;
pub use show::ShowCommand;
pub use unbind::UnbindCommand;
pub use unbind_all::UnbindAllCommand;
