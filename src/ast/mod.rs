//! Configuration types for task commands.
//!
//! Decoding works on generically parsed `serde_yaml::Value` nodes so that
//! ambiguous command mappings can be disambiguated by marker fields rather
//! than by speculative struct decoding. Every decoder reports failures
//! against the [`NodePath`] of the offending node.

mod call;
mod cmd;
mod error;
mod for_loop;
pub mod node;
mod path;
mod platform;
pub mod shape;
mod vars;

pub use call::Call;
pub use cmd::Cmd;
pub use error::{short_tag, DecodeError, DecodeErrorKind};
pub use for_loop::For;
pub use path::{NodePath, PathSegment};
pub use platform::{decode_platforms, Platform};
pub use shape::{classify, CmdShape, Shape, SHAPES};
pub use vars::{Var, Vars};
