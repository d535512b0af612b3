//! Lua rule engine
//!
//! Turns raw user source into a callable lattice rule:
//! - **Wrapping**: the source becomes the body of `rule(x, y, z)` with an
//!   implicit trailing `return 0`
//! - **Compile + smoke test**: the wrapped chunk is loaded into a fresh VM
//!   and called once at the origin; both failures surface as [`Error`]
//! - **Per-cell fallibility**: a compiled [`LuaRule`] implements
//!   [`lattice::Rule`], so a cell that raises is just an empty cell
//!
//! The engine core never sees Lua; it only depends on the abstract rule
//! contract.

mod error;
mod lua_rule;

pub use error::{Error, Result};
pub use lua_rule::LuaRule;
