// SPDX: CC0-1.0

//! Simple closed-form functions sampled over a domain, collected into a
//! workspace that round-trips through JSON.
//!
//! ```
//! use function_plotter::{
//!     catalog::{ordered_constants, FunctionKind},
//!     codec, Domain, Function, Workspace,
//! };
//!
//! let f = Function::new(
//!     FunctionKind::Linear,
//!     ordered_constants([2.0, 1.5]),
//!     Domain::new(-3.0, 3.0),
//! )?;
//! assert_eq!(f.samples_y()[0], -4.5);
//!
//! let mut ws = Workspace::new();
//! ws.add(f, "line");
//! let text = codec::encode(&ws)?;
//! assert_eq!(codec::decode(&text)?, ws);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod catalog;
pub mod codec;
pub mod function;
pub mod shell;
pub mod workspace;

pub use function::{Domain, Function};
pub use workspace::Workspace;

pub type Number = f64;

/// Spacing between consecutive samples of every function.
pub const DELTA: Number = 0.25;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Point<T> {
    pub x: T,
    pub y: T,
}
