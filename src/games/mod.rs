//! Game implementations for the CFR solver.
//!
//! ## Available Games
//!
//! - [`leduc`]: Leduc Hold'em, a two-round, three-rank poker game small
//!   enough to solve exactly

pub mod leduc;
