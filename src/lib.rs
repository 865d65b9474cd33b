//! Modscan core library.
//!
//! This library scans C++20 sources for module declarations and imports
//! ([`scanner`]) and writes the discovered module interfaces as a Ninja
//! dyndep file ([`dyndep`]). [`cli`] and [`runner`] provide the command line
//! front end used by the `modscan` binary.

pub mod cli;
pub mod dyndep;
pub mod runner;
pub mod scanner;
