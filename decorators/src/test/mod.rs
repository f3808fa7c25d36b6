//! Unit test module
//!
//! Decorator tests live here, separate from source files.
