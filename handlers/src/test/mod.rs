//! Unit test module
//!
//! Handler tests live here, separate from source files. They run against an in-memory
//! SQLite database seeded by [`fixtures`].

mod city_start_test;
mod fixtures;
