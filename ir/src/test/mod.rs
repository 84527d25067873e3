//! Unit tests for the IR substrate.

mod unit;
