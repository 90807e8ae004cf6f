//! # IO
//!
//! Outer surfaces of the backend. Only REST for now.

pub mod rest;
