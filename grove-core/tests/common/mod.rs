//! Test infrastructure for the grove
//!
//! Provides document shapes, seeded shape generation, and helpers that
//! turn a shape into builder events and a grove back into a shape.

#![allow(dead_code)]

mod generators;
mod harness;

pub use generators::{Gen, Shape};
pub use harness::{build, build_with, element_type, events_for, render, render_children, text};
