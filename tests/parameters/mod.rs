//! Integration tests for the parameter system
//!
//! These tests verify parameter sources, usage detection and bounds.

// Tests for usage detection
mod usage_tests;

// Tests for Bounds and BoundsTransform
mod bounds_tests;
