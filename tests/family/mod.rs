//! Integration tests for distribution families

// Tests for construction and combinators
mod algebra_tests;

// Tests for refinement
mod refine_tests;
