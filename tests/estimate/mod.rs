//! Integration tests for maximum-likelihood estimation

mod mle_tests;
