//! End-to-end scenarios combining composition, refinement and fitting

mod composition;
