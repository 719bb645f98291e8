//! Integration tests for the Strata context composition engine

mod context_manager;
mod test_utils;
