//! Integration tests: the full events → collection → consensus → export
//! pipeline against an in-memory provider.

mod mock_provider;
mod pipeline;
