//! Model artifact acquisition
//!
//! Fetches the classifier file from its configured source when it is not
//! already on disk and verifies its BLAKE3 digest when one is configured.

mod checksum;
mod fetcher;

pub use checksum::{blake3_file_digest, verify_checksum};
pub use fetcher::{ArtifactError, ModelFetcher};
