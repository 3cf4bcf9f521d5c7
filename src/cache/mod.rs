//! Snapshot cache for the timestamp-extraction pass.
//!
//! The extraction pass is by far the most expensive step over a large
//! library, so its output is persisted once and reused on subsequent runs. A
//! snapshot stores `(records, lone_sidecars, sidecar_map)` keyed by the
//! scanned root, wrapped in an envelope with a SHA-256 integrity checksum and
//! a format version. Checksum, version or root mismatches are treated as a
//! missing cache: the pass simply runs again.

pub mod snapshot;

pub use snapshot::{Snapshot, SNAPSHOT_VERSION};
