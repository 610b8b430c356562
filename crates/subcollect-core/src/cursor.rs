//! Start-height resolution — where ingestion resumes after a restart.

use crate::types::Height;

/// Combine a caller-supplied start height with the highest height already
/// persisted (taken from the most recent stored extrinsic).
///
/// Returns the greater of the two, so a restart never rewinds past durable
/// data, while a caller can still force a higher starting point to skip a
/// known-bad range. With no persisted extrinsics the caller's value is
/// returned unchanged.
pub fn resolve_start_height(caller_height: Height, latest_persisted: Option<Height>) -> Height {
    match latest_persisted {
        Some(persisted) if persisted > caller_height => persisted,
        _ => caller_height,
    }
}
