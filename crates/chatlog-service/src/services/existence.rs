//! Existence reconciliation
//!
//! Makes sure a row exists for every community, channel, thread and user an
//! event refers to before anything that depends on it is written.

use chatlog_core::entities::Entity;
use chatlog_core::traits::{UnitOfWork, WriteOutcome};
use tracing::{debug, info, instrument};

use super::error::ServiceResult;

/// Insert `observed` unless a row with its id already exists.
///
/// Returns `true` when this call created the row. Losing an insert race to
/// another writer counts as success.
#[instrument(skip(uow, observed), fields(kind = %observed.kind(), id = %observed.id()))]
pub async fn ensure_exists(uow: &mut dyn UnitOfWork, observed: &Entity) -> ServiceResult<bool> {
    if uow.find_entity(observed.kind(), observed.id()).await?.is_some() {
        return Ok(false);
    }

    match uow.insert_entity(observed).await? {
        WriteOutcome::Inserted => {
            info!(name = %observed.display_name(), "New {} - inserted row", observed.kind());
            Ok(true)
        }
        WriteOutcome::Duplicate => {
            debug!("Row appeared concurrently");
            Ok(false)
        }
    }
}
