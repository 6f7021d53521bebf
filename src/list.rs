//! Keeping in-memory admin lists in sync after deletions.

use crate::error::LaporResult;
use std::future::Future;

/// Entities that carry a server-assigned id.
pub trait Identified {
    fn id(&self) -> i64;
}

/// A copy of `list` without the entity whose id is `id`.
pub fn without_id<T>(list: &[T], id: i64) -> Vec<T>
where
    T: Identified + Clone,
{
    list.iter().filter(|item| item.id() != id).cloned().collect()
}

/// Await `delete`, then drop `id` from `list` only if the backend confirmed.
///
/// On failure the list is untouched and the error is returned for display.
pub async fn remove_after_delete<T, F>(list: &mut Vec<T>, id: i64, delete: F) -> LaporResult<()>
where
    T: Identified,
    F: Future<Output = LaporResult<()>>,
{
    match delete.await {
        Ok(()) => {
            list.retain(|item| item.id() != id);
            log::debug!("Removed entity {} from local list", id);
            Ok(())
        }
        Err(e) => {
            log::debug!("Delete of {} failed, list unchanged: {}", id, e);
            Err(e)
        }
    }
}
