//! Rider directory — resolves rider ids to display names.

use crate::{
    config::{batch_size_error, DirectoryConfig},
    error::ReportResult,
    types::RiderId,
};
use std::collections::HashMap;

/// Batched "ids → display names" lookup.
///
/// Implementations receive at most `DirectoryConfig::batch_size` ids per
/// call. Ids with no known name are simply absent from the returned map.
pub trait RiderDirectory {
    fn lookup_names(&self, rider_ids: &[RiderId]) -> ReportResult<HashMap<RiderId, String>>;
}

/// Resolve every id, in input order, issuing one lookup per chunk of
/// `config.batch_size`. Unresolved ids get `config.unknown_label`.
/// Any failed batch fails the whole resolution.
pub fn resolve_names<D: RiderDirectory + ?Sized>(
    directory: &D,
    rider_ids: &[RiderId],
    config: &DirectoryConfig,
) -> ReportResult<Vec<String>> {
    if config.batch_size == 0 {
        return Err(batch_size_error(config.batch_size));
    }

    let mut resolved: HashMap<RiderId, String> = HashMap::with_capacity(rider_ids.len());
    for (n, batch) in rider_ids.chunks(config.batch_size).enumerate() {
        let names = directory.lookup_names(batch)?;
        log::debug!(
            "directory: batch {n} resolved {}/{} ids",
            names.len(),
            batch.len()
        );
        resolved.extend(names);
    }

    let names = rider_ids
        .iter()
        .map(|id| {
            resolved.get(id).cloned().unwrap_or_else(|| {
                log::warn!("directory: no name for rider {id}");
                config.unknown_label.clone()
            })
        })
        .collect();
    Ok(names)
}
