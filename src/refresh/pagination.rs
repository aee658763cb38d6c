//! Paginated VLAN fetch for one WAN interface.

use std::time::Duration;

use log::{debug, warn};
use tokio_retry::strategy::ExponentialBackoff;
use tokio_retry::Retry;

use crate::config::{PAGE_RETRY_BASE, PAGE_RETRY_FACTOR, PAGE_RETRY_MAX_DELAY};
use crate::error_handling::{ApiError, ExporterStats};
use crate::ikuai::{IkuaiApi, VlanPage};
use crate::vlan_cache::VlanCache;

/// Delays between attempts at the same page.
///
/// The series never ends: a page is retried until the appliance serves it, so
/// no VLAN is skipped. Delays double from 500ms up to 30s.
pub fn page_retry_strategy() -> impl Iterator<Item = Duration> {
    ExponentialBackoff::from_millis(PAGE_RETRY_BASE)
        .factor(PAGE_RETRY_FACTOR)
        .max_delay(PAGE_RETRY_MAX_DELAY)
}

/// Fetches the page at `offset`, retrying the same offset on failure.
async fn fetch_page(
    api: &dyn IkuaiApi,
    stats: &ExporterStats,
    wan: &str,
    offset: usize,
    page_size: usize,
) -> Result<VlanPage, ApiError> {
    Retry::spawn(page_retry_strategy(), || async move {
        api.fetch_vlan_page(wan, offset, page_size)
            .await
            .map_err(|e| {
                stats.record_api_failure(e.call());
                warn!(
                    "Failed to fetch VLAN page of {} at offset {}, retrying: {}",
                    wan, offset, e
                );
                e
            })
    })
    .await
}

/// Walks every page of `wan` and upserts each record into `cache`.
///
/// Stops once the accumulated count reaches the total the appliance reports.
/// Returns the number of records stored.
pub async fn paginate_wan(
    api: &dyn IkuaiApi,
    cache: &VlanCache,
    stats: &ExporterStats,
    wan: &str,
    page_size: usize,
) -> Result<usize, ApiError> {
    let mut count = 0usize;

    loop {
        let page = fetch_page(api, stats, wan, count, page_size).await?;
        let fetched = page.records.len();
        debug!(
            "VLAN page of {} at offset {}: {} records (total {})",
            wan, count, fetched, page.total
        );

        for mut record in page.records {
            if record.interface.is_empty() {
                record.interface = wan.to_string();
            }
            cache.write(record.vlan_name.clone(), record).await;
        }
        count += fetched;

        if count >= page.total {
            break;
        }
        if fetched == 0 {
            warn!(
                "{} reports {} VLANs but returned an empty page at offset {}; stopping early",
                wan, page.total, count
            );
            break;
        }
    }

    Ok(count)
}
