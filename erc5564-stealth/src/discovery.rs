//! Payment discovery (recipient scan).
//!
//! A recipient holding the viewing secret key and the spending public key can
//! tell whether an announcement is theirs. The spending secret key is never
//! needed here.

use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use erc5564_core::error::{Result, StealthError};
use erc5564_core::types::{Announcement, EthAddress, MetadataKind, PublicKey, SecretKey};
use erc5564_crypto::{compute_shared_secret, verify_stealth_address, view_tag_matches};

/// Checks whether `stealth_address` belongs to the holder of `viewing_sk`.
///
/// The shared secret's first byte is compared against `view_tag` before any
/// further work; a mismatch returns `Ok(false)` without deriving the stealth
/// point.
///
/// # Errors
/// Only curve failures surface as errors. "Not mine" is `Ok(false)`.
#[instrument(skip_all, fields(view_tag = view_tag))]
pub fn check_stealth_address(
    stealth_address: &EthAddress,
    ephemeral_pk: &PublicKey,
    viewing_sk: &SecretKey,
    spending_pk: &PublicKey,
    view_tag: u8,
) -> Result<bool> {
    let digest = compute_shared_secret(viewing_sk, ephemeral_pk)?;

    if !view_tag_matches(&digest, view_tag) {
        return Ok(false);
    }

    let is_ours = verify_stealth_address(spending_pk, &digest, stealth_address)?;
    debug!(%stealth_address, is_ours, "View tag matched");
    Ok(is_ours)
}

/// A payment found while scanning.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscoveredPayment {
    /// Address holding the funds
    pub stealth_address: EthAddress,
    /// Ephemeral key needed to recover the stealth secret key
    pub ephemeral_pk: PublicKey,
    /// View tag from the announcement
    pub view_tag: u8,
    /// Transfer description, when the announcement carried metadata
    #[serde(skip)]
    pub transfer: Option<MetadataKind>,
}

impl From<&Announcement> for DiscoveredPayment {
    fn from(announcement: &Announcement) -> Self {
        Self {
            stealth_address: announcement.stealth_address,
            ephemeral_pk: announcement.ephemeral_pk,
            view_tag: announcement.view_tag,
            transfer: announcement.metadata.map(|m| m.kind()),
        }
    }
}

/// Result of scanning a single announcement.
#[derive(Debug)]
pub enum ScanResult {
    /// View tag didn't match - not for this recipient
    NotForUs,
    /// View tag matched but the address did not (1 in 256 for foreign announcements)
    TagCollision,
    /// View tag and address matched - payment discovered
    Discovered(DiscoveredPayment),
    /// Announcement was malformed or failed a curve operation
    Invalid(StealthError),
}

impl ScanResult {
    /// Returns true if a payment was discovered.
    pub fn is_discovered(&self) -> bool {
        matches!(self, ScanResult::Discovered(_))
    }

    /// Returns the discovered payment if present.
    pub fn into_payment(self) -> Option<DiscoveredPayment> {
        match self {
            ScanResult::Discovered(payment) => Some(payment),
            _ => None,
        }
    }
}

/// Statistics for scanning operations.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScanStats {
    /// Total announcements scanned
    pub total_scanned: u64,
    /// Number of view tag matches
    pub view_tag_matches: u64,
    /// View tag matches whose address differed
    pub tag_collisions: u64,
    /// Number of payments discovered
    pub discoveries: u64,
    /// Number of invalid announcements
    pub errors: u64,
    /// Duration of the scan in milliseconds
    pub duration_ms: u64,
}

impl ScanStats {
    /// Creates a new stats tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a scan result.
    pub fn record(&mut self, result: &ScanResult) {
        self.total_scanned += 1;
        match result {
            ScanResult::Discovered(_) => {
                self.view_tag_matches += 1;
                self.discoveries += 1;
            }
            ScanResult::TagCollision => {
                self.view_tag_matches += 1;
                self.tag_collisions += 1;
            }
            ScanResult::Invalid(_) => {
                self.errors += 1;
            }
            ScanResult::NotForUs => {}
        }
    }

    /// Returns the scan rate (announcements per second).
    pub fn rate(&self) -> f64 {
        if self.duration_ms == 0 {
            0.0
        } else {
            (self.total_scanned as f64 / self.duration_ms as f64) * 1000.0
        }
    }

    /// Returns the filter efficiency (percentage of announcements filtered).
    pub fn filter_efficiency(&self) -> f64 {
        if self.total_scanned == 0 {
            0.0
        } else {
            ((self.total_scanned - self.view_tag_matches) as f64 / self.total_scanned as f64) * 100.0
        }
    }
}

/// Scans one announcement with the viewing secret key and spending public key.
pub fn scan_announcement(
    announcement: &Announcement,
    viewing_sk: &SecretKey,
    spending_pk: &PublicKey,
) -> ScanResult {
    if let Err(e) = announcement.validate() {
        return ScanResult::Invalid(e);
    }

    let digest = match compute_shared_secret(viewing_sk, &announcement.ephemeral_pk) {
        Ok(digest) => digest,
        Err(e) => return ScanResult::Invalid(e),
    };

    if !view_tag_matches(&digest, announcement.view_tag) {
        return ScanResult::NotForUs;
    }

    match verify_stealth_address(spending_pk, &digest, &announcement.stealth_address) {
        Ok(true) => ScanResult::Discovered(DiscoveredPayment::from(announcement)),
        Ok(false) => ScanResult::TagCollision,
        Err(e) => ScanResult::Invalid(e),
    }
}

/// Scans announcements in order and returns the matches with their indices.
pub fn scan_announcements(
    announcements: &[Announcement],
    viewing_sk: &SecretKey,
    spending_pk: &PublicKey,
) -> Vec<(usize, DiscoveredPayment)> {
    scan_announcements_with_stats(announcements, viewing_sk, spending_pk).0
}

/// Scans announcements and reports per-outcome counts.
#[instrument(skip_all, fields(count = announcements.len()))]
pub fn scan_announcements_with_stats(
    announcements: &[Announcement],
    viewing_sk: &SecretKey,
    spending_pk: &PublicKey,
) -> (Vec<(usize, DiscoveredPayment)>, ScanStats) {
    let start = Instant::now();
    let mut stats = ScanStats::new();
    let mut discoveries = Vec::new();

    for (index, announcement) in announcements.iter().enumerate() {
        let result = scan_announcement(announcement, viewing_sk, spending_pk);
        stats.record(&result);

        match result {
            ScanResult::Discovered(payment) => {
                debug!(index, stealth_address = %payment.stealth_address, "Discovered payment");
                discoveries.push((index, payment));
            }
            ScanResult::Invalid(e) => {
                debug!(index, error = %e, "Skipping invalid announcement");
            }
            ScanResult::NotForUs | ScanResult::TagCollision => {}
        }
    }

    stats.duration_ms = start.elapsed().as_millis() as u64;
    info!(
        scanned = stats.total_scanned,
        discoveries = stats.discoveries,
        errors = stats.errors,
        "Scan complete"
    );

    (discoveries, stats)
}
