//! Recognition of anti-bot interstitials served in place of the profile.

/// Body fragments that only appear on challenge or block pages.
pub const BLOCK_SIGNATURES: &[&str] = &[
    "cf-wrapper",
    "Cloudflare",
    "Sorry, you have been blocked",
    "Access denied",
    "Ray ID",
];

/// Returns `true` if the response is a block page rather than content.
///
/// Any 403 counts, as does any body containing a known signature
/// (case-sensitive).
#[must_use]
pub fn is_block_page(status: u16, body: &str) -> bool {
    status == 403 || block_signature(body).is_some()
}

/// First signature found in `body`, for logging.
#[must_use]
pub fn block_signature(body: &str) -> Option<&'static str> {
    BLOCK_SIGNATURES
        .iter()
        .copied()
        .find(|signature| body.contains(signature))
}
