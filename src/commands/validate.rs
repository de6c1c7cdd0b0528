//! Client-side payload validation

use once_cell::sync::Lazy;
use regex::Regex;

use super::CommandError;

const OCTET: &str = r"(25[0-5]|2[0-4][0-9]|1[0-9][0-9]|[1-9]?[0-9])";

static PEER_ADDRESS: Lazy<Regex> = Lazy::new(|| {
    let pattern = format!(r"^{o}\.{o}\.{o}\.{o}(:(\d{{1,5}}))?$", o = OCTET);
    Regex::new(&pattern).expect("peer address pattern is valid")
});

/// Check that `addr` is a dotted-quad IPv4 address, optionally followed
/// by `:port`
pub fn validate_peer_address(addr: &str) -> Result<(), CommandError> {
    let invalid = || CommandError::InvalidAddress(addr.to_string());

    let captures = PEER_ADDRESS.captures(addr).ok_or_else(invalid)?;

    if let Some(port) = captures.get(6) {
        match port.as_str().parse::<u16>() {
            Ok(p) if p > 0 => {}
            _ => return Err(invalid()),
        }
    }

    Ok(())
}
