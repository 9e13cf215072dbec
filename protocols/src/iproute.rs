//! # Blackhole Route Scripts
//!
//! Builds the `sh` scripts sent to nodes and parses what they print back.
//!
//! * `ip route replace blackhole <addr>` is idempotent, so installing needs no
//!   pre-check.
//! * `ip route del blackhole <addr>` fails for a missing route, so deletion is
//!   restricted to routes a preceding listing showed.
//! * `ip route show` lists IPv4 routes only; both families are listed
//!   explicitly.

use blackhole_common::network::AddressSet;
use thiserror::Error;

/// First field of every line `ip route show type blackhole` prints.
pub const BLACKHOLE: &str = "blackhole";

/// Lists blackhole routes of both address families.
pub const LIST_BLACKHOLES_SCRIPT: &str = "ip -4 route show type blackhole\nip -6 route show type blackhole\n";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid route {line:?}")]
pub struct InvalidRoute {
    pub line: String,
}

/// One `ip route replace blackhole` line per address, in the given order.
pub fn replace_script<S: AsRef<str>>(addresses: &[S]) -> String {
    route_script("replace", addresses.iter().map(AsRef::as_ref))
}

/// One `ip route del blackhole` line per requested address that is `present`,
/// in request order.
///
/// Returns `None` when nothing needs deleting: deleting an absent route is an
/// error on the node, so no script must be sent at all.
pub fn delete_script<S: AsRef<str>>(requested: &[S], present: &AddressSet) -> Option<String> {
    let script = route_script(
        "del",
        requested
            .iter()
            .map(AsRef::as_ref)
            .filter(|address| present.contains(address)),
    );

    if script.is_empty() { None } else { Some(script) }
}

fn route_script<'a>(verb: &str, addresses: impl Iterator<Item = &'a str>) -> String {
    let mut script = String::new();
    for address in addresses {
        script.push_str("ip route ");
        script.push_str(verb);
        script.push(' ');
        script.push_str(BLACKHOLE);
        script.push(' ');
        script.push_str(address.trim());
        script.push('\n');
    }
    script
}

/// Parses the output of [`LIST_BLACKHOLES_SCRIPT`].
///
/// Expected shapes:
/// - ipv4: `blackhole 172.217.22.14`
/// - ipv6: `blackhole 2a00:1450:4028:809::200e dev lo metric 1024 pref medium`
///
/// Blank lines are skipped. Any other line fails the whole parse: silently
/// dropping it could hide a blackhole that is in effect.
pub fn parse_blackholes(output: &str) -> Result<AddressSet, InvalidRoute> {
    let mut routes = AddressSet::new();

    for line in output.lines() {
        if line.trim().is_empty() {
            continue;
        }
        routes.insert(parse_line(line)?);
    }

    Ok(routes)
}

fn parse_line(line: &str) -> Result<&str, InvalidRoute> {
    let mut fields = line.split_whitespace();

    match (fields.next(), fields.next()) {
        (Some(BLACKHOLE), Some(address)) => Ok(address),
        _ => Err(InvalidRoute {
            line: line.to_string(),
        }),
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
