//! Address-to-side resolution
//!
//! Maps a participant's network address to one of the two configured sides
//! via the first active station that lists the address.

use std::net::{IpAddr, SocketAddr};

use crate::config::schema::{MatchConfig, Side};

/// Outcome of resolving an address against the configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SideResolution<'a> {
    /// The address belongs to an active station bound to this side.
    Assigned(&'a Side),
    /// Unknown, unparseable, inactive or side-less station.
    Unassigned,
}

impl<'a> SideResolution<'a> {
    /// Returns the side, if assigned.
    #[must_use]
    pub const fn side(self) -> Option<&'a Side> {
        match self {
            Self::Assigned(side) => Some(side),
            Self::Unassigned => None,
        }
    }
}

/// Resolves `address` to a side.
///
/// Accepts `ip`, `ip:port` and `[v6]:port`. Pure and deterministic.
#[must_use]
pub fn resolve_side<'a>(address: &str, config: &'a MatchConfig) -> SideResolution<'a> {
    let Some(ip) = parse_host(address) else {
        return SideResolution::Unassigned;
    };

    config
        .stations
        .iter()
        .find(|station| station.active && station.addresses.contains(&ip))
        .and_then(|station| config.sides.iter().find(|s| s.station_id == station.id))
        .map_or(SideResolution::Unassigned, SideResolution::Assigned)
}

/// Extracts the IP from an address, dropping any port.
fn parse_host(address: &str) -> Option<IpAddr> {
    let address = address.trim();
    if let Ok(socket) = address.parse::<SocketAddr>() {
        return Some(socket.ip());
    }
    if let Ok(ip) = address.parse::<IpAddr>() {
        return Some(ip);
    }
    // "[v6]" without port, or "host:port" forms the std parsers reject
    let host = address
        .strip_prefix('[')
        .and_then(|rest| rest.split(']').next())
        .or_else(|| address.split(':').next())?;
    host.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::Station;
    use crate::model::{SideOrdinal, TeamLabel};

    fn config() -> MatchConfig {
        let mut config = MatchConfig::default();
        config.stations[0].addresses = vec!["10.0.0.1".parse().unwrap()];
        config.stations[1].addresses = vec!["10.0.0.2".parse().unwrap(), "::1".parse().unwrap()];
        config
    }

    fn ordinal(address: &str, config: &MatchConfig) -> Option<SideOrdinal> {
        resolve_side(address, config).side().map(|s| s.ordinal)
    }

    #[test]
    fn address_with_port_resolves() {
        let config = config();
        let side = resolve_side("10.0.0.1:27005", &config).side().unwrap();
        assert_eq!(side.ordinal, SideOrdinal::One);
        assert_eq!(side.default_team, TeamLabel::Ct);
    }

    #[test]
    fn bare_address_resolves() {
        assert_eq!(ordinal("10.0.0.2", &config()), Some(SideOrdinal::Two));
    }

    #[test]
    fn ipv6_forms_resolve() {
        let config = config();
        assert_eq!(ordinal("[::1]:27005", &config), Some(SideOrdinal::Two));
        assert_eq!(ordinal("::1", &config), Some(SideOrdinal::Two));
        assert_eq!(ordinal("[::1]", &config), Some(SideOrdinal::Two));
    }

    #[test]
    fn unknown_address_unassigned() {
        let config = config();
        assert_eq!(resolve_side("10.9.9.9:1", &config), SideResolution::Unassigned);
        assert_eq!(resolve_side("", &config), SideResolution::Unassigned);
        assert_eq!(resolve_side("garbage", &config), SideResolution::Unassigned);
    }

    #[test]
    fn inactive_station_unassigned() {
        let mut config = config();
        config.stations[0].active = false;
        assert_eq!(ordinal("10.0.0.1:27005", &config), None);
    }

    #[test]
    fn station_without_side_unassigned() {
        let mut config = config();
        config.stations.push(Station {
            id: 9,
            name: "Spare".to_string(),
            active: true,
            addresses: vec!["10.0.0.9".parse().unwrap()],
        });
        assert_eq!(ordinal("10.0.0.9", &config), None);
    }

    #[test]
    fn first_active_station_wins() {
        let mut config = config();
        config.stations[0].active = false;
        config.stations[1].addresses.push("10.0.0.1".parse().unwrap());
        assert_eq!(ordinal("10.0.0.1", &config), Some(SideOrdinal::Two));
    }

    #[test]
    fn resolution_is_idempotent() {
        let config = config();
        let first = resolve_side("10.0.0.2:1", &config);
        let second = resolve_side("10.0.0.2:1", &config);
        assert_eq!(first, second);
    }
}
