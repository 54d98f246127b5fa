//! Probe target parsing.
//!
//! A scrape names its target as `host` or `host:port` in the `target`
//! query parameter. The host is passed to iperf3 verbatim; no DNS
//! lookup happens here. Bracketed IPv6 literals are not understood, so
//! anything with more than one colon is rejected as ambiguous.

use std::fmt;
use std::str::FromStr;

use super::error::TargetError;

/// Port used when the target omits one (iperf3's default server port).
pub const DEFAULT_PORT: u16 = 5201;

/// Remote iperf3 server to measure against.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Target {
    /// Hostname or IP address, never empty.
    pub host: String,
    /// Server port, never zero.
    pub port: u16,
}

impl Target {
    /// Parse a `host[:port]` string.
    ///
    /// # Errors
    /// - [`TargetError::AmbiguousTarget`] for more than one `:`
    /// - [`TargetError::InvalidPort`] when the port is not a `u16`
    /// - [`TargetError::EmptyTarget`] when host is empty or port is zero
    pub fn parse(raw: &str) -> Result<Self, TargetError> {
        let parts: Vec<&str> = raw.split(':').collect();

        let target = match parts.as_slice() {
            [host] => Self {
                host: (*host).to_string(),
                port: DEFAULT_PORT,
            },
            [host, port] => {
                let port = port.parse::<u16>().map_err(|source| {
                    TargetError::InvalidPort {
                        port: (*port).to_string(),
                        source,
                    }
                })?;
                Self {
                    host: (*host).to_string(),
                    port,
                }
            }
            _ => return Err(TargetError::AmbiguousTarget(raw.to_string())),
        };

        if target.host.is_empty() || target.port == 0 {
            return Err(TargetError::EmptyTarget);
        }

        Ok(target)
    }
}

impl FromStr for Target {
    type Err = TargetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_host_only_uses_default_port() {
        let t = Target::parse("foobar.tld").unwrap();
        assert_eq!(
            t,
            Target {
                host: "foobar.tld".to_string(),
                port: 5201
            }
        );
    }

    #[test]
    fn test_host_and_port() {
        let t = Target::parse("foobar.tld:1234").unwrap();
        assert_eq!(t.host, "foobar.tld");
        assert_eq!(t.port, 1234);
    }

    #[test]
    fn test_too_many_colons_is_ambiguous() {
        let err = Target::parse("foobar:foobar:foobar").unwrap_err();
        assert!(matches!(err, TargetError::AmbiguousTarget(_)));

        let err = Target::parse("fe80::1").unwrap_err();
        assert!(matches!(err, TargetError::AmbiguousTarget(_)));
    }

    #[test]
    fn test_empty_input() {
        assert!(matches!(
            Target::parse("").unwrap_err(),
            TargetError::EmptyTarget
        ));
    }

    #[test]
    fn test_missing_host() {
        assert!(matches!(
            Target::parse(":1234").unwrap_err(),
            TargetError::EmptyTarget
        ));
    }

    #[test]
    fn test_zero_port_is_empty() {
        assert!(matches!(
            Target::parse("host:0").unwrap_err(),
            TargetError::EmptyTarget
        ));
    }

    #[test]
    fn test_non_numeric_port() {
        let err = Target::parse("host:notanumber").unwrap_err();
        assert!(matches!(err, TargetError::InvalidPort { ref port, .. } if port == "notanumber"));
    }

    #[test]
    fn test_out_of_range_and_negative_ports() {
        assert!(matches!(
            Target::parse("host:70000").unwrap_err(),
            TargetError::InvalidPort { .. }
        ));
        assert!(matches!(
            Target::parse("host:-1").unwrap_err(),
            TargetError::InvalidPort { .. }
        ));
        assert!(matches!(
            Target::parse("host:").unwrap_err(),
            TargetError::InvalidPort { .. }
        ));
    }

    #[test]
    fn test_display_and_from_str() {
        let t: Target = "10.0.0.1:5202".parse().unwrap();
        assert_eq!(t.to_string(), "10.0.0.1:5202");
    }
}
