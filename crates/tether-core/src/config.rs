//! # Session Configuration
//!
//! Settings the dispatcher needs from the surrounding session.
//!
//! ## Environment Variables
//!
//! - `TETHER_TRANSPORT`: how the remote debugger is connected (`stdio`, `tcp`
//!   or `serial`, default: `tcp`)
//! - `TETHER_NON_STOP`: start in non-stop mode (`1`/`true`/`on` or
//!   `0`/`false`/`off`, default: off)

use std::env;
use std::str::FromStr;

use crate::error::{TargetError, TargetResult};

/// How the remote debugger reaches the stub
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Transport
{
    /// Protocol runs over the stub's own stdin/stdout
    Stdio,
    /// TCP socket (default)
    #[default]
    Tcp,
    /// Serial line
    Serial,
}

impl Transport
{
    /// `true` when the protocol shares the stub's standard streams
    ///
    /// Console diagnostics are suppressed in that case, since the remote
    /// debugger's user already sees the same events in the same terminal.
    #[must_use]
    pub fn is_simple_stream(self) -> bool
    {
        matches!(self, Transport::Stdio)
    }
}

impl FromStr for Transport
{
    type Err = TargetError;

    fn from_str(s: &str) -> Result<Self, Self::Err>
    {
        match s.to_lowercase().as_str() {
            "stdio" | "-" => Ok(Transport::Stdio),
            "tcp" => Ok(Transport::Tcp),
            "serial" | "tty" => Ok(Transport::Serial),
            _ => Err(TargetError::InvalidConfig(format!(
                "Unknown transport: {s}. Use 'stdio', 'tcp' or 'serial'"
            ))),
        }
    }
}

/// Session settings consumed by the [`Dispatcher`](crate::Dispatcher)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SessionConfig
{
    /// Transport the protocol runs over
    pub transport: Transport,
    /// Initial execution mode (`false` = all-stop)
    pub non_stop: bool,
}

impl SessionConfig
{
    /// Read the configuration from `TETHER_TRANSPORT` / `TETHER_NON_STOP`
    ///
    /// Unset variables fall back to the defaults.
    ///
    /// ## Errors
    ///
    /// Returns `InvalidConfig` if a variable is set to an unrecognized value.
    pub fn from_env() -> TargetResult<Self>
    {
        let transport = env::var("TETHER_TRANSPORT").ok();
        let non_stop = env::var("TETHER_NON_STOP").ok();
        Self::from_values(transport.as_deref(), non_stop.as_deref())
    }

    /// Build a configuration from optional raw values
    ///
    /// ## Errors
    ///
    /// Returns `InvalidConfig` if a value is unrecognized.
    pub fn from_values(transport: Option<&str>, non_stop: Option<&str>) -> TargetResult<Self>
    {
        let transport = transport.map(Transport::from_str).transpose()?.unwrap_or_default();
        let non_stop = non_stop.map(parse_flag).transpose()?.unwrap_or(false);
        Ok(Self { transport, non_stop })
    }

    /// Builder-style transport override
    #[must_use]
    pub fn with_transport(mut self, transport: Transport) -> Self
    {
        self.transport = transport;
        self
    }

    /// Builder-style initial mode override
    #[must_use]
    pub fn with_non_stop(mut self, non_stop: bool) -> Self
    {
        self.non_stop = non_stop;
        self
    }
}

fn parse_flag(s: &str) -> TargetResult<bool>
{
    match s.to_lowercase().as_str() {
        "1" | "true" | "on" | "yes" => Ok(true),
        "0" | "false" | "off" | "no" => Ok(false),
        _ => Err(TargetError::InvalidConfig(format!("Unknown flag value: {s}"))),
    }
}

#[cfg(test)]
mod tests
{
    use super::*;

    #[test]
    fn test_transport_from_str()
    {
        assert_eq!(Transport::from_str("stdio").unwrap(), Transport::Stdio);
        assert_eq!(Transport::from_str("TCP").unwrap(), Transport::Tcp);
        assert_eq!(Transport::from_str("serial").unwrap(), Transport::Serial);
        assert!(Transport::from_str("pigeon").is_err());
    }

    #[test]
    fn test_only_stdio_is_simple_stream()
    {
        assert!(Transport::Stdio.is_simple_stream());
        assert!(!Transport::Tcp.is_simple_stream());
        assert!(!Transport::Serial.is_simple_stream());
    }

    #[test]
    fn test_from_values_defaults()
    {
        let config = SessionConfig::from_values(None, None).unwrap();
        assert_eq!(config, SessionConfig::default());
        assert_eq!(config.transport, Transport::Tcp);
        assert!(!config.non_stop);
    }

    #[test]
    fn test_from_values_parses_both()
    {
        let config = SessionConfig::from_values(Some("stdio"), Some("on")).unwrap();
        assert_eq!(config.transport, Transport::Stdio);
        assert!(config.non_stop);

        let err = SessionConfig::from_values(None, Some("maybe")).unwrap_err();
        assert!(matches!(err, TargetError::InvalidConfig(_)));
    }
}
