//! IRC numeric replies consumed by the client engine.
//!
//! Only the numerics the dispatcher reacts to are enumerated; every other
//! three digit reply is ignored.
//!
//! # Reference
//! - RFC 2812: Internet Relay Chat: Client Protocol
//! - Modern IRC documentation: <https://modern.ircdocs.horse/>

#![allow(non_camel_case_types)]

use std::str::FromStr;

/// IRC server response code.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u16)]
#[non_exhaustive]
pub enum Response {
    /// 001 - Welcome to the IRC network
    RPL_WELCOME = 1,
    /// 221 - User mode string
    RPL_UMODEIS = 221,

    // WHOIS replies
    /// 311 - WHOIS user info
    RPL_WHOISUSER = 311,
    /// 312 - WHOIS server
    RPL_WHOISSERVER = 312,
    /// 313 - WHOIS operator status
    RPL_WHOISOPERATOR = 313,
    /// 314 - WHOWAS user info
    RPL_WHOWASUSER = 314,
    /// 315 - End of WHO
    RPL_ENDOFWHO = 315,
    /// 316 - WHOIS channel operator (obsolete)
    RPL_WHOISCHANOP = 316,
    /// 317 - WHOIS idle time
    RPL_WHOISIDLE = 317,
    /// 318 - End of WHOIS
    RPL_ENDOFWHOIS = 318,
    /// 319 - WHOIS channels
    RPL_WHOISCHANNELS = 319,
    /// 320 - WHOIS special
    RPL_WHOISSPECIAL = 320,
    /// 671 - WHOIS secure connection
    RPL_WHOISSECURE = 671,

    // Channel replies
    /// 324 - Channel mode
    RPL_CHANNELMODEIS = 324,
    /// 332 - Channel topic
    RPL_TOPIC = 332,
    /// 333 - Topic set by/time
    RPL_TOPICWHOTIME = 333,
    /// 353 - NAMES reply
    RPL_NAMREPLY = 353,

    // Errors
    /// 433 - Nickname is already in use
    ERR_NICKNAMEINUSE = 433,
    /// 448 - Cannot join channel (forbidden name)
    ERR_FORBIDDENCHANNEL = 448,
    /// 471 - Cannot join channel (+l)
    ERR_CHANNELISFULL = 471,
    /// 473 - Cannot join channel (+i)
    ERR_INVITEONLYCHAN = 473,
    /// 474 - Cannot join channel (+b)
    ERR_BANNEDFROMCHAN = 474,
    /// 475 - Cannot join channel (+k)
    ERR_BADCHANNELKEY = 475,
}

impl Response {
    /// The numeric value of this response.
    #[inline]
    pub fn code(&self) -> u16 {
        *self as u16
    }

    /// Creates a Response from a numeric code
    pub fn from_code(code: u16) -> Option<Response> {
        Some(match code {
            1 => Response::RPL_WELCOME,
            221 => Response::RPL_UMODEIS,
            311 => Response::RPL_WHOISUSER,
            312 => Response::RPL_WHOISSERVER,
            313 => Response::RPL_WHOISOPERATOR,
            314 => Response::RPL_WHOWASUSER,
            315 => Response::RPL_ENDOFWHO,
            316 => Response::RPL_WHOISCHANOP,
            317 => Response::RPL_WHOISIDLE,
            318 => Response::RPL_ENDOFWHOIS,
            319 => Response::RPL_WHOISCHANNELS,
            320 => Response::RPL_WHOISSPECIAL,
            671 => Response::RPL_WHOISSECURE,
            324 => Response::RPL_CHANNELMODEIS,
            332 => Response::RPL_TOPIC,
            333 => Response::RPL_TOPICWHOTIME,
            353 => Response::RPL_NAMREPLY,
            433 => Response::ERR_NICKNAMEINUSE,
            448 => Response::ERR_FORBIDDENCHANNEL,
            471 => Response::ERR_CHANNELISFULL,
            473 => Response::ERR_INVITEONLYCHAN,
            474 => Response::ERR_BANNEDFROMCHAN,
            475 => Response::ERR_BADCHANNELKEY,
            _ => return None,
        })
    }

    /// Check if this is a WHOIS line forwarded as informational text
    #[inline]
    pub fn is_whois_related(&self) -> bool {
        matches!(self.code(), 311..=320 | 671)
    }

    /// Check if this reply rejects a JOIN
    #[inline]
    pub fn is_join_failure(&self) -> bool {
        matches!(
            self,
            Response::ERR_FORBIDDENCHANNEL
                | Response::ERR_CHANNELISFULL
                | Response::ERR_INVITEONLYCHAN
                | Response::ERR_BANNEDFROMCHAN
                | Response::ERR_BADCHANNELKEY
        )
    }
}

impl FromStr for Response {
    type Err = ParseResponseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code: u16 = s.parse().map_err(|_| ParseResponseError::InvalidFormat)?;
        Response::from_code(code).ok_or(ParseResponseError::UnknownCode(code))
    }
}

impl std::fmt::Display for Response {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:03}", self.code())
    }
}

/// Error when parsing a response code
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ParseResponseError {
    /// The string was not a valid number
    InvalidFormat,
    /// The numeric code is not one the engine handles
    UnknownCode(u16),
}

impl std::fmt::Display for ParseResponseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidFormat => write!(f, "invalid response code format"),
            Self::UnknownCode(code) => write!(f, "unknown response code: {}", code),
        }
    }
}

impl std::error::Error for ParseResponseError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_code() {
        assert_eq!(Response::RPL_WELCOME.code(), 1);
        assert_eq!(Response::ERR_NICKNAMEINUSE.code(), 433);
        assert_eq!(Response::RPL_WHOISSECURE.code(), 671);
    }

    #[test]
    fn test_from_code() {
        assert_eq!(Response::from_code(1), Some(Response::RPL_WELCOME));
        assert_eq!(Response::from_code(353), Some(Response::RPL_NAMREPLY));
        assert_eq!(Response::from_code(376), None);
    }

    #[test]
    fn test_parse_and_display() {
        assert_eq!("001".parse::<Response>().unwrap(), Response::RPL_WELCOME);
        assert_eq!(
            "999".parse::<Response>(),
            Err(ParseResponseError::UnknownCode(999))
        );
        assert!("abc".parse::<Response>().is_err());
        assert_eq!(format!("{}", Response::RPL_WELCOME), "001");
    }

    #[test]
    fn test_classification() {
        assert!(Response::RPL_WHOISUSER.is_whois_related());
        assert!(Response::RPL_WHOISSECURE.is_whois_related());
        assert!(!Response::RPL_CHANNELMODEIS.is_whois_related());
        assert!(Response::ERR_BADCHANNELKEY.is_join_failure());
        assert!(!Response::ERR_NICKNAMEINUSE.is_join_failure());
    }
}
