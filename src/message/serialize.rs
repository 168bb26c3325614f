use std::fmt;

use super::Message;

fn needs_colon(param: &str) -> bool {
    param.is_empty() || param.contains(' ') || param.starts_with(':')
}

impl fmt::Display for Message {
    /// Writes the wire form without the CRLF terminator.
    ///
    /// Only the final parameter may carry a `:`; it does when it is empty,
    /// contains a space, or itself starts with `:`. Text-bearing commands
    /// always mark their last parameter as trailing.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(source) = &self.source {
            write!(f, ":{} ", source)?;
        }
        f.write_str(&self.command)?;

        let Some((last, middle)) = self.params.split_last() else {
            return Ok(());
        };
        for param in middle {
            write!(f, " {}", param)?;
        }
        if needs_colon(last) || (!middle.is_empty() && carries_text(&self.command)) {
            write!(f, " :{}", last)
        } else {
            write!(f, " {}", last)
        }
    }
}

fn carries_text(command: &str) -> bool {
    ["PRIVMSG", "NOTICE", "PART", "KICK", "TOPIC", "QUIT", "USER"]
        .iter()
        .any(|c| command.eq_ignore_ascii_case(c))
}
