//! Left-to-right tokenizer for the IRC line grammar.
//!
//! ```text
//! [@tags ][:prefix ]<command>[ middle...][ :trailing]
//! ```
//!
//! The prefix, tag and command tokens are recognised with nom combinators;
//! parameters are walked by hand so the trailing parameter can keep its
//! embedded spaces.

use nom::{
    bytes::complete::{take_till, take_while1},
    character::complete::char,
    error::{context, VerboseError, VerboseErrorKind},
    sequence::preceded,
    IResult,
};

use crate::error::MessageParseError;

type ParseResult<I, O> = IResult<I, O, VerboseError<I>>;

/// Parse an IRCv3 tag block (the part after `@` and before the first space).
fn parse_tags(input: &str) -> ParseResult<&str, &str> {
    context(
        "parsing message tags",
        preceded(char('@'), take_till(|c| c == ' ')),
    )(input)
}

/// Parse message prefix (the part after `:` and before the first space).
fn parse_prefix(input: &str) -> ParseResult<&str, &str> {
    context(
        "parsing message prefix",
        preceded(char(':'), take_while1(|c| c != ' ')),
    )(input)
}

/// Parse the command name: a word or a three digit numeric.
fn parse_command(input: &str) -> ParseResult<&str, &str> {
    context(
        "parsing required command",
        take_while1(|c: char| c.is_ascii_alphanumeric()),
    )(input)
}

fn skip_spaces(input: &str) -> &str {
    input.trim_start_matches(' ')
}

/// A tokenized line borrowing from its input.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ParsedLine<'a> {
    /// Raw tag block without the leading `@`.
    pub tags: Option<&'a str>,
    /// Raw prefix without the leading `:`.
    pub prefix: Option<&'a str>,
    pub command: &'a str,
    /// Middle parameters followed by the trailing parameter, if any.
    pub params: Vec<&'a str>,
}

impl<'a> ParsedLine<'a> {
    /// Tokenize one line. Trailing CR/LF are ignored.
    pub fn parse(line: &'a str) -> Result<Self, MessageParseError> {
        let input = line.trim_end_matches(['\r', '\n']);
        if input.trim().is_empty() {
            return Err(MessageParseError::EmptyMessage);
        }

        let mut rest = input;

        let mut tags = None;
        if rest.starts_with('@') {
            let (after, raw) = parse_tags(rest).map_err(|e| to_parse_error(input, e))?;
            tags = Some(raw);
            rest = skip_spaces(after);
        }

        let mut prefix = None;
        if rest.starts_with(':') {
            let (after, raw) = parse_prefix(rest)
                .map_err(|_| MessageParseError::InvalidPrefix(rest.to_string()))?;
            prefix = Some(raw);
            rest = skip_spaces(after);
        }

        if rest.is_empty() {
            return Err(MessageParseError::MissingCommand);
        }

        let (after, command) = parse_command(rest).map_err(|e| to_parse_error(input, e))?;
        if !after.is_empty() && !after.starts_with(' ') {
            return Err(MessageParseError::InvalidCommand);
        }
        rest = after;

        let mut params = Vec::new();
        while rest.starts_with(' ') {
            rest = skip_spaces(rest);
            if rest.is_empty() {
                break;
            }
            if let Some(trailing) = rest.strip_prefix(':') {
                params.push(trailing);
                break;
            }
            let end = rest.find(' ').unwrap_or(rest.len());
            params.push(&rest[..end]);
            rest = &rest[end..];
        }

        Ok(ParsedLine {
            tags,
            prefix,
            command,
            params,
        })
    }
}

fn to_parse_error(input: &str, err: nom::Err<VerboseError<&str>>) -> MessageParseError {
    match err {
        nom::Err::Error(e) | nom::Err::Failure(e) => {
            let mut position = input.len();
            let mut context_info = "parsing message";
            for (error_input, kind) in &e.errors {
                position = input.len() - error_input.len();
                if let VerboseErrorKind::Context(ctx) = kind {
                    context_info = ctx;
                }
            }
            if context_info == "parsing required command" {
                return MessageParseError::InvalidCommand;
            }
            MessageParseError::ParseContext {
                position,
                context: context_info.to_string(),
            }
        }
        nom::Err::Incomplete(_) => MessageParseError::ParseContext {
            position: input.len(),
            context: "incomplete input".to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_command() {
        let msg = ParsedLine::parse("PING").unwrap();
        assert_eq!(msg.command, "PING");
        assert!(msg.tags.is_none());
        assert!(msg.prefix.is_none());
        assert!(msg.params.is_empty());
    }

    #[test]
    fn test_parse_with_prefix_and_trailing() {
        let msg = ParsedLine::parse(":nick!user@host PRIVMSG #channel :Hello, world!").unwrap();
        assert_eq!(msg.prefix, Some("nick!user@host"));
        assert_eq!(msg.command, "PRIVMSG");
        assert_eq!(msg.params, vec!["#channel", "Hello, world!"]);
    }

    #[test]
    fn test_parse_with_crlf() {
        let msg = ParsedLine::parse("PING :server\r\n").unwrap();
        assert_eq!(msg.command, "PING");
        assert_eq!(msg.params, vec!["server"]);
    }

    #[test]
    fn test_parse_multiple_params() {
        let msg = ParsedLine::parse("USER guest 0 * :Real Name").unwrap();
        assert_eq!(msg.params, vec!["guest", "0", "*", "Real Name"]);
    }

    #[test]
    fn test_parse_collapses_repeated_spaces() {
        let msg = ParsedLine::parse(":server  MODE  #chan   +o nick ").unwrap();
        assert_eq!(msg.command, "MODE");
        assert_eq!(msg.params, vec!["#chan", "+o", "nick"]);
    }

    #[test]
    fn test_parse_empty_trailing() {
        let msg = ParsedLine::parse("PRIVMSG #channel :").unwrap();
        assert_eq!(msg.params, vec!["#channel", ""]);
    }

    #[test]
    fn test_trailing_keeps_colons_and_spaces() {
        let msg = ParsedLine::parse("PRIVMSG #c :: a :b  c").unwrap();
        assert_eq!(msg.params, vec!["#c", ": a :b  c"]);
    }

    #[test]
    fn test_parse_tags_and_prefix() {
        let msg = ParsedLine::parse("@time=2023-01-01T00:00:00Z :nick PRIVMSG #ch :Hi").unwrap();
        assert_eq!(msg.tags, Some("time=2023-01-01T00:00:00Z"));
        assert_eq!(msg.prefix, Some("nick"));
        assert_eq!(msg.params, vec!["#ch", "Hi"]);
    }

    #[test]
    fn test_rejects_empty_and_prefix_only() {
        assert_eq!(ParsedLine::parse(""), Err(MessageParseError::EmptyMessage));
        assert_eq!(ParsedLine::parse("\r\n"), Err(MessageParseError::EmptyMessage));
        assert_eq!(
            ParsedLine::parse(":irc.example.net"),
            Err(MessageParseError::MissingCommand)
        );
    }

    #[test]
    fn test_rejects_bad_command() {
        assert_eq!(
            ParsedLine::parse(":nick PRIV-MSG #c :x"),
            Err(MessageParseError::InvalidCommand)
        );
        assert_eq!(
            ParsedLine::parse("!!! hello"),
            Err(MessageParseError::InvalidCommand)
        );
    }

    #[test]
    fn test_rejects_empty_prefix() {
        assert!(matches!(
            ParsedLine::parse(": PRIVMSG #c :x"),
            Err(MessageParseError::InvalidPrefix(_))
        ));
    }
}
