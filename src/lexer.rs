//! The lexical scanner: turns UTF-8 PXD text into a linear token stream,
//! plus the custom-string extracted from the header (`spec.md` §4.1).

use crate::datetime;
use crate::error::{warn_or_escalate, PxdError};
use crate::hex;
use crate::token::{Token, TokenKind};
use crate::xml_escape;

/// The highest `pxd` header version this implementation understands.
/// Anything greater triggers a warning (or, under warn-as-error, a fatal
/// [`PxdError::VersionUnsupported`]).
pub const SUPPORTED_VERSION: f64 = 1.0;

/// What a `<...>` or bare `=` token means right now: it depends on whether
/// we are inside an open table header (`spec.md` §4.1's table-header row).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum TableMode {
  /// Not inside a table header or row body: `<...>` is `Str`.
  None,
  /// Just saw `[=`: the next `<...>` is the `TableName`.
  AwaitName,
  /// Read the name: `<...>` tokens are `TableFieldName`s until a bare `=`.
  AwaitFieldOrRows,
  /// Past the bare `=`: `<...>` tokens revert to `Str` (row cell values).
  InRows,
}

/// Scans complete UTF-8 text into a token stream. Single-use: [`Lexer::scan`]
/// consumes `self`.
pub struct Lexer<'a> {
  text: &'a str,
  pos: usize,
  warn_as_error: bool,
  custom: String,
  mode: TableMode,
}

impl<'a> Lexer<'a> {
  /// Validates and consumes the header line (`pxd <version>[ <custom>]`),
  /// leaving the cursor at the first byte of the body.
  pub fn new(text: &'a str, warn_as_error: bool) -> Result<Self, PxdError> {
    let newline_idx = text.find('\n').ok_or(PxdError::HeaderMissing)?;
    let header_line = &text[..newline_idx];
    let parts = split_header(header_line);
    // Matches the precedence in examples/original_source/pxd.py:61-65: a
    // missing version field is reported before the first word is checked
    // against "pxd", even for a single-word header that is also not "pxd".
    if parts.len() < 2 {
      return Err(PxdError::HeaderInvalid(1, "missing version field".into()));
    }
    if parts[0] != "pxd" {
      return Err(PxdError::NotPxd(1));
    }
    let version_str = &parts[1];
    // The original implementation treats a non-numeric version as a warning,
    // not a fatal error (see examples/original_source/pxd.py); we follow it.
    let version = match version_str.parse::<f64>() {
      Ok(v) => v,
      Err(_) => {
        if warn_as_error {
          return Err(PxdError::HeaderInvalid(
            1,
            format!("failed to read pxd file version number: {:?}", version_str),
          ));
        }
        log::warn!("1: failed to read pxd file version number: {:?}", version_str);
        SUPPORTED_VERSION
      }
    };
    if version > SUPPORTED_VERSION {
      warn_or_escalate(warn_as_error, 1, version, SUPPORTED_VERSION)?;
    }
    let custom = parts.get(2).map(|s| s.to_string()).unwrap_or_default();
    Ok(Self {
      text,
      pos: newline_idx + 1,
      warn_as_error,
      custom,
      mode: TableMode::None,
    })
  }

  /// The header's custom string, or `""` if none was present.
  pub fn custom(&self) -> &str {
    &self.custom
  }

  /// Scans the whole body, returning its token stream (always `Eof`-terminated).
  pub fn scan(mut self) -> Result<Vec<Token>, PxdError> {
    let mut tokens = Vec::new();
    loop {
      self.skip_whitespace();
      if self.at_end() {
        tokens.push(Token::new(TokenKind::Eof, self.pos));
        return Ok(tokens);
      }
      let start = self.pos;
      let c = self.advance_char();
      tokens.push(self.scan_token(c, start)?);
    }
  }

  fn scan_token(&mut self, c: char, start: usize) -> Result<Token, PxdError> {
    match c {
      '[' => {
        if self.peek_char() == Some('=') {
          self.advance_char();
          self.mode = TableMode::AwaitName;
          Ok(Token::new(TokenKind::TableBegin, start))
        } else {
          Ok(Token::new(TokenKind::ListBegin, start))
        }
      }
      ']' => Ok(Token::new(TokenKind::ListEnd, start)),
      '{' => Ok(Token::new(TokenKind::DictBegin, start)),
      '}' => Ok(Token::new(TokenKind::DictEnd, start)),
      '=' => self.scan_equals(start),
      '<' => self.read_text_token(start),
      '(' => self.read_bytes_token(start),
      '-' if self.peek_char().map_or(false, |c| c.is_ascii_digit()) => {
        self.advance_char();
        self.read_number_or_date(start)
      }
      c if c.is_ascii_digit() => self.read_number_or_date(start),
      c if c.is_alphabetic() => self.read_keyword(start),
      other => Err(self.lex_error(start, format!("invalid character encountered: {:?}", other))),
    }
  }

  fn scan_equals(&mut self, start: usize) -> Result<Token, PxdError> {
    if self.peek_char() == Some(']') {
      self.advance_char();
      self.mode = TableMode::None;
      Ok(Token::new(TokenKind::TableEnd, start))
    } else if self.mode == TableMode::AwaitFieldOrRows {
      // Whether at least one field name was read is a parser concern
      // (spec.md §4.2, §7: a zero-field-name table is a Parse error, not a
      // lexical one) — always emit the token and let the parser reject it.
      self.mode = TableMode::InRows;
      Ok(Token::new(TokenKind::TableRows, start))
    } else {
      Err(self.lex_error(start, "unexpected '=' outside a table header".into()))
    }
  }

  fn read_text_token(&mut self, start: usize) -> Result<Token, PxdError> {
    let content_start = self.pos;
    let end = self.find_closing('>')
      .ok_or_else(|| self.lex_error(start, "unterminated string".into()))?;
    let raw = &self.text[content_start..end];
    self.pos = end + 1;
    let content = xml_escape::unescape(raw);
    let kind = match self.mode {
      TableMode::AwaitName => {
        self.mode = TableMode::AwaitFieldOrRows;
        TokenKind::TableName(content)
      }
      TableMode::AwaitFieldOrRows => TokenKind::TableFieldName(content),
      TableMode::None | TableMode::InRows => TokenKind::Str(content),
    };
    Ok(Token::new(kind, start))
  }

  fn read_bytes_token(&mut self, start: usize) -> Result<Token, PxdError> {
    let content_start = self.pos;
    let end = self.find_closing(')')
      .ok_or_else(|| self.lex_error(start, "unterminated bytes".into()))?;
    let raw = &self.text[content_start..end];
    self.pos = end + 1;
    let bytes = hex::decode(raw)
      .ok_or_else(|| self.lex_error(start, format!("invalid hex byte literal: {:?}", raw)))?;
    Ok(Token::new(TokenKind::Bytes(bytes), start))
  }

  fn read_number_or_date(&mut self, start: usize) -> Result<Token, PxdError> {
    while let Some(c) = self.peek_char() {
      if matches!(c, '-' | '+' | '.' | ':' | 'e' | 'E' | 'T' | 'Z') || c.is_ascii_digit() {
        self.advance_char();
      } else {
        break;
      }
    }
    let run = &self.text[start..self.pos];
    self.classify_and_build(run, start)
  }

  fn classify_and_build(&self, run: &str, start: usize) -> Result<Token, PxdError> {
    if run.contains(':') || run.contains('T') || run.contains('Z') {
      let dt = datetime::parse_datetime(run).map_err(|m| self.lex_error(start, m))?;
      Ok(Token::new(TokenKind::DateTime(dt), start))
    } else if run.matches('-').count() == 2 {
      let d = datetime::parse_date(run).map_err(|m| self.lex_error(start, m))?;
      Ok(Token::new(TokenKind::Date(d), start))
    } else if run.contains('.') || run.contains('e') || run.contains('E') {
      let r: f64 = run
        .parse()
        .map_err(|_| self.lex_error(start, format!("invalid real number literal: {:?}", run)))?;
      Ok(Token::new(TokenKind::Real(r), start))
    } else {
      let i: i64 = run
        .parse()
        .map_err(|_| self.lex_error(start, format!("invalid integer literal: {:?}", run)))?;
      Ok(Token::new(TokenKind::Int(i), start))
    }
  }

  fn read_keyword(&mut self, start: usize) -> Result<Token, PxdError> {
    while let Some(c) = self.peek_char() {
      if c.is_alphabetic() {
        self.advance_char();
      } else {
        break;
      }
    }
    let word = &self.text[start..self.pos];
    match word {
      "null" => Ok(Token::new(TokenKind::Null, start)),
      "no" | "false" => Ok(Token::new(TokenKind::Bool(false), start)),
      "yes" | "true" => Ok(Token::new(TokenKind::Bool(true), start)),
      other => Err(self.lex_error(start, format!("unknown keyword literal: {:?}", other))),
    }
  }

  fn find_closing(&self, needle: char) -> Option<usize> {
    if needle.is_ascii() {
      memchr::memchr(needle as u8, self.text[self.pos..].as_bytes()).map(|i| self.pos + i)
    } else {
      self.text[self.pos..].find(needle).map(|i| self.pos + i)
    }
  }

  fn skip_whitespace(&mut self) {
    while let Some(c) = self.peek_char() {
      if c.is_whitespace() {
        self.advance_char();
      } else {
        break;
      }
    }
  }

  fn at_end(&self) -> bool {
    self.pos >= self.text.len()
  }

  fn peek_char(&self) -> Option<char> {
    self.text[self.pos..].chars().next()
  }

  fn advance_char(&mut self) -> char {
    let c = self.peek_char().expect("advance_char called at end of input");
    self.pos += c.len_utf8();
    c
  }

  fn lex_error(&self, offset: usize, message: String) -> PxdError {
    PxdError::Lex(line_at(self.text, offset), message)
  }
}

/// The 1-based line number containing byte offset `offset`, derived by
/// counting newlines in the prefix rather than tracked during scanning
/// (`spec.md` §9, "Diagnostic line numbers").
pub fn line_at(text: &str, offset: usize) -> usize {
  text.as_bytes()[..offset.min(text.len())]
    .iter()
    .filter(|&&b| b == b'\n')
    .count()
    + 1
}

/// Splits a header line the way `str.split(None, 2)` would in the original
/// implementation: up to three whitespace-delimited parts, the third
/// retaining any internal whitespace verbatim (`spec.md` §9, open question 2).
fn split_header(line: &str) -> Vec<&str> {
  let mut parts = Vec::with_capacity(3);
  let mut rest = line;
  for _ in 0..2 {
    let trimmed = rest.trim_start();
    if trimmed.is_empty() {
      return parts;
    }
    let idx = trimmed.find(char::is_whitespace).unwrap_or(trimmed.len());
    parts.push(&trimmed[..idx]);
    rest = &trimmed[idx..];
  }
  let trimmed_rest = rest.trim_start();
  if !trimmed_rest.is_empty() {
    parts.push(trimmed_rest);
  }
  parts
}
