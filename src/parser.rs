//! The state-machine parser: assembles a token stream into a single root
//! [`Value`] (`spec.md` §4.2).
//!
//! The states named in `spec.md` (`Collection`, `DictKey`, `DictValue`,
//! `AnyValue`, `TableName`, `TableFieldName`, `TableValue`, `Eof`) are
//! represented here as a stack of [`Frame`]s: each frame owns both the
//! partially built container *and* which of those states it currently
//! expects, so the state and the data it mutates can never drift apart.

use crate::error::PxdError;
use crate::lexer::line_at;
use crate::table::Table;
use crate::token::{Token, TokenKind};
use crate::value::{Dict, DictKey, Value};

/// Suggested nesting limit from `spec.md` §4.2 ("Tie-breaks and edge cases").
pub const DEFAULT_DEPTH_CAP: usize = 1024;

#[derive(Debug)]
enum TablePhase {
  /// Expects the `TableName` token.
  Name,
  /// Expects `TableFieldName` tokens, or the bare `=` (`TableRows`).
  Field,
  /// Expects row cell scalars, or `TableEnd`.
  Value,
}

#[derive(Debug)]
enum Frame {
  /// `AnyValue`: accepts scalars and nested containers until `ListEnd`.
  List(Vec<Value>),
  /// `DictKey`/`DictValue`, folded into one frame: `None` awaits a key,
  /// `Some(key)` awaits the value for that key.
  Dict(Dict, Option<DictKey>),
  Table(Table, TablePhase),
}

impl Frame {
  fn name(&self) -> &'static str {
    match self {
      Frame::List(_) => "list",
      Frame::Dict(_, _) => "dict",
      Frame::Table(_, _) => "table",
    }
  }
}

/// Drives the token stream through the frame stack described above.
pub struct Parser<'a> {
  text: &'a str,
  tokens: Vec<Token>,
  pos: usize,
  depth_cap: usize,
}

impl<'a> Parser<'a> {
  pub fn new(text: &'a str, tokens: Vec<Token>, depth_cap: usize) -> Self {
    Self {
      text,
      tokens,
      pos: 0,
      depth_cap,
    }
  }

  /// Parses the whole token stream into its single root value.
  pub fn parse(mut self) -> Result<Value, PxdError> {
    let mut frames: Vec<Frame> = Vec::new();

    let root = loop {
      let tok = self.advance();

      if frames.is_empty() {
        match tok.kind {
          TokenKind::ListBegin => frames.push(Frame::List(Vec::new())),
          TokenKind::DictBegin => frames.push(Frame::Dict(Dict::new(), None)),
          TokenKind::TableBegin => frames.push(Frame::Table(Table::new(), TablePhase::Name)),
          TokenKind::Eof => return Err(self.err(tok.offset, "empty document: no root value".into())),
          _ => {
            return Err(self.err(
              tok.offset,
              "a document must start with a list, dict, or table".into(),
            ))
          }
        }
        continue;
      }

      if matches!(tok.kind, TokenKind::Eof) {
        let open = frames.last().unwrap().name();
        return Err(self.err(tok.offset, format!("unterminated {}", open)));
      }

      if let Some(value) = self.step(&mut frames, tok)? {
        if frames.is_empty() {
          break value;
        }
        self.attach(&mut frames, value)?;
      }
    };

    let trailing = self.advance();
    match trailing.kind {
      TokenKind::Eof => Ok(root),
      _ => Err(self.err(
        trailing.offset,
        "trailing data after the document root".into(),
      )),
    }
  }

  /// Advances one token; once [`TokenKind::Eof`] is produced, every further
  /// call re-returns it (the token stream is always `Eof`-terminated).
  fn advance(&mut self) -> Token {
    if self.pos < self.tokens.len() {
      let tok = self.tokens[self.pos].clone();
      if !matches!(tok.kind, TokenKind::Eof) {
        self.pos += 1;
      }
      tok
    } else {
      self.tokens.last().cloned().expect("token stream is never empty")
    }
  }

  /// Processes one token against the top frame. Returns `Some(value)` when
  /// doing so just closed (and popped) that frame.
  fn step(&mut self, frames: &mut Vec<Frame>, tok: Token) -> Result<Option<Value>, PxdError> {
    let offset = tok.offset;
    let is_container_begin = matches!(
      tok.kind,
      TokenKind::ListBegin | TokenKind::DictBegin | TokenKind::TableBegin
    );

    match frames.last_mut().expect("step called with a non-empty stack") {
      Frame::List(_) => match tok.kind {
        TokenKind::ListEnd => {
          let Frame::List(items) = frames.pop().unwrap() else {
            unreachable!()
          };
          Ok(Some(Value::List(items)))
        }
        _ if is_container_begin => {
          self.push_container(frames, tok)?;
          Ok(None)
        }
        other => {
          let value = self.scalar_value(other, offset)?;
          let Frame::List(items) = frames.last_mut().unwrap() else {
            unreachable!()
          };
          items.push(value);
          Ok(None)
        }
      },

      Frame::Dict(_, pending) if pending.is_none() => match tok.kind {
        TokenKind::DictEnd => {
          let Frame::Dict(map, _) = frames.pop().unwrap() else {
            unreachable!()
          };
          Ok(Some(Value::Dict(map)))
        }
        TokenKind::Int(_)
        | TokenKind::Date(_)
        | TokenKind::DateTime(_)
        | TokenKind::Str(_)
        | TokenKind::Bytes(_) => {
          let value = self.scalar_value(tok.kind, offset)?;
          let key = value.as_dict_key().expect("matched above");
          let Frame::Dict(_, pending) = frames.last_mut().unwrap() else {
            unreachable!()
          };
          *pending = Some(key);
          Ok(None)
        }
        _ => Err(self.err(offset, "illegal dict key type".into())),
      },

      Frame::Dict(_, _) => {
        // DictValue: a key is pending.
        if is_container_begin {
          self.push_container(frames, tok)?;
          return Ok(None);
        }
        let value = self.scalar_value(tok.kind, offset)?;
        let Frame::Dict(map, pending) = frames.last_mut().unwrap() else {
          unreachable!()
        };
        let key = pending.take().expect("dict value state implies a pending key");
        map.insert(key, value);
        Ok(None)
      }

      Frame::Table(table, phase) => {
        if matches!(tok.kind, TokenKind::TableEnd) {
          table.validate().map_err(|e| self.err(offset, e.to_string()))?;
          let Frame::Table(table, _) = frames.pop().unwrap() else {
            unreachable!()
          };
          return Ok(Some(Value::Table(table)));
        }
        match phase {
          TablePhase::Name => match tok.kind {
            TokenKind::TableName(name) => {
              table.set_name(name);
              *phase = TablePhase::Field;
              Ok(None)
            }
            _ => Err(self.err(offset, "expected a table name".into())),
          },
          TablePhase::Field => match tok.kind {
            TokenKind::TableFieldName(name) => {
              table
                .append_field_name(name)
                .map_err(|e| self.err(offset, e.to_string()))?;
              Ok(None)
            }
            TokenKind::TableRows => {
              if table.field_names().is_empty() {
                return Err(self.err(
                  offset,
                  "a table must declare at least one field name before its rows".into(),
                ));
              }
              *phase = TablePhase::Value;
              Ok(None)
            }
            _ => Err(self.err(
              offset,
              "expected a field name, the row marker '=', or the table end".into(),
            )),
          },
          TablePhase::Value => {
            if is_container_begin {
              return Err(self.err(
                offset,
                "nested lists, dicts, or tables are not allowed inside a table".into(),
              ));
            }
            let value = self.scalar_value(tok.kind, offset)?;
            table
              .append(value)
              .map_err(|e| self.err(offset, e.to_string()))?;
            Ok(None)
          }
        }
      }
    }
  }

  fn push_container(&self, frames: &mut Vec<Frame>, tok: Token) -> Result<(), PxdError> {
    if frames.len() >= self.depth_cap {
      return Err(PxdError::DepthExceeded(
        line_at(self.text, tok.offset),
        self.depth_cap,
      ));
    }
    match tok.kind {
      TokenKind::ListBegin => frames.push(Frame::List(Vec::new())),
      TokenKind::DictBegin => frames.push(Frame::Dict(Dict::new(), None)),
      TokenKind::TableBegin => frames.push(Frame::Table(Table::new(), TablePhase::Name)),
      _ => unreachable!("push_container only called for container-begin tokens"),
    }
    Ok(())
  }

  /// Inserts a just-closed child value into the new top-of-stack frame.
  fn attach(&self, frames: &mut Vec<Frame>, value: Value) -> Result<(), PxdError> {
    match frames.last_mut().expect("attach called with a parent frame") {
      Frame::List(items) => {
        items.push(value);
        Ok(())
      }
      Frame::Dict(map, pending) => {
        let key = pending
          .take()
          .expect("a child container can only close while a dict key is pending");
        map.insert(key, value);
        Ok(())
      }
      Frame::Table(_, _) => unreachable!("tables never accept a container-begin token"),
    }
  }

  fn scalar_value(&self, kind: TokenKind, offset: usize) -> Result<Value, PxdError> {
    match kind {
      TokenKind::Null => Ok(Value::Null),
      TokenKind::Bool(b) => Ok(Value::Bool(b)),
      TokenKind::Int(i) => Ok(Value::Int(i)),
      TokenKind::Real(r) => Ok(Value::Real(r)),
      TokenKind::Date(d) => Ok(Value::Date(d)),
      TokenKind::DateTime(dt) => Ok(Value::DateTime(dt)),
      TokenKind::Str(s) => Ok(Value::Str(s)),
      TokenKind::Bytes(b) => Ok(Value::Bytes(b)),
      _ => Err(self.err(offset, "expected a scalar value".into())),
    }
  }

  fn err(&self, offset: usize, message: String) -> PxdError {
    PxdError::Parse(line_at(self.text, offset), message)
  }
}
