//! The error kinds the core surfaces to callers (`spec.md` §7).

use quick_error::quick_error;

quick_error! {
  /// Every way a PXD document can fail to be read, parsed, or emitted.
  ///
  /// Reading and parsing never partially recover: a document is wholly
  /// accepted or wholly rejected, so a single error always ends the
  /// operation in progress.
  #[derive(Debug)]
  pub enum PxdError {
    /// The input has no header line at all (empty input, or no `\n`).
    HeaderMissing {
      display("missing pxd file header or empty file")
    }
    /// The header line does not start with `pxd` or has no version field.
    HeaderInvalid(line: usize, message: String) {
      display("{}: invalid pxd file header: {}", line, message)
    }
    /// The header's first word is not `pxd`.
    NotPxd(line: usize) {
      display("{}: not a pxd file", line)
    }
    /// The header version exceeds the version this implementation supports,
    /// escalated to fatal under warn-as-error.
    VersionUnsupported(line: usize, found: f64, supported: f64) {
      display("{}: version ({}) > current ({})", line, found, supported)
    }
    /// An invalid character, unterminated string/bytes, or malformed
    /// number/date/datetime was encountered while scanning.
    Lex(line: usize, message: String) {
      display("{}: {}", line, message)
    }
    /// A token arrived that the parser's current state does not accept.
    Parse(line: usize, message: String) {
      display("{}: {}", line, message)
    }
    /// A `Table` invariant was violated: wrong row arity, a finalized table
    /// with no name or no field names, or a cell that is not a scalar.
    TableInvariant(message: String) {
      display("table invariant violated: {}", message)
    }
    /// Container nesting exceeded the configured depth cap.
    DepthExceeded(line: usize, limit: usize) {
      display("{}: nesting depth exceeded the limit of {}", line, limit)
    }
    /// The emitter was asked to write a value variant PXD cannot represent.
    EmitInvalid(message: String) {
      display("cannot emit value: {}", message)
    }
    /// A collaborator-layer I/O failure (file/stream access), not a format error.
    Io(err: std::io::Error) {
      display("I/O error: {}", err)
      from()
    }
    /// Non UTF-8 bytes were handed to the lexer.
    Utf8(err: std::str::Utf8Error) {
      display("invalid UTF-8, valid up to byte {}", err.valid_up_to())
      from()
    }
  }
}

/// Emits `message` to the `log` warning channel, or escalates it to a fatal
/// [`PxdError::VersionUnsupported`]-shaped error when `warn_as_error` is set.
///
/// Centralizes the warn/fatal fork so callers (the header scanner today,
/// possibly future checks) do not each re-implement it.
pub(crate) fn warn_or_escalate(
  warn_as_error: bool,
  line: usize,
  found: f64,
  supported: f64,
) -> Result<(), PxdError> {
  if warn_as_error {
    Err(PxdError::VersionUnsupported(line, found, supported))
  } else {
    log::warn!("{}: version ({}) > current ({})", line, found, supported);
    Ok(())
  }
}
