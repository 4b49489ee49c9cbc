//! Error and warning taxonomy for the Smali parser.

/// A fatal error encountered while turning source text into statements or
/// blocks.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ParseError {
    /// A `.` directive line's first field was just `.`, with no keyword
    /// after it.
    DirectiveTooShort(String),

    /// The directive keyword after `.` is not part of the closed token
    /// catalog.
    UnknownDirective(String),

    /// A line containing a top-level `=` did not split into exactly two
    /// sides.
    AssignmentWrongSides(String),

    /// A `.method` line's prototype field did not match
    /// `^(.*?)\((.*)\)(.*)$`.
    InvalidMethodPrototype(String),

    /// A statement's line still had unconsumed fields after its
    /// variant-specific parsing ran, with statement-level validation on.
    LineNotEmpty(String),

    /// A field expected by a variant's parse routine was missing.
    UnexpectedEndOfLine(String),

    /// A `.end <kind>` statement did not match the head of the block it
    /// closes.
    BlockEndMismatch { expected: String, found: String },

    /// Input ended with one or more blocks still open.
    UnbalancedBlocks(usize),

    /// A `.end <kind>` directive closed a block but no block was open.
    UnexpectedBlockEnd(String),

    /// An invalid prototype string was passed to `find_method`.
    InvalidPrototype(String),
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DirectiveTooShort(line) => {
                write!(f, "token descriptor too small: {line}")
            }
            Self::UnknownDirective(keyword) => {
                write!(f, "unknown or invalid token descriptor: {keyword}")
            }
            Self::AssignmentWrongSides(line) => {
                write!(f, "assignment statement does not have correct number of sides: {line}")
            }
            Self::InvalidMethodPrototype(line) => {
                write!(f, "unable to parse method prototype: {line}")
            }
            Self::LineNotEmpty(line) => {
                write!(f, "line not empty after parsing: {line}")
            }
            Self::UnexpectedEndOfLine(line) => {
                write!(f, "unexpected end of line while parsing: {line}")
            }
            Self::BlockEndMismatch { expected, found } => {
                write!(f, "block end does not match block start: expected {expected}, found {found}")
            }
            Self::UnbalancedBlocks(count) => {
                write!(f, "file parsing complete but block stack is not empty ({count} block(s) open)")
            }
            Self::UnexpectedBlockEnd(line) => {
                write!(f, "block end does not close any open block: {line}")
            }
            Self::InvalidPrototype(prototype) => {
                write!(f, "invalid method prototype: {prototype}")
            }
        }
    }
}

impl std::error::Error for ParseError {}

/// A fatal error encountered while pretty-printing a block tree.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FormatError {
    /// A `BLOCK_END` statement was emitted at depth 0.
    NegativeDepth,

    /// A block item was neither a `Statement` nor a `Block` (unreachable
    /// given `Item`'s two variants; kept so the error taxonomy stays
    /// closed under future `Item` variants).
    InvalidItem,
}

impl std::fmt::Display for FormatError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NegativeDepth => f.write_str("block level became negative at a block end"),
            Self::InvalidItem => f.write_str("invalid item type in block"),
        }
    }
}

impl std::error::Error for FormatError {}

/// A fatal error raised by the round-trip validator when the reprinted
/// source does not contain the same non-whitespace characters as the
/// original.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ValidationError(pub String);

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for ValidationError {}

/// A non-fatal round-trip discrepancy: the character multiset matched but
/// whitespace-normalized comparison, or exact right-stripped comparison,
/// did not. Never returned as an `Err` — callers inspect or log it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Warning {
    /// Character multiset matched, but comments/whitespace-normalized
    /// comparison did not.
    Validation(String),

    /// Character multiset and whitespace-normalized comparison matched,
    /// but the right-stripped text still differs. A subkind of
    /// `Validation`.
    Whitespace(String),
}

impl std::fmt::Display for Warning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(msg) | Self::Whitespace(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for Warning {}

/// The top-level error type returned by crate entry points, wrapping
/// `ParseError`/`FormatError`/`ValidationError` plus I/O errors from
/// `SmaliFile::from_path`.
#[derive(Debug)]
pub enum Error {
    Parse(ParseError),
    Format(FormatError),
    Validation(ValidationError),
    Io(std::io::Error),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Parse(e) => write!(f, "{e}"),
            Self::Format(e) => write!(f, "{e}"),
            Self::Validation(e) => write!(f, "{e}"),
            Self::Io(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for Error {}

impl From<ParseError> for Error {
    fn from(e: ParseError) -> Self {
        Self::Parse(e)
    }
}

impl From<FormatError> for Error {
    fn from(e: FormatError) -> Self {
        Self::Format(e)
    }
}

impl From<ValidationError> for Error {
    fn from(e: ValidationError) -> Self {
        Self::Validation(e)
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
