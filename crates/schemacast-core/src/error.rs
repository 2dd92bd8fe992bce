//! # Error Types — Structured Violations
//!
//! Defines the error types shared by every schemacast crate. All errors use
//! `thiserror` for derive-based `Display` and `Error` implementations.
//!
//! ## Design
//!
//! - A failed evaluation produces exactly one [`Violation`]: evaluation
//!   stops at the first constraint that does not hold.
//! - The [`ViolationKind`] names which constraint family failed. The message
//!   carries the expected vs actual values.
//! - Composite keywords (`allOf`, `anyOf`, format decoding) wrap the
//!   underlying failure as the violation's [`Cause`], so callers can walk
//!   the `source()` chain down to the leaf that failed.
//! - No instance path is tracked.

use std::fmt;

use thiserror::Error;

/// The constraint family a [`Violation`] belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViolationKind {
    /// The instance has the wrong JSON type for the schema.
    TypeMismatch,
    /// The instance is not deep-equal to `const`.
    ConstMismatch,
    /// The instance is not deep-equal to any member of `enum`.
    EnumMismatch,
    /// A key listed in `required` is absent.
    RequiredFieldMissing,
    /// A `dependentRequired` dependency is absent.
    DependentRequiredViolation,
    /// `minimum`/`maximum` or their exclusive forms.
    RangeViolation,
    /// `multipleOf`.
    MultipleOfViolation,
    /// String length, item count or property count out of bounds.
    LengthViolation,
    /// `pattern` does not match the whole string.
    PatternMismatch,
    /// `format` names a symbol missing from the registry.
    UnsupportedFormat,
    /// The format decoder rejected the string.
    FormatError,
    /// `additionalProperties: false` with unclaimed keys.
    AdditionalPropertiesNotAllowed,
    /// `items: false` with elements beyond `prefixItems`.
    AdditionalItemsNotAllowed,
    /// `uniqueItems` with structurally equal elements.
    UniqueItemsViolation,
    /// `contains` matched too few or too many elements.
    ContainsViolation,
    /// The instance matched the `not` schema.
    NotViolated,
    /// At least one `allOf` branch failed.
    AllOfFailed,
    /// No `anyOf` branch matched.
    AnyOfExhausted,
    /// Zero or more than one `oneOf` branch matched.
    OneOfAmbiguous,
    /// A `$ref` pointer could not be resolved in the root document.
    RefResolutionError,
    /// `type` names something other than the seven JSON types.
    UnsupportedType,
    /// A keyword value the evaluator cannot interpret.
    UnsupportedKeyword,
    /// Evaluation nested deeper than the configured ceiling.
    RecursionLimit,
}

impl ViolationKind {
    /// Stable name of the kind, as used in messages and logs.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::TypeMismatch => "TypeMismatch",
            Self::ConstMismatch => "ConstMismatch",
            Self::EnumMismatch => "EnumMismatch",
            Self::RequiredFieldMissing => "RequiredFieldMissing",
            Self::DependentRequiredViolation => "DependentRequiredViolation",
            Self::RangeViolation => "RangeViolation",
            Self::MultipleOfViolation => "MultipleOfViolation",
            Self::LengthViolation => "LengthViolation",
            Self::PatternMismatch => "PatternMismatch",
            Self::UnsupportedFormat => "UnsupportedFormat",
            Self::FormatError => "FormatError",
            Self::AdditionalPropertiesNotAllowed => "AdditionalPropertiesNotAllowed",
            Self::AdditionalItemsNotAllowed => "AdditionalItemsNotAllowed",
            Self::UniqueItemsViolation => "UniqueItemsViolation",
            Self::ContainsViolation => "ContainsViolation",
            Self::NotViolated => "NotViolated",
            Self::AllOfFailed => "AllOfFailed",
            Self::AnyOfExhausted => "AnyOfExhausted",
            Self::OneOfAmbiguous => "OneOfAmbiguous",
            Self::RefResolutionError => "RefResolutionError",
            Self::UnsupportedType => "UnsupportedType",
            Self::UnsupportedKeyword => "UnsupportedKeyword",
            Self::RecursionLimit => "RecursionLimit",
        }
    }
}

impl fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A schema violation: the single failure category of an evaluation.
#[derive(Error, Debug)]
#[error("{kind}: {message}")]
pub struct Violation {
    kind: ViolationKind,
    message: String,
    #[source]
    cause: Option<Box<Cause>>,
}

/// The failure a [`Violation`] wraps.
#[derive(Error, Debug)]
pub enum Cause {
    /// A nested evaluation failure (e.g. the failing `allOf` branch).
    #[error(transparent)]
    Violation(Violation),

    /// A format decoder or encoder failure.
    #[error(transparent)]
    Format(FormatError),
}

impl Violation {
    /// Create a violation with no wrapped cause.
    pub fn new(kind: ViolationKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            cause: None,
        }
    }

    /// Wrap a nested violation as the cause of this one.
    pub fn caused_by(mut self, inner: Violation) -> Self {
        self.cause = Some(Box::new(Cause::Violation(inner)));
        self
    }

    /// Wrap a format failure as the cause of this one.
    pub fn with_format_error(mut self, inner: FormatError) -> Self {
        self.cause = Some(Box::new(Cause::Format(inner)));
        self
    }

    /// The constraint family that failed.
    pub fn kind(&self) -> ViolationKind {
        self.kind
    }

    /// Human-readable description, without the kind prefix.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// The wrapped cause, if any.
    pub fn cause(&self) -> Option<&Cause> {
        self.cause.as_deref()
    }

    /// The innermost violation along the cause chain (`self` if none).
    pub fn root_violation(&self) -> &Violation {
        match self.cause() {
            Some(Cause::Violation(inner)) => inner.root_violation(),
            _ => self,
        }
    }
}

/// Error raised by a format's decode or encode half.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("format '{format}': {reason}")]
pub struct FormatError {
    /// The format symbol (e.g. `"uuid"`).
    pub format: String,
    /// Why the conversion failed.
    pub reason: String,
}

impl FormatError {
    /// Create a format error for `format`.
    pub fn new(format: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            format: format.into(),
            reason: reason.into(),
        }
    }
}

/// Error raised when an ISO 8601 duration string cannot be parsed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DurationError {
    /// The string does not start with `P`.
    #[error("{0:?} is not in a correct duration format")]
    MissingPrefix(String),

    /// More than one `T` separator.
    #[error("{0:?} contains more than one 'T' separator")]
    RepeatedSeparator(String),

    /// A `T` separator with nothing after it.
    #[error("{0:?} has a 'T' separator but no time components")]
    EmptyTimePart(String),

    /// Neither a date nor a time component.
    #[error("{0:?} has no duration components")]
    NoComponents(String),

    /// Text the designator grammar does not consume.
    #[error("unrecognized duration component {0:?}")]
    UnrecognizedComponent(String),

    /// A component value that is not a number.
    #[error("invalid number {number:?}: {reason}")]
    InvalidNumber { number: String, reason: String },
}
