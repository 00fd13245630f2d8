// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

//! Error types for probset operations.
//!
//! Only sizing is fallible. Filter operations (`insert`, `contains`, `len`) never fail under
//! correct use; contract violations such as an out-of-range bit index panic instead.

use std::fmt;

/// ErrorKind is all kinds of Error of probset.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum ErrorKind {
    /// The expected number of items is zero.
    CapacityTooSmall,
    /// The target false positive rate is not strictly between 0 and 1.
    InvalidErrorRate,
    /// No candidate bit-array width fits in the `u32` index space.
    CapacityTooLarge,
}

impl ErrorKind {
    /// Convert this error kind instance into static str.
    pub const fn into_static(self) -> &'static str {
        match self {
            ErrorKind::CapacityTooSmall => "CapacityTooSmall",
            ErrorKind::InvalidErrorRate => "InvalidErrorRate",
            ErrorKind::CapacityTooLarge => "CapacityTooLarge",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.into_static())
    }
}

/// Error is the error struct returned by all fallible probset functions.
///
/// # Examples
///
/// ```
/// # use probset::error::Error;
/// # use probset::error::ErrorKind;
/// let err = Error::new(ErrorKind::InvalidErrorRate, "error rate must be in (0.0, 1.0)");
/// assert_eq!(err.kind(), ErrorKind::InvalidErrorRate);
/// assert_eq!(err.message(), "error rate must be in (0.0, 1.0)");
/// ```
#[derive(Clone, PartialEq)]
pub struct Error {
    kind: ErrorKind,
    message: String,
    context: Vec<(&'static str, String)>,
}

impl Error {
    /// Create a new Error with error kind and message.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            context: vec![],
        }
    }

    /// Add more context in error.
    pub fn with_context(mut self, key: &'static str, value: impl ToString) -> Self {
        self.context.push((key, value.to_string()));
        self
    }

    /// Return error's kind.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Return error's message.
    pub fn message(&self) -> &str {
        self.message.as_str()
    }

    /// Return the context attached to this error, in insertion order.
    pub fn context(&self) -> &[(&'static str, String)] {
        &self.context
    }
}

// Convenient constructors used within probset crate.
impl Error {
    pub(crate) fn capacity_too_small(capacity: u64) -> Self {
        Self::new(
            ErrorKind::CapacityTooSmall,
            format!("capacity too small: expected at least 1 item, got {capacity}"),
        )
    }

    pub(crate) fn invalid_error_rate(error_rate: f64) -> Self {
        Self::new(
            ErrorKind::InvalidErrorRate,
            format!("invalid error rate: expected a value in (0.0, 1.0), got {error_rate}"),
        )
    }

    pub(crate) fn capacity_too_large(capacity: u64, error_rate: f64) -> Self {
        Self::new(
            ErrorKind::CapacityTooLarge,
            format!(
                "capacity too large: {capacity} items at error rate {error_rate} need more than {} bits",
                u32::MAX
            ),
        )
    }
}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // If alternate has been specified, we will print like Debug.
        if f.alternate() {
            let mut de = f.debug_struct("Error");
            de.field("kind", &self.kind);
            de.field("message", &self.message);
            de.field("context", &self.context);
            return de.finish();
        }

        write!(f, "{}", self.kind)?;
        if !self.message.is_empty() {
            write!(f, " => {}", self.message)?;
        }
        writeln!(f)?;

        if !self.context.is_empty() {
            writeln!(f)?;
            writeln!(f, "Context:")?;
            for (k, v) in self.context.iter() {
                writeln!(f, "   {k}: {v}")?;
            }
        }

        Ok(())
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)?;

        if !self.context.is_empty() {
            write!(f, ", context: {{ ")?;
            for (i, (k, v)) in self.context.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{}: {}", k, v)?;
            }
            write!(f, " }}")?;
        }

        if !self.message.is_empty() {
            write!(f, " => {}", self.message)?;
        }

        Ok(())
    }
}

impl std::error::Error for Error {}
