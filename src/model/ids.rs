// SPDX-FileCopyrightText: 2026 Iconboard contributors
// SPDX-License-Identifier: MIT

use std::borrow::Borrow;
use std::fmt;
use std::str::FromStr;

/// Stable identifier of one trackable app component.
///
/// The canonical form is `package/component` (e.g.
/// `com.example.app/com.example.app.MainActivity`). Both segments must be
/// non-empty; anything else is rejected at the data-source boundary so the
/// pipeline never sees a malformed id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ComponentId {
    value: String,
}

impl ComponentId {
    pub fn new(value: impl Into<String>) -> Result<Self, ComponentIdError> {
        let value = value.into();
        validate_component_id(&value)?;
        Ok(Self { value })
    }

    pub fn as_str(&self) -> &str {
        &self.value
    }

    /// The package half of the id, used to build store links.
    pub fn package(&self) -> &str {
        self.value.split('/').next().unwrap_or(&self.value)
    }

    pub fn into_string(self) -> String {
        self.value
    }
}

impl fmt::Display for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

impl AsRef<str> for ComponentId {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl Borrow<str> for ComponentId {
    fn borrow(&self) -> &str {
        self.as_str()
    }
}

impl FromStr for ComponentId {
    type Err = ComponentIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s.to_owned())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ComponentIdError {
    Empty,
    MissingSlash,
    EmptyPackage,
    EmptyComponent,
}

impl fmt::Display for ComponentIdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => f.write_str("component id must not be empty"),
            Self::MissingSlash => f.write_str("component id must be of the form package/component"),
            Self::EmptyPackage => f.write_str("component id has an empty package segment"),
            Self::EmptyComponent => f.write_str("component id has an empty component segment"),
        }
    }
}

impl std::error::Error for ComponentIdError {}

fn validate_component_id(value: &str) -> Result<(), ComponentIdError> {
    if value.is_empty() {
        return Err(ComponentIdError::Empty);
    }
    let Some((package, component)) = value.split_once('/') else {
        return Err(ComponentIdError::MissingSlash);
    };
    if package.is_empty() {
        return Err(ComponentIdError::EmptyPackage);
    }
    if component.is_empty() {
        return Err(ComponentIdError::EmptyComponent);
    }
    Ok(())
}
