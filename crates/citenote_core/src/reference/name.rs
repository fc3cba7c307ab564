/*
SPDX-License-Identifier: MPL-2.0
SPDX-FileCopyrightText: © 2023-2026 Bruce D'Arcus
*/

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// A structured personal name as found in a CSL-JSON `author` list.
///
/// Institutional authors carry only a `literal`.
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub struct Name {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub family: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub given: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub literal: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dropping_particle: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub non_dropping_particle: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suffix: Option<String>,
}

impl Name {
    pub fn new(family: &str, given: &str) -> Self {
        Self {
            family: Some(family.to_string()),
            given: Some(given.to_string()),
            ..Default::default()
        }
    }

    pub fn literal(name: &str) -> Self {
        Self {
            literal: Some(name.to_string()),
            ..Default::default()
        }
    }

    /// Read a name from an untyped export value.
    ///
    /// Strings become literal names. Objects are read field by field so a
    /// stray non-string part never discards the whole name. Anything else
    /// yields `None`.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) => Some(Self::literal(s)),
            Value::Object(map) => {
                let part = |key: &str| map.get(key).and_then(scalar_text);
                let name = Self {
                    family: part("family"),
                    given: part("given"),
                    literal: part("literal"),
                    dropping_particle: part("dropping-particle"),
                    non_dropping_particle: part("non-dropping-particle"),
                    suffix: part("suffix"),
                };
                (name != Self::default()).then_some(name)
            }
            _ => None,
        }
    }

    /// Family name including any non-dropping particle ("van Gogh").
    pub fn family_part(&self) -> String {
        let family = self.family.as_deref().unwrap_or("");
        match self.non_dropping_particle.as_deref() {
            Some(ndp) if !ndp.is_empty() && !family.is_empty() => format!("{} {}", ndp, family),
            Some(ndp) if !ndp.is_empty() => ndp.to_string(),
            _ => family.to_string(),
        }
    }

    /// Given names reduced to initials: "Jean-Paul" -> "J.-P.", "Jane Q" -> "J. Q.".
    pub fn initials(&self) -> String {
        let given = self.given.as_deref().unwrap_or("");
        let mut result = String::new();
        let mut current_part = String::new();

        for c in given.chars() {
            if c.is_whitespace() || c == '-' {
                if let Some(first) = current_part.chars().next() {
                    result.push(first);
                    result.push('.');
                }
                current_part.clear();
                // Hyphens stay attached (J.-P.), runs of whitespace collapse.
                if c == '-' {
                    result.push('-');
                } else if !result.is_empty() && !result.ends_with(' ') && !result.ends_with('-') {
                    result.push(' ');
                }
            } else {
                current_part.push(c);
            }
        }

        if let Some(first) = current_part.chars().next() {
            result.push(first);
            result.push('.');
        }
        result.trim_end_matches([' ', '-']).to_string()
    }

    /// Display form used in author strings: "Family, G." or the literal.
    pub fn display_inverted(&self) -> String {
        if let Some(literal) = self.literal.as_deref().filter(|l| !l.is_empty()) {
            return literal.to_string();
        }

        let family_part = self.family_part();
        if family_part.is_empty() {
            return self.given.as_deref().unwrap_or("").trim().to_string();
        }

        let mut trailing = Vec::new();
        let initials = self.initials();
        if !initials.is_empty() {
            trailing.push(initials);
        }
        if let Some(dp) = self.dropping_particle.as_deref().filter(|p| !p.is_empty()) {
            trailing.push(dp.to_string());
        }
        if let Some(suffix) = self.suffix.as_deref().filter(|s| !s.is_empty()) {
            trailing.push(suffix.to_string());
        }

        if trailing.is_empty() {
            family_part
        } else {
            format!("{}, {}", family_part, trailing.join(" "))
        }
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_inverted())
    }
}

/// Join names into the single display string stored on an entry.
pub fn author_string(names: &[Name]) -> String {
    names
        .iter()
        .map(Name::display_inverted)
        .filter(|n| !n.is_empty())
        .collect::<Vec<_>>()
        .join("; ")
}

/// Text of a scalar JSON value; numbers are stringified, everything else ignored.
pub(crate) fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
