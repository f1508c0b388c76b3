//! Resolution string parsing.
//!
//! Every lockfile entry carries a `resolution` field of the form
//! `<name>@<version-or-protocol-spec>`, e.g. `left-pad@npm:1.3.0` or
//! `@babel/core@npm:7.24.0`. This module splits that string into the
//! package name and an optional source-protocol tag.

use crate::core::LockageError;

/// Source protocol a resolution string points at.
///
/// Only the default npm registry protocol is recognized. Resolutions with
/// other source markers (`workspace:`, `patch:`, git URLs, local paths)
/// carry no protocol tag and are skipped by metadata enrichment, since the
/// registry has no entry for them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Protocol {
    /// The default npm registry (`npm:` spec prefix).
    Npm,
}

/// Package name and source protocol decoded from a resolution string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedResolution {
    /// The package name, including any `@scope/` prefix.
    pub name: String,
    /// `Some(Npm)` when the spec after the separator starts with `npm:`.
    pub protocol: Option<Protocol>,
}

/// Split a resolution string into package name and protocol.
///
/// The separator is the first `@` after position zero; a leading `@` marks
/// a scoped package name, not a separator.
///
/// # Errors
///
/// Returns [`LockageError::MalformedResolution`] when no separator exists
/// after the leading character. This is fatal for the whole run: it means
/// the lockfile is corrupt or in an unsupported format.
///
/// # Examples
///
/// ```
/// use lockage::lockfile::resolution::{Protocol, parse_resolution};
///
/// let parsed = parse_resolution("left-pad@npm:1.3.0").unwrap();
/// assert_eq!(parsed.name, "left-pad");
/// assert_eq!(parsed.protocol, Some(Protocol::Npm));
///
/// let parsed = parse_resolution("@scope/pkg@workspace:packages/pkg").unwrap();
/// assert_eq!(parsed.name, "@scope/pkg");
/// assert_eq!(parsed.protocol, None);
/// ```
pub fn parse_resolution(text: &str) -> Result<ParsedResolution, LockageError> {
    let search_from = usize::from(text.starts_with('@'));
    let separator = text[search_from..].find('@').map(|i| i + search_from).ok_or_else(|| {
        LockageError::MalformedResolution {
            resolution: text.to_string(),
        }
    })?;

    let name = &text[..separator];
    let spec = &text[separator + 1..];
    let protocol = spec.starts_with("npm:").then_some(Protocol::Npm);

    Ok(ParsedResolution {
        name: name.to_string(),
        protocol,
    })
}
