//! The SEF container layout.
//!
//! A SEF file is a flat sequence of `[header]` lines, each followed by its body
//! and a blank line. Every section is always present, in a fixed order.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SectionKind {
    ExtensionName,
    ExtensionInfo,
    ExtensionVersion,
    InsertExternal,
    InsertCommand,
    InsertHook,
    InsertScript,
    InsertOver,
}

impl SectionKind {
    /// Every section, in document order.
    pub const ORDER: [SectionKind; 8] = [
        SectionKind::ExtensionName,
        SectionKind::ExtensionInfo,
        SectionKind::ExtensionVersion,
        SectionKind::InsertExternal,
        SectionKind::InsertCommand,
        SectionKind::InsertHook,
        SectionKind::InsertScript,
        SectionKind::InsertOver,
    ];

    pub fn header(self) -> &'static str {
        match self {
            SectionKind::ExtensionName => "extension_name",
            SectionKind::ExtensionInfo => "extension_info",
            SectionKind::ExtensionVersion => "extension_version",
            SectionKind::InsertExternal => "insert_external",
            SectionKind::InsertCommand => "insert_command",
            SectionKind::InsertHook => "insert_hook",
            SectionKind::InsertScript => "insert_script",
            SectionKind::InsertOver => "insert_over",
        }
    }
}

impl fmt::Display for SectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.header())
    }
}

/// A fully populated SEF document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageDocument {
    bodies: [String; 8],
}

impl PackageDocument {
    /// Build a document from a body lookup. Sections the closure leaves empty
    /// are still emitted.
    pub fn from_fn(mut body: impl FnMut(SectionKind) -> String) -> Self {
        Self {
            bodies: SectionKind::ORDER.map(&mut body),
        }
    }

    pub fn body(&self, kind: SectionKind) -> &str {
        let index = SectionKind::ORDER
            .iter()
            .position(|k| *k == kind)
            .unwrap_or_default();
        &self.bodies[index]
    }

    pub fn sections(&self) -> impl Iterator<Item = (SectionKind, &str)> {
        SectionKind::ORDER
            .into_iter()
            .zip(self.bodies.iter().map(String::as_str))
    }

    /// Render as `[header]`, body, blank line per section, joined with `\n`.
    pub fn render(&self) -> String {
        let mut lines = Vec::with_capacity(SectionKind::ORDER.len() * 3);
        for (kind, body) in self.sections() {
            lines.push(kind.to_string());
            lines.push(body.to_string());
            lines.push(String::new());
        }
        lines.join("\n")
    }
}

impl fmt::Display for PackageDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}
