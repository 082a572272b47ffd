//! Configuration schema types
//!
//! Every field has a default matching Sphinx autodoc output, so an empty
//! file (or no file at all) is a valid configuration.

use serde::{Deserialize, Serialize};

use crate::model::MemberKind;

// ============================================================================
// Top-Level Configuration
// ============================================================================

/// Root configuration for table synthesis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "snake_case")]
pub struct SynthConfig {
    /// Class markers used to recognise page structure.
    pub markers: Markers,

    /// Header labels.
    pub labels: Labels,

    /// Do not insert a table for classes that document no members.
    pub skip_empty: bool,

    /// Do not insert a table into a block that already holds one.
    pub skip_existing: bool,
}

impl Default for SynthConfig {
    fn default() -> Self {
        Self {
            markers: Markers::default(),
            labels: Labels::default(),
            skip_empty: false,
            skip_existing: true,
        }
    }
}

// ============================================================================
// Markers
// ============================================================================

/// Class names that identify the parts of a rendered class block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "snake_case")]
pub struct Markers {
    /// Class block container.
    pub class_block: String,
    /// Property entry.
    pub property: String,
    /// Attribute entry.
    pub attribute: String,
    /// Method entry.
    pub method: String,
    /// Signature element inside an entry; carries the anchor `id`.
    pub signature: String,
    /// Descriptive name element inside a signature.
    pub name: String,
    /// Wrapper inside the name element holding a property's name.
    pub property_name: String,
    /// Marker of detail elements inside the content region.
    pub detail: String,
    /// Class given to synthesized tables.
    pub table: String,
}

impl Default for Markers {
    fn default() -> Self {
        Self {
            class_block: "class".to_string(),
            property: "property".to_string(),
            attribute: "attribute".to_string(),
            method: "method".to_string(),
            signature: "sig".to_string(),
            name: "descname".to_string(),
            property_name: "pre".to_string(),
            detail: "py".to_string(),
            table: "class_contents".to_string(),
        }
    }
}

impl Markers {
    /// Entry marker for `kind`.
    #[must_use]
    pub fn entry(&self, kind: MemberKind) -> &str {
        match kind {
            MemberKind::Property => &self.property,
            MemberKind::Attribute => &self.attribute,
            MemberKind::Method => &self.method,
        }
    }

    /// Named marker fields, for validation and diagnostics.
    #[must_use]
    pub fn fields(&self) -> [(&'static str, &str); 9] {
        [
            ("class_block", &self.class_block),
            ("property", &self.property),
            ("attribute", &self.attribute),
            ("method", &self.method),
            ("signature", &self.signature),
            ("name", &self.name),
            ("property_name", &self.property_name),
            ("detail", &self.detail),
            ("table", &self.table),
        ]
    }
}

// ============================================================================
// Labels
// ============================================================================

/// Header labels for the three columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "snake_case")]
pub struct Labels {
    /// Properties column.
    pub properties: String,
    /// Attributes column.
    pub attributes: String,
    /// Methods column.
    pub methods: String,
}

impl Default for Labels {
    fn default() -> Self {
        Self {
            properties: MemberKind::Property.default_label().to_string(),
            attributes: MemberKind::Attribute.default_label().to_string(),
            methods: MemberKind::Method.default_label().to_string(),
        }
    }
}

impl Labels {
    /// Label for `kind`.
    #[must_use]
    pub fn for_kind(&self, kind: MemberKind) -> &str {
        match kind {
            MemberKind::Property => &self.properties,
            MemberKind::Attribute => &self.attributes,
            MemberKind::Method => &self.methods,
        }
    }
}
