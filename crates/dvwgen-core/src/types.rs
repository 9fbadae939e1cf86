use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Document tree (internal, produced by the XML reader)
// ---------------------------------------------------------------------------

/// One element of the parsed customizations document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocNode {
    pub name: String,
    /// Attributes in document order.
    pub attrs: Vec<(String, String)>,
    /// Concatenated character data of this element.
    pub text: String,
    pub children: Vec<DocNode>,
}

impl DocNode {
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn child(&self, name: &str) -> Option<&DocNode> {
        self.children.iter().find(|c| c.name == name)
    }

    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a DocNode> {
        self.children.iter().filter(move |c| c.name == name)
    }

    /// Trimmed character data, the equivalent of an element's inner text.
    pub fn text_trimmed(&self) -> &str {
        self.text.trim()
    }

    /// All descendants with the given element name, in document order.
    pub fn descendants_named<'a>(&'a self, name: &str, out: &mut Vec<&'a DocNode>) {
        for child in &self.children {
            if child.name == name {
                out.push(child);
            }
            child.descendants_named(name, out);
        }
    }
}

// ---------------------------------------------------------------------------
// Schema model (serialized by the inspect command)
// ---------------------------------------------------------------------------

/// A global option set definition from the `optionsets` collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionSetNode {
    /// The `Name` attribute — the lookup key picklist attributes reference.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub localized_name: Option<String>,
    pub options: Vec<OptionNode>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionNode {
    /// Kept as the raw document string; it is echoed verbatim into artifacts.
    pub value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityNode {
    /// The entity's `Name` child element — keys the status-reason table.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Whether an `EntityInfo` block was present at all.
    pub has_entity_info: bool,
    /// The inner `EntityInfo/entity` definition, if present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub info: Option<EntityInfoNode>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityInfoNode {
    /// The `Name` attribute of the inner entity node (raw schema name).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema_name: Option<String>,
    /// First localized display name description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub localized_name: Option<String>,
    pub attributes: Vec<AttributeNode>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributeNode {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logical_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub physical_name: Option<String>,
    /// Declared schema type (`Type` child element).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema_type: Option<String>,
    /// Localized display name description for the default language code.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    /// `OptionSetName` reference for picklist attributes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub option_set_name: Option<String>,
    /// Inline option set carrying state/status members.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub option_set: Option<InlineOptionSet>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InlineOptionSet {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub states: Vec<StateOption>,
    pub statuses: Vec<StatusOption>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StateOption {
    pub value: String,
    pub invariant_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusOption {
    pub value: String,
    /// Owning state value; statuses without one are ignored by the builder.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

/// The whole parsed metadata document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaDocument {
    pub option_sets: Vec<OptionSetNode>,
    pub entities: Vec<EntityNode>,
}

// ---------------------------------------------------------------------------
// Diagnostics
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub code: String,
    pub severity: DiagnosticSeverity,
    /// Entity, attribute or option set the condition was observed on.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticSeverity {
    Error,
    Warning,
}

impl Diagnostic {
    pub fn error(code: &str, subject: Option<&str>, message: impl Into<String>) -> Self {
        Diagnostic {
            code: code.to_string(),
            severity: DiagnosticSeverity::Error,
            subject: subject.map(String::from),
            message: message.into(),
        }
    }

    pub fn warning(code: &str, subject: Option<&str>, message: impl Into<String>) -> Self {
        Diagnostic {
            code: code.to_string(),
            severity: DiagnosticSeverity::Warning,
            subject: subject.map(String::from),
            message: message.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Generation options and results
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct GenerateOptions {
    /// Case-insensitive substring filter on the entity display name.
    pub filter_contains: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Counters {
    pub entities_generated: usize,
    pub option_sets_processed: usize,
    pub enums_generated: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArtifactKind {
    /// The single enumeration container (`OptionValueSets.cs`).
    OptionSets,
    /// One entity wrapper class.
    Entity,
}

/// One rendered output file, not yet written anywhere.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Artifact {
    pub kind: ArtifactKind,
    pub file_name: String,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerateResult {
    pub artifacts: Vec<Artifact>,
    pub counters: Counters,
    pub warnings: Vec<Diagnostic>,
}
