use std::collections::HashMap;
use std::sync::LazyLock;

/// Physical attribute name that marks the schema-wide state option set.
pub const STATE_PHYSICAL_NAME: &str = "statecode";
/// Physical attribute name that marks an entity's status-reason option set.
pub const STATUS_PHYSICAL_NAME: &str = "statuscode";

/// Sentinel returned by the type map for the primary-key attribute.
/// Consumed by the entity builder, never emitted literally.
pub const PRIMARY_KEY_SENTINEL: &str = "primarykey";

/// Language code used when resolving attribute display names.
pub const DEFAULT_LANGUAGE_CODE: &str = "1033";

/// Postfix appended to every generated wrapper class name.
pub const CLASS_POSTFIX: &str = "Item";

/// File name of the enumeration container artifact.
pub const OPTION_SETS_FILE: &str = "OptionValueSets.cs";

/// Fixed schema-type → C# type table. Types not in this table render as
/// `object`; `picklist` is handled separately against the option-set
/// cross-reference map.
static FIXED_TYPES: LazyLock<HashMap<&'static str, &'static str>> = LazyLock::new(|| {
    let mut m = HashMap::new();
    m.insert("multiselectpicklist", "object");
    m.insert("customer", "object");
    m.insert("partylist", "Party[]");
    m.insert("status", "StatusReason?");
    m.insert("state", "Status?");
    m.insert("money", "decimal");
    m.insert("decimal", "decimal");
    m.insert("int", "int");
    m.insert("uniqueidentifier", "Guid");
    m.insert("primarykey", PRIMARY_KEY_SENTINEL);
    m.insert("owner", "Guid");
    m.insert("lookup", "Guid");
    m.insert("datetime", "DateTime");
    m.insert("bit", "bool");
    m.insert("bool", "bool");
    m.insert("nvarchar", "string");
    m.insert("ntext", "string");
    m
});

/// Map a declared schema type to its rendered C# type.
///
/// `picklist` resolves through `enum_names` (option-set logical name → enum
/// name) and degrades to `int` when the reference is unknown. Anything not
/// in the fixed table renders as `object`.
pub fn map_schema_type(
    schema_type: Option<&str>,
    option_set_ref: Option<&str>,
    enum_names: &HashMap<String, String>,
) -> String {
    match schema_type {
        Some("picklist") => option_set_ref
            .and_then(|key| enum_names.get(key))
            .cloned()
            .unwrap_or_else(|| "int".to_string()),
        Some(t) => FIXED_TYPES
            .get(t)
            .map(|s| (*s).to_string())
            .unwrap_or_else(|| "object".to_string()),
        None => "object".to_string(),
    }
}
