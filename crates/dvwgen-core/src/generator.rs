use crate::catalogs::{map_schema_type, CLASS_POSTFIX, OPTION_SETS_FILE, PRIMARY_KEY_SENTINEL};
use crate::resolver::{build_context, GenContext};
use crate::sanitize::sanitize;
use crate::types::*;

/// How one attribute renders into the class body.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyKind {
    /// Ordinary auto-property with a mapped type.
    Plain { ty: String },
    /// Display name "Status": property renamed `State`, typed `StateCode`.
    StateOverride,
    /// Display name "StatusReason": nullable int backing field plus a
    /// derived accessor that casts through the per-state enums.
    StatusReasonDerived,
    /// The primary key: property named `Id`, typed `Guid`.
    PrimaryKey,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PropertyDecl {
    pub logical_name: String,
    pub display_name: String,
    pub kind: PropertyKind,
}

/// Run the full generation pipeline over a parsed document.
///
/// Option sets and the state/status tables are resolved first; entity
/// rendering consumes the finished context. Structural errors abort the run.
pub fn generate(doc: &SchemaDocument, options: &GenerateOptions) -> Result<GenerateResult, Diagnostic> {
    let ctx = build_context(doc);

    let mut warnings = ctx.warnings.clone();
    let mut counters = Counters {
        entities_generated: 0,
        option_sets_processed: ctx.option_sets_processed,
        enums_generated: ctx.enums_generated,
    };

    let mut artifacts = vec![Artifact {
        kind: ArtifactKind::OptionSets,
        file_name: OPTION_SETS_FILE.to_string(),
        content: ctx.enums_artifact.clone(),
    }];

    if doc.entities.is_empty() {
        warnings.push(Diagnostic::warning(
            "DVW-W005",
            None,
            "no entity nodes found in document",
        ));
    }

    for entity in &doc.entities {
        if let Some(artifact) = render_entity(entity, &ctx, options, &mut warnings)? {
            artifacts.push(artifact);
            counters.entities_generated += 1;
        }
    }

    if counters.entities_generated == 0 && !doc.entities.is_empty() {
        if let Some(filter) = options.filter_contains.as_deref() {
            warnings.push(Diagnostic::warning(
                "DVW-W006",
                None,
                format!("no entities matched filter: \"{}\"", filter),
            ));
        }
    }

    Ok(GenerateResult {
        artifacts,
        counters,
        warnings,
    })
}

/// Render one entity class, or `None` when the display-name filter excludes
/// it. The filter is checked before structural validation, so a filtered-out
/// entity never fails the run.
fn render_entity(
    entity: &EntityNode,
    ctx: &GenContext,
    options: &GenerateOptions,
    warnings: &mut Vec<Diagnostic>,
) -> Result<Option<Artifact>, Diagnostic> {
    let display_name = entity.info.as_ref().and_then(|i| i.localized_name.as_deref());

    if let Some(filter) = options.filter_contains.as_deref() {
        let matched = display_name
            .is_some_and(|d| d.to_lowercase().contains(&filter.to_lowercase()));
        if !matched {
            return Ok(None);
        }
    }

    if !entity.has_entity_info {
        return Err(Diagnostic::error(
            "DVW-E002",
            entity.name.as_deref(),
            "entity has no EntityInfo block",
        ));
    }
    let Some(info) = entity.info.as_ref() else {
        return Err(Diagnostic::error(
            "DVW-E003",
            entity.name.as_deref(),
            "entity has no inner entity node",
        ));
    };

    let raw_name = display_name
        .or(info.schema_name.as_deref())
        .unwrap_or("UnnamedEntity");
    let entity_name = sanitize(raw_name);
    let entity_logical_name = info
        .schema_name
        .as_deref()
        .map(str::to_lowercase)
        .unwrap_or_else(|| "unnamed".to_string());

    let mut properties: Vec<PropertyDecl> = Vec::new();
    let mut has_primary_key = false;
    for attribute in &info.attributes {
        if let Some(decl) = classify_attribute(attribute, ctx, &entity_name, warnings) {
            if decl.kind == PropertyKind::PrimaryKey {
                has_primary_key = true;
            }
            properties.push(decl);
        }
    }

    // The methods reference this property name whether or not it was
    // actually declared.
    let primary_key_column = "Id";
    if !has_primary_key {
        warnings.push(Diagnostic::warning(
            "DVW-W004",
            Some(entity_name.as_str()),
            "entity has no primary-key attribute; generated methods reference an undeclared \"Id\" property",
        ));
    }

    let content = render_class(
        &entity_name,
        &entity_logical_name,
        primary_key_column,
        &properties,
        ctx,
    );

    Ok(Some(Artifact {
        kind: ArtifactKind::Entity,
        file_name: format!("{}.cs", entity_name),
        content,
    }))
}

fn classify_attribute(
    attribute: &AttributeNode,
    ctx: &GenContext,
    entity_name: &str,
    warnings: &mut Vec<Diagnostic>,
) -> Option<PropertyDecl> {
    let logical_name = attribute.logical_name.clone().unwrap_or_default();

    let raw_display = attribute
        .display_name
        .as_deref()
        .map(str::trim)
        .filter(|d| !d.is_empty());
    let Some(raw_display) = raw_display else {
        warnings.push(Diagnostic::warning(
            "DVW-W003",
            Some(entity_name),
            format!(
                "attribute \"{}\" skipped: no resolvable display name",
                attribute
                    .logical_name
                    .as_deref()
                    .or(attribute.physical_name.as_deref())
                    .unwrap_or("(unnamed)")
            ),
        ));
        return None;
    };
    let display_name = sanitize(raw_display);

    if attribute.schema_type.as_deref() == Some("picklist") {
        let resolved = attribute
            .option_set_name
            .as_deref()
            .is_some_and(|key| ctx.enum_names.contains_key(key));
        if !resolved {
            warnings.push(Diagnostic::warning(
                "DVW-W001",
                Some(entity_name),
                format!(
                    "picklist attribute \"{}\" references unknown option set \"{}\"; falling back to int",
                    logical_name,
                    attribute.option_set_name.as_deref().unwrap_or("(none)")
                ),
            ));
        }
    }
    let ty = map_schema_type(
        attribute.schema_type.as_deref(),
        attribute.option_set_name.as_deref(),
        &ctx.enum_names,
    );

    if display_name == "Status" {
        return Some(PropertyDecl {
            logical_name,
            display_name: "State".to_string(),
            kind: PropertyKind::StateOverride,
        });
    }
    if display_name == "StatusReason" {
        return Some(PropertyDecl {
            logical_name,
            display_name,
            kind: PropertyKind::StatusReasonDerived,
        });
    }
    if ty == PRIMARY_KEY_SENTINEL {
        return Some(PropertyDecl {
            logical_name,
            display_name: "Id".to_string(),
            kind: PropertyKind::PrimaryKey,
        });
    }
    if ty.is_empty() {
        return None;
    }
    Some(PropertyDecl {
        logical_name,
        display_name,
        kind: PropertyKind::Plain { ty },
    })
}

// ---------------------------------------------------------------------------
// Class text rendering
// ---------------------------------------------------------------------------

fn render_class(
    entity_name: &str,
    entity_logical_name: &str,
    primary_key_column: &str,
    properties: &[PropertyDecl],
    ctx: &GenContext,
) -> String {
    let mut lines: Vec<String> = Vec::new();

    lines.push("using static OptionValueSets;".into());
    lines.push("using Microsoft.Xrm.Sdk;".into());
    lines.push("using Microsoft.Xrm.Sdk.Query;".into());
    lines.push("using System;".into());
    lines.push("using System.Reflection;".into());
    lines.push(String::new());
    lines.push(format!("public class {}{}", entity_name, CLASS_POSTFIX));
    lines.push("{".into());
    lines.push("    private IOrganizationService _service;".into());
    lines.push(format!(
        "    private string EntityLogicalName = \"{}\";",
        entity_logical_name
    ));
    lines.push(String::new());

    for property in properties {
        render_property(&mut lines, property);
    }

    render_constructor(&mut lines, entity_name);
    render_logical_name_attribute(&mut lines);
    render_mapping_method(&mut lines);
    render_retrieve_method(&mut lines, entity_logical_name, primary_key_column);
    render_create_method(&mut lines, primary_key_column);
    render_update_method(&mut lines, primary_key_column);
    render_delete_method(&mut lines, entity_logical_name, primary_key_column);

    if let Some(status_text) = ctx.status_enums.get(entity_logical_name) {
        for line in status_text.lines() {
            lines.push(line.to_string());
        }
        lines.push(String::new());
    }

    lines.push("}".into());
    lines.join("\n") + "\n"
}

fn render_property(lines: &mut Vec<String>, property: &PropertyDecl) {
    match &property.kind {
        PropertyKind::Plain { ty } => {
            lines.push(format!("    [LogicalName(\"{}\")]", property.logical_name));
            lines.push(format!(
                "    public {} {} {{ get; set; }}",
                ty, property.display_name
            ));
            lines.push(String::new());
        }
        PropertyKind::StateOverride => {
            lines.push(format!("    [LogicalName(\"{}\")]", property.logical_name));
            lines.push("    public StateCode State { get; set; }".into());
            lines.push(String::new());
        }
        PropertyKind::PrimaryKey => {
            lines.push(format!("    [LogicalName(\"{}\")]", property.logical_name));
            lines.push("    public Guid Id { get; set; }".into());
            lines.push(String::new());
        }
        PropertyKind::StatusReasonDerived => {
            lines.push("    public int? StatusReason { get; set; }".into());
            lines.push(String::new());
            lines.push(format!("    [LogicalName(\"{}\")]", property.logical_name));
            lines.push("    public object StatusReasonEnum".into());
            lines.push("    {".into());
            lines.push("        get".into());
            lines.push("        {".into());
            lines.push("            if (State == StateCode.Active && StatusReason.HasValue) return (ActiveStatusReason)StatusReason.Value;".into());
            lines.push("            if (State == StateCode.Inactive && StatusReason.HasValue) return (InactiveStatusReason)StatusReason.Value;".into());
            lines.push("            return null;".into());
            lines.push("        }".into());
            lines.push("        set".into());
            lines.push("        {".into());
            lines.push("            if (State == StateCode.Active && value is ActiveStatusReason a) StatusReason = (int)a;".into());
            lines.push("            else if (State == StateCode.Inactive && value is InactiveStatusReason i) StatusReason = (int)i;".into());
            lines.push("        }".into());
            lines.push("    }".into());
            lines.push(String::new());
        }
    }
}

fn render_constructor(lines: &mut Vec<String>, entity_name: &str) {
    lines.push(format!(
        "    public {}{}(IOrganizationService service)",
        entity_name, CLASS_POSTFIX
    ));
    lines.push("    {".into());
    lines.push("        _service = service;".into());
    lines.push("    }".into());
    lines.push(String::new());
}

fn render_logical_name_attribute(lines: &mut Vec<String>) {
    lines.push("    [AttributeUsage(AttributeTargets.Property)]".into());
    lines.push("    public class LogicalNameAttribute : Attribute".into());
    lines.push("    {".into());
    lines.push("        public string Name { get; }".into());
    lines.push("        public LogicalNameAttribute(string name) { Name = name; }".into());
    lines.push("    }".into());
    lines.push(String::new());
}

/// The transient-record builder shared by Create and Update: skip defaulted
/// values, wrap enums as option values, expand party arrays into a nested
/// activity-party collection.
fn render_mapping_method(lines: &mut Vec<String>) {
    lines.push("    private Entity MapPropertiesToEntity()".into());
    lines.push("    {".into());
    lines.push("        Entity entity = new Entity(EntityLogicalName);".into());
    lines.push("        PropertyInfo[] properties = GetType().GetProperties();".into());
    lines.push("        foreach (var property in properties)".into());
    lines.push("        {".into());
    lines.push("            var value = property.GetValue(this);".into());
    lines.push("            if (value == null) continue;".into());
    lines.push("            if (value is Guid g && g == Guid.Empty) continue;".into());
    lines.push("            if (value is DateTime dt && dt == DateTime.MinValue) continue;".into());
    lines.push("            if (value.GetType().IsEnum) value = new OptionSetValue((int)value);".into());
    lines.push("            var logical = property.GetCustomAttribute<LogicalNameAttribute>();".into());
    lines.push("            if (logical == null) continue;".into());
    lines.push("            if (property.PropertyType == typeof(Party[]))".into());
    lines.push("            {".into());
    lines.push("                var parties = (Party[])value;".into());
    lines.push("                EntityCollection partyList = new EntityCollection();".into());
    lines.push("                foreach (var party in parties)".into());
    lines.push("                {".into());
    lines.push("                    Entity p = new Entity(\"activityparty\");".into());
    lines.push("                    p[\"partyid\"] = new EntityReference(party.EntityType, party.Id);".into());
    lines.push("                    partyList.Entities.Add(p);".into());
    lines.push("                }".into());
    lines.push("                entity[logical.Name] = partyList;".into());
    lines.push("            }".into());
    lines.push("            else entity[logical.Name] = value;".into());
    lines.push("        }".into());
    lines.push("        return entity;".into());
    lines.push("    }".into());
    lines.push(String::new());
}

fn render_retrieve_method(lines: &mut Vec<String>, entity_logical_name: &str, primary_key_column: &str) {
    lines.push("    public void Retrieve(Guid id)".into());
    lines.push("    {".into());
    lines.push(format!(
        "        Entity entity = _service.Retrieve(\"{}\", id, new ColumnSet(true));",
        entity_logical_name
    ));
    lines.push("        PropertyInfo[] properties = GetType().GetProperties();".into());
    lines.push("        foreach (var property in properties)".into());
    lines.push("        {".into());
    lines.push("            var logical = property.GetCustomAttribute<LogicalNameAttribute>();".into());
    lines.push("            if (logical == null) continue;".into());
    lines.push("            if (!entity.Attributes.ContainsKey(logical.Name)) continue;".into());
    lines.push("            var attributeValue = entity[logical.Name];".into());
    lines.push("            property.SetValue(this, attributeValue);".into());
    lines.push("        }".into());
    lines.push(format!("        this.{} = id;", primary_key_column));
    lines.push("    }".into());
    lines.push(String::new());
}

fn render_create_method(lines: &mut Vec<String>, primary_key_column: &str) {
    lines.push("    public void Create()".into());
    lines.push("    {".into());
    lines.push("        Entity entity = MapPropertiesToEntity();".into());
    lines.push(format!(
        "        this.{} = _service.Create(entity);",
        primary_key_column
    ));
    lines.push("    }".into());
    lines.push(String::new());
}

fn render_update_method(lines: &mut Vec<String>, primary_key_column: &str) {
    lines.push("    public void Update()".into());
    lines.push("    {".into());
    lines.push("        Entity entity = MapPropertiesToEntity();".into());
    lines.push(format!("        entity.Id = this.{};", primary_key_column));
    lines.push("        _service.Update(entity);".into());
    lines.push("    }".into());
    lines.push(String::new());
}

fn render_delete_method(lines: &mut Vec<String>, entity_logical_name: &str, primary_key_column: &str) {
    lines.push("    public void Delete()".into());
    lines.push("    {".into());
    lines.push(format!(
        "        _service.Delete(\"{}\", this.{});",
        entity_logical_name, primary_key_column
    ));
    lines.push("    }".into());
    lines.push(String::new());
}
