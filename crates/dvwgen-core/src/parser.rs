use crate::catalogs::DEFAULT_LANGUAGE_CODE;
use crate::types::*;
use crate::xml::parse_xml;

/// Parse customizations XML into the typed schema model.
///
/// Malformed XML is the only fatal condition here; missing or partial nodes
/// are kept as `None` and judged later by the builders, because an entity
/// that fails the display-name filter must be skipped before any structural
/// validation happens.
pub fn parse_schema(input: &str) -> Result<SchemaDocument, Diagnostic> {
    let root = parse_xml(input)
        .map_err(|e| Diagnostic::error("DVW-E001", None, format!("XML parsing error: {}", e)))?;
    Ok(from_tree(&root))
}

/// Build the schema model from an already parsed document tree.
pub fn from_tree(root: &DocNode) -> SchemaDocument {
    let mut option_sets = Vec::new();
    let mut containers = Vec::new();
    root.descendants_named("optionsets", &mut containers);
    for container in containers {
        for node in container.children_named("optionset") {
            option_sets.push(parse_option_set(node));
        }
    }

    let mut entities = Vec::new();
    let mut entity_nodes = Vec::new();
    root.descendants_named("Entity", &mut entity_nodes);
    for node in entity_nodes {
        entities.push(parse_entity(node));
    }

    SchemaDocument {
        option_sets,
        entities,
    }
}

fn parse_option_set(node: &DocNode) -> OptionSetNode {
    let options = node
        .child("options")
        .map(|options| {
            options
                .children_named("option")
                .map(|option| OptionNode {
                    value: option.attr("value").unwrap_or("0").to_string(),
                    label: first_label_description(option),
                })
                .collect()
        })
        .unwrap_or_default();

    OptionSetNode {
        name: node.attr("Name").map(String::from),
        localized_name: node.attr("localizedName").map(String::from),
        options,
    }
}

fn parse_entity(node: &DocNode) -> EntityNode {
    let info_node = node.child("EntityInfo");
    let inner = info_node.and_then(|info| info.child("entity"));

    EntityNode {
        name: child_text(node, "Name"),
        has_entity_info: info_node.is_some(),
        info: inner.map(parse_entity_info),
    }
}

fn parse_entity_info(inner: &DocNode) -> EntityInfoNode {
    let localized_name = inner
        .child("LocalizedNames")
        .and_then(|names| names.child("LocalizedName"))
        .and_then(|n| n.attr("description"))
        .map(String::from);

    let attributes = inner
        .child("attributes")
        .map(|attrs| attrs.children_named("attribute").map(parse_attribute).collect())
        .unwrap_or_default();

    EntityInfoNode {
        schema_name: inner.attr("Name").map(String::from),
        localized_name,
        attributes,
    }
}

fn parse_attribute(node: &DocNode) -> AttributeNode {
    let display_name = node
        .child("displaynames")
        .and_then(|names| {
            names
                .children_named("displayname")
                .find(|n| n.attr("languagecode") == Some(DEFAULT_LANGUAGE_CODE))
        })
        .and_then(|n| n.attr("description"))
        .map(String::from);

    AttributeNode {
        logical_name: child_text(node, "LogicalName"),
        physical_name: node.attr("PhysicalName").map(String::from),
        schema_type: child_text(node, "Type"),
        display_name,
        option_set_name: child_text(node, "OptionSetName"),
        option_set: node.child("optionset").map(parse_inline_option_set),
    }
}

fn parse_inline_option_set(node: &DocNode) -> InlineOptionSet {
    let states = node
        .child("states")
        .map(|states| {
            states
                .children_named("state")
                .filter_map(|s| {
                    Some(StateOption {
                        value: s.attr("value")?.to_string(),
                        invariant_name: s.attr("invariantname")?.to_string(),
                    })
                })
                .collect()
        })
        .unwrap_or_default();

    let statuses = node
        .child("statuses")
        .map(|statuses| {
            statuses
                .children_named("status")
                .filter_map(|s| {
                    Some(StatusOption {
                        value: s.attr("value")?.to_string(),
                        state: s.attr("state").map(String::from),
                        label: first_label_description(s),
                    })
                })
                .collect()
        })
        .unwrap_or_default();

    InlineOptionSet {
        name: node.attr("Name").map(String::from),
        states,
        statuses,
    }
}

fn first_label_description(node: &DocNode) -> Option<String> {
    node.child("labels")
        .and_then(|labels| labels.child("label"))
        .and_then(|label| label.attr("description"))
        .map(String::from)
}

fn child_text(node: &DocNode, name: &str) -> Option<String> {
    let text = node.child(name)?.text_trimmed();
    if text.is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const SAMPLE: &str = r#"
<ImportExportXml>
  <Entities>
    <Entity>
      <Name>contact</Name>
      <EntityInfo>
        <entity Name="Contact">
          <LocalizedNames>
            <LocalizedName description="Contact" languagecode="1033" />
          </LocalizedNames>
          <attributes>
            <attribute PhysicalName="ContactId">
              <Type>primarykey</Type>
              <LogicalName>contactid</LogicalName>
              <displaynames>
                <displayname description="Contact Id" languagecode="1033" />
              </displaynames>
            </attribute>
            <attribute PhysicalName="statecode">
              <Type>state</Type>
              <LogicalName>statecode</LogicalName>
              <optionset Name="contact_statecode">
                <states>
                  <state value="0" invariantname="Active" />
                  <state value="1" invariantname="Inactive" />
                </states>
              </optionset>
            </attribute>
            <attribute PhysicalName="statuscode">
              <Type>status</Type>
              <LogicalName>statuscode</LogicalName>
              <optionset Name="contact_statuscode">
                <statuses>
                  <status value="1" state="0">
                    <labels><label description="Open" languagecode="1033" /></labels>
                  </status>
                </statuses>
              </optionset>
            </attribute>
          </attributes>
        </entity>
      </EntityInfo>
    </Entity>
  </Entities>
  <optionsets>
    <optionset Name="new_color" localizedName="Color">
      <options>
        <option value="1">
          <labels><label description="Red" languagecode="1033" /></labels>
        </option>
        <option value="2">
          <labels><label description="Blue" languagecode="1033" /></labels>
        </option>
      </options>
    </optionset>
  </optionsets>
</ImportExportXml>
"#;

    #[test]
    fn parses_option_sets() {
        let doc = parse_schema(SAMPLE).unwrap();
        assert_eq!(doc.option_sets.len(), 1);
        let os = &doc.option_sets[0];
        assert_eq!(os.name.as_deref(), Some("new_color"));
        assert_eq!(os.localized_name.as_deref(), Some("Color"));
        assert_eq!(os.options.len(), 2);
        assert_eq!(os.options[0].value, "1");
        assert_eq!(os.options[0].label.as_deref(), Some("Red"));
    }

    #[test]
    fn parses_entity_and_attributes() {
        let doc = parse_schema(SAMPLE).unwrap();
        assert_eq!(doc.entities.len(), 1);
        let entity = &doc.entities[0];
        assert_eq!(entity.name.as_deref(), Some("contact"));
        assert!(entity.has_entity_info);

        let info = entity.info.as_ref().unwrap();
        assert_eq!(info.schema_name.as_deref(), Some("Contact"));
        assert_eq!(info.localized_name.as_deref(), Some("Contact"));
        assert_eq!(info.attributes.len(), 3);

        let pk = &info.attributes[0];
        assert_eq!(pk.logical_name.as_deref(), Some("contactid"));
        assert_eq!(pk.schema_type.as_deref(), Some("primarykey"));
        assert_eq!(pk.display_name.as_deref(), Some("Contact Id"));
    }

    #[test]
    fn parses_inline_state_and_status_sets() {
        let doc = parse_schema(SAMPLE).unwrap();
        let info = doc.entities[0].info.as_ref().unwrap();

        let state = info.attributes[1].option_set.as_ref().unwrap();
        assert_eq!(state.states.len(), 2);
        assert_eq!(state.states[0].invariant_name, "Active");

        let status = info.attributes[2].option_set.as_ref().unwrap();
        assert_eq!(status.statuses.len(), 1);
        assert_eq!(status.statuses[0].state.as_deref(), Some("0"));
        assert_eq!(status.statuses[0].label.as_deref(), Some("Open"));
    }

    #[test]
    fn display_name_requires_default_language_code() {
        let xml = r#"
<Entity>
  <Name>lead</Name>
  <EntityInfo>
    <entity Name="Lead">
      <attributes>
        <attribute PhysicalName="Topic">
          <Type>nvarchar</Type>
          <LogicalName>subject</LogicalName>
          <displaynames>
            <displayname description="Sujet" languagecode="1036" />
          </displaynames>
        </attribute>
      </attributes>
    </entity>
  </EntityInfo>
</Entity>"#;
        let doc = parse_schema(xml).unwrap();
        let info = doc.entities[0].info.as_ref().unwrap();
        assert_eq!(info.attributes[0].display_name, None);
    }

    #[test]
    fn missing_entity_info_is_not_fatal_at_parse_time() {
        let doc = parse_schema("<Entities><Entity><Name>ghost</Name></Entity></Entities>").unwrap();
        assert!(!doc.entities[0].has_entity_info);
        assert!(doc.entities[0].info.is_none());
    }

    #[test]
    fn malformed_xml_surfaces_a_syntax_diagnostic() {
        let err = parse_schema("<Entities><Entity></Entities>").unwrap_err();
        assert_eq!(err.code, "DVW-E001");
        assert_eq!(err.severity, DiagnosticSeverity::Error);
        assert!(err.message.contains("XML parsing error"));
    }
}
