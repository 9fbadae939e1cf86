//! End-to-end pipeline scenarios over inline customizations documents.

use dvwgen_core::{generate, parse_schema, sanitize, ArtifactKind, GenerateOptions};

const SOLUTION: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<ImportExportXml>
  <Entities>
    <Entity>
      <Name>Account</Name>
      <EntityInfo>
        <entity Name="Account">
          <LocalizedNames>
            <LocalizedName description="Account" languagecode="1033" />
          </LocalizedNames>
          <attributes>
            <attribute PhysicalName="AccountId">
              <Type>primarykey</Type>
              <LogicalName>accountid</LogicalName>
              <displaynames>
                <displayname description="Account" languagecode="1033" />
              </displaynames>
            </attribute>
            <attribute PhysicalName="Name">
              <Type>nvarchar</Type>
              <LogicalName>name</LogicalName>
              <displaynames>
                <displayname description="Account Name" languagecode="1033" />
              </displaynames>
            </attribute>
            <attribute PhysicalName="Revenue">
              <Type>money</Type>
              <LogicalName>revenue</LogicalName>
              <displaynames>
                <displayname description="Annual Revenue" languagecode="1033" />
              </displaynames>
            </attribute>
            <attribute PhysicalName="statecode">
              <Type>state</Type>
              <LogicalName>statecode</LogicalName>
              <displaynames>
                <displayname description="Status" languagecode="1033" />
              </displaynames>
              <optionset Name="account_statecode">
                <states>
                  <state value="1" invariantname="Active" />
                  <state value="2" invariantname="Inactive" />
                </states>
              </optionset>
            </attribute>
            <attribute PhysicalName="statuscode">
              <Type>status</Type>
              <LogicalName>statuscode</LogicalName>
              <displaynames>
                <displayname description="Status Reason" languagecode="1033" />
              </displaynames>
              <optionset Name="account_statuscode">
                <statuses>
                  <status value="10" state="1">
                    <labels><label description="Open" languagecode="1033" /></labels>
                  </status>
                  <status value="11" state="1">
                    <labels><label description="Under Review" languagecode="1033" /></labels>
                  </status>
                  <status value="90" state="9">
                    <labels><label description="Orphaned" languagecode="1033" /></labels>
                  </status>
                </statuses>
              </optionset>
            </attribute>
          </attributes>
        </entity>
      </EntityInfo>
    </Entity>
    <Entity>
      <Name>Lead</Name>
      <EntityInfo>
        <entity Name="Lead">
          <LocalizedNames>
            <LocalizedName description="Lead" languagecode="1033" />
          </LocalizedNames>
          <attributes>
            <attribute PhysicalName="LeadId">
              <Type>primarykey</Type>
              <LogicalName>leadid</LogicalName>
              <displaynames>
                <displayname description="Lead" languagecode="1033" />
              </displaynames>
            </attribute>
            <attribute PhysicalName="new_Color">
              <Type>picklist</Type>
              <LogicalName>new_color</LogicalName>
              <OptionSetName>new_color</OptionSetName>
              <displaynames>
                <displayname description="Color" languagecode="1033" />
              </displaynames>
            </attribute>
            <attribute PhysicalName="new_Shade">
              <Type>picklist</Type>
              <LogicalName>new_shade</LogicalName>
              <OptionSetName>new_shade</OptionSetName>
              <displaynames>
                <displayname description="Shade" languagecode="1033" />
              </displaynames>
            </attribute>
          </attributes>
        </entity>
      </EntityInfo>
    </Entity>
  </Entities>
  <optionsets>
    <optionset Name="new_color" localizedName="Color">
      <options>
        <option value="1"><labels><label description="Red" languagecode="1033" /></labels></option>
        <option value="2"><labels><label description="Blue" languagecode="1033" /></labels></option>
      </options>
    </optionset>
  </optionsets>
</ImportExportXml>
"#;

fn run(filter: Option<&str>) -> dvwgen_core::GenerateResult {
    let doc = parse_schema(SOLUTION).expect("sample document parses");
    let options = GenerateOptions {
        filter_contains: filter.map(String::from),
    };
    generate(&doc, &options).expect("generation succeeds")
}

#[test]
fn option_set_renders_expected_enum_members() {
    let result = run(None);
    let container = &result.artifacts[0];
    assert_eq!(container.kind, ArtifactKind::OptionSets);
    assert!(container.content.contains("public static class OptionValueSets"));
    assert!(container.content.contains("    public enum Color"));
    assert!(container.content.contains("        Red = 1,"));
    assert!(container.content.contains("        Blue = 2,"));
}

#[test]
fn state_enum_is_part_of_the_container() {
    let result = run(None);
    let container = &result.artifacts[0].content;
    assert!(container.contains("public enum StateCode"));
    assert!(container.contains("    Active = 1,"));
    assert!(container.contains("    Inactive = 2,"));
}

#[test]
fn entity_class_resolves_picklist_through_option_set() {
    let result = run(None);
    let lead = result
        .artifacts
        .iter()
        .find(|a| a.file_name == "Lead.cs")
        .expect("Lead artifact");
    assert!(lead.content.contains("    public Guid Id { get; set; }"));
    assert!(lead.content.contains("    public Color Color { get; set; }"));
    // unknown option set reference degrades to int, generation continues
    assert!(lead.content.contains("    public int Shade { get; set; }"));
    assert!(result.warnings.iter().any(|w| w.code == "DVW-W001"));
}

#[test]
fn status_groups_render_per_state_with_unknown_fallback() {
    let result = run(None);
    let account = result
        .artifacts
        .iter()
        .find(|a| a.file_name == "Account.cs")
        .expect("Account artifact");

    assert!(account.content.contains("    public enum ActiveStatusReason"));
    assert!(account.content.contains("        Open = 10,"));
    assert!(account.content.contains("        UnderReview = 11,"));
    // state value 9 is not in the state table → Unknown group
    assert!(account.content.contains("    public enum UnknownStatusReason"));
    assert!(account.content.contains("        Orphaned = 90,"));
    assert!(!account.content.contains("InactiveStatusReason"));
}

#[test]
fn status_injection_matches_entity_case_insensitively() {
    // The status table is keyed by the lowercased <Name> child ("Account"),
    // the class body looks up the lowercased schema name; they must meet.
    let result = run(None);
    let account = result
        .artifacts
        .iter()
        .find(|a| a.file_name == "Account.cs")
        .unwrap();
    assert!(account.content.contains("ActiveStatusReason"));
}

#[test]
fn state_and_status_reason_attributes_use_override_paths() {
    let result = run(None);
    let account = result
        .artifacts
        .iter()
        .find(|a| a.file_name == "Account.cs")
        .unwrap();
    assert!(account.content.contains("    public StateCode State { get; set; }"));
    assert!(account.content.contains("    public int? StatusReason { get; set; }"));
    assert!(account.content.contains("    public object StatusReasonEnum"));
}

#[test]
fn every_generated_method_references_the_primary_key() {
    let result = run(None);
    for artifact in result.artifacts.iter().filter(|a| a.kind == ArtifactKind::Entity) {
        assert!(artifact.content.contains("public Guid Id { get; set; }"));
        assert!(artifact.content.contains("this.Id = _service.Create(entity);"));
        assert!(artifact.content.contains("entity.Id = this.Id;"));
        assert!(artifact.content.contains("this.Id = id;"));
        assert!(artifact.content.contains(", this.Id);"));
    }
}

#[test]
fn filter_includes_and_excludes_case_insensitively() {
    let result = run(Some("acc"));
    let names: Vec<&str> = result
        .artifacts
        .iter()
        .filter(|a| a.kind == ArtifactKind::Entity)
        .map(|a| a.file_name.as_str())
        .collect();
    assert_eq!(names, vec!["Account.cs"]);
}

#[test]
fn pipeline_is_idempotent() {
    let first = run(None);
    let second = run(None);
    assert_eq!(first.artifacts.len(), second.artifacts.len());
    for (a, b) in first.artifacts.iter().zip(second.artifacts.iter()) {
        assert_eq!(a.file_name, b.file_name);
        assert_eq!(a.content, b.content);
    }
}

#[test]
fn counters_reflect_generated_output() {
    let result = run(None);
    assert_eq!(result.counters.entities_generated, 2);
    assert_eq!(result.counters.option_sets_processed, 1);
    // Color + StateCode + ActiveStatusReason + UnknownStatusReason
    assert_eq!(result.counters.enums_generated, 4);
}

#[test]
fn sanitized_labels_are_always_valid_identifiers() {
    for label in ["Account Name", "1st Tier", "élan vital", "--", "A/B (test)"] {
        let id = sanitize(label);
        assert!(!id.is_empty());
        assert!(!id.chars().next().unwrap().is_numeric());
        assert!(id.chars().all(|c| c.is_alphanumeric() || c == '_'));
    }
}
