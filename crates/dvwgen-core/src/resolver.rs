use std::collections::HashMap;

use crate::catalogs::{STATE_PHYSICAL_NAME, STATUS_PHYSICAL_NAME};
use crate::sanitize::sanitize;
use crate::types::*;

/// Cross-reference state shared by every entity rendered in one run.
///
/// Built in a fixed order — option sets, then the state enum, then the
/// per-entity status groups — because picklist type resolution and status
/// labeling read the tables the earlier passes fill. Entity rendering takes
/// this by reference, so the ordering is enforced by construction rather
/// than by convention.
#[derive(Debug, Clone, Default)]
pub struct GenContext {
    /// Option-set logical name → sanitized enum name.
    pub enum_names: HashMap<String, String>,
    /// State value → invariant state label.
    pub state_labels: HashMap<String, String>,
    /// Lowercased entity logical name → nested status-reason enum text.
    pub status_enums: HashMap<String, String>,
    /// Rendered text of the enumeration container artifact.
    pub enums_artifact: String,
    pub option_sets_processed: usize,
    pub enums_generated: usize,
    pub warnings: Vec<Diagnostic>,
}

/// Run the option-set, state and status passes over the document.
pub fn build_context(doc: &SchemaDocument) -> GenContext {
    let mut ctx = GenContext::default();

    let mut lines: Vec<String> = Vec::new();
    lines.push("public static class OptionValueSets".to_string());
    lines.push("{".to_string());

    for option_set in &doc.option_sets {
        let display = option_set
            .localized_name
            .as_deref()
            .or(option_set.name.as_deref())
            .unwrap_or("UnnamedOptions");
        let logical = option_set.name.as_deref().unwrap_or(display);
        let enum_name = sanitize(display);

        // Registered before any entity is rendered; picklist attributes
        // resolve against this map.
        ctx.enum_names.insert(logical.to_string(), enum_name.clone());

        render_option_set_enum(&mut lines, &enum_name, &option_set.options);
        ctx.option_sets_processed += 1;
        ctx.enums_generated += 1;
    }

    render_state_enum(doc, &mut lines, &mut ctx);
    build_status_enums(doc, &mut ctx);

    lines.push("}".to_string());
    ctx.enums_artifact = lines.join("\n") + "\n";
    ctx
}

fn render_option_set_enum(lines: &mut Vec<String>, enum_name: &str, options: &[OptionNode]) {
    lines.push(format!("    public enum {}", enum_name));
    lines.push("    {".to_string());
    for option in options {
        let label = option.label.as_deref().unwrap_or("Unnamed");
        lines.push(format!("        {} = {},", sanitize(label), option.value));
    }
    lines.push("    }".to_string());
    lines.push(String::new());
}

/// State pass: the single schema-wide state option set, identified by its
/// fixed physical attribute name. Absence is not an error — the state table
/// stays empty and status grouping falls back to "Unknown".
fn render_state_enum(doc: &SchemaDocument, lines: &mut Vec<String>, ctx: &mut GenContext) {
    let Some(state_set) = find_state_option_set(doc) else {
        return;
    };

    lines.push("public enum StateCode".to_string());
    lines.push("{".to_string());
    for state in &state_set.states {
        lines.push(format!("    {} = {},", sanitize(&state.invariant_name), state.value));
        ctx.state_labels
            .insert(state.value.clone(), state.invariant_name.clone());
    }
    lines.push("}".to_string());
    ctx.enums_generated += 1;
}

fn find_state_option_set(doc: &SchemaDocument) -> Option<&InlineOptionSet> {
    doc.entities
        .iter()
        .filter_map(|e| e.info.as_ref())
        .flat_map(|info| info.attributes.iter())
        .find(|a| a.physical_name.as_deref() == Some(STATE_PHYSICAL_NAME) && a.option_set.is_some())
        .and_then(|a| a.option_set.as_ref())
}

/// Status pass: group each entity's status members by owning state value and
/// render one `<StateLabel>StatusReason` enum per group, nested-class
/// indented for later injection into the entity body.
fn build_status_enums(doc: &SchemaDocument, ctx: &mut GenContext) {
    for entity in &doc.entities {
        let Some(entity_name) = entity.name.as_deref().filter(|n| !n.trim().is_empty()) else {
            continue;
        };

        let mut lines: Vec<String> = Vec::new();
        let attributes = entity
            .info
            .iter()
            .flat_map(|info| info.attributes.iter())
            .filter(|a| a.physical_name.as_deref() == Some(STATUS_PHYSICAL_NAME));

        for attribute in attributes {
            let Some(option_set) = &attribute.option_set else {
                continue;
            };

            // Groups keep the first-encounter order of state values so the
            // rendered text is deterministic.
            let mut groups: Vec<(&str, Vec<&StatusOption>)> = Vec::new();
            for status in &option_set.statuses {
                let Some(state_value) = status.state.as_deref() else {
                    continue;
                };
                match groups.iter_mut().find(|(key, _)| *key == state_value) {
                    Some((_, members)) => members.push(status),
                    None => groups.push((state_value, vec![status])),
                }
            }

            for (state_value, members) in groups {
                let state_label = match ctx.state_labels.get(state_value) {
                    Some(label) => label.clone(),
                    None => {
                        ctx.warnings.push(Diagnostic::warning(
                            "DVW-W002",
                            Some(entity_name),
                            format!(
                                "status group references unmapped state value \"{}\"; using label \"Unknown\"",
                                state_value
                            ),
                        ));
                        "Unknown".to_string()
                    }
                };

                lines.push(format!("    public enum {}StatusReason", sanitize(&state_label)));
                lines.push("    {".to_string());
                for member in members {
                    let label = member
                        .label
                        .clone()
                        .unwrap_or_else(|| format!("Value_{}", member.value));
                    lines.push(format!("        {} = {},", sanitize(&label), member.value));
                }
                lines.push("    }".to_string());
                ctx.enums_generated += 1;
            }
        }

        if !lines.is_empty() {
            ctx.status_enums
                .insert(entity_name.to_lowercase(), lines.join("\n") + "\n");
        }
    }
}
