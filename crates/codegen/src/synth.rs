//! Code synthesis: turns a descriptor's configuration schema into the C++
//! fragments merged into the module's templates. Pure text transformation,
//! no I/O; the same descriptor always yields byte-identical fragments.
//!
//! Naming rules: an item `BatchSize` becomes the member `_batchSize` and is
//! read from the configuration object under the spaced key `"Batch Size"`.
//! A termination criterion additionally owns a `..Target` member holding the
//! configured threshold, against which the synthesized check compares the
//! member's current value.

use crate::descriptor::{ConfigItem, ItemKind, ModuleDescriptor};
use serde_json::Value;

/// The synthesized fragments for one module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragments {
    /// Member declarations, one per configuration item in descriptor order.
    pub declarations: String,
    /// `applyConfiguration`: reads items from the configuration object,
    /// honoring defaults when absent.
    pub apply: String,
    /// `readConfiguration`: writes every item's current setting back.
    pub read_back: String,
    /// `checkTermination`: compares criterion members against their targets.
    pub termination: String,
}

/// Synthesizes all fragments for one module descriptor.
#[must_use]
pub fn synthesize(descriptor: &ModuleDescriptor) -> Fragments {
    Fragments {
        declarations: render_declarations(descriptor),
        apply: render_apply(descriptor),
        read_back: render_read_back(descriptor),
        termination: render_termination(descriptor),
    }
}

fn render_declarations(descriptor: &ModuleDescriptor) -> String {
    let mut w = String::new();
    for item in &descriptor.configuration_items {
        let member = member_ident(&item.name);
        w.push_str(&format!("  {} {member};\n", item.kind.cpp_type()));
        if item.termination_criterion {
            w.push_str(&format!("  {} {member}Target;\n", item.kind.cpp_type()));
        }
    }
    w
}

fn render_apply(descriptor: &ModuleDescriptor) -> String {
    let mut w = String::new();
    w.push_str(&format!(
        "void {}::applyConfiguration(nlohmann::json& js)\n{{\n",
        descriptor.target_type_name
    ));
    for item in &descriptor.configuration_items {
        let member = config_member(item);
        let key = spaced_key(&item.name);
        match &item.default {
            Some(default) => w.push_str(&format!(
                " {member} = js.value(\"{key}\", {});\n",
                cpp_literal(item.kind, default)
            )),
            None => w.push_str(&format!(" {member} = js.at(\"{key}\");\n")),
        }
    }
    w.push_str("}\n");
    w
}

fn render_read_back(descriptor: &ModuleDescriptor) -> String {
    let mut w = String::new();
    w.push_str(&format!(
        "nlohmann::json {}::readConfiguration()\n{{\n auto js = nlohmann::json();\n",
        descriptor.target_type_name
    ));
    for item in &descriptor.configuration_items {
        w.push_str(&format!(" js[\"{}\"] = {};\n", spaced_key(&item.name), config_member(item)));
    }
    w.push_str(" return js;\n}\n");
    w
}

fn render_termination(descriptor: &ModuleDescriptor) -> String {
    let criteria: Vec<&ConfigItem> =
        descriptor.configuration_items.iter().filter(|i| i.termination_criterion).collect();

    let mut w = String::new();
    w.push_str(&format!("bool {}::checkTermination()\n{{\n", descriptor.target_type_name));

    if criteria.is_empty() {
        w.push_str(" return false;\n}\n");
        return w;
    }

    w.push_str(" bool terminated = false;\n");
    for item in criteria {
        let member = member_ident(&item.name);
        let spec = item.kind.printf_spec();
        w.push_str(&format!(" if ({member} >= {member}Target)\n {{\n  terminated = true;\n"));
        w.push_str(&format!(
            "  printf(\"[{}] {} reached ({spec} >= {spec}).\\n\", {member}, {member}Target);\n",
            descriptor.target_type_name,
            spaced_key(&item.name)
        ));
        w.push_str(" }\n");
    }
    w.push_str(" return terminated;\n}\n");
    w
}

/// `BatchSize` -> `_batchSize`.
fn member_ident(name: &str) -> String {
    let mut chars = name.chars();
    chars.next().map_or_else(
        || "_".to_owned(),
        |first| format!("_{}{}", first.to_lowercase(), chars.as_str()),
    )
}

/// The member a configuration read targets: criterion items store the
/// configured threshold separately from their running value.
fn config_member(item: &ConfigItem) -> String {
    let member = member_ident(&item.name);
    if item.termination_criterion { format!("{member}Target") } else { member }
}

/// `BatchSize` -> `Batch Size`; acronym runs stay intact (`CMAESSigma` ->
/// `CMAES Sigma`).
fn spaced_key(name: &str) -> String {
    let chars: Vec<char> = name.chars().collect();
    let mut key = String::with_capacity(name.len() + 4);

    for (i, &c) in chars.iter().enumerate() {
        if i > 0 && c.is_uppercase() {
            let prev = chars[i - 1];
            let next_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
            if prev.is_lowercase() || prev.is_ascii_digit() || (prev.is_uppercase() && next_lower) {
                key.push(' ');
            }
        }
        key.push(c);
    }

    key
}

fn cpp_literal(kind: ItemKind, value: &Value) -> String {
    match kind {
        ItemKind::Int | ItemKind::Scalar | ItemKind::Flag => value.to_string(),
        ItemKind::Str => format!("\"{}\"", escape_str(value.as_str().unwrap_or_default())),
        ItemKind::List => {
            let items: Vec<String> =
                value.as_array().map_or_else(Vec::new, |a| a.iter().map(Value::to_string).collect());
            format!("std::vector<double>({{{}}})", items.join(", "))
        }
        ItemKind::NestedObject => format!("nlohmann::json::parse(R\"({value})\")"),
    }
}

fn escape_str(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}
