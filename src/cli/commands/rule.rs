use formwork_core::{
    editor::{applicable_rule_kinds, default_rule},
    validation::default_message,
};
use formwork_domain::{RuleKind, RuleValue};

use crate::cli::commands::form::parse_switch;
use crate::cli::core::{
    field_in, parse_position, require_arg, rest, CommandError, CommandResult, ShellContext,
};
use crate::cli::io;
use crate::cli::registry::CommandEntry;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "add-rule",
            "Attach a validation rule to a field",
            "add-rule <field> <kind> [value] [message...]",
            cmd_add_rule,
        ),
        CommandEntry::new(
            "remove-rule",
            "Remove a validation rule by kind or position",
            "remove-rule <field> <kind|position>",
            cmd_remove_rule,
        ),
    ]
}

fn parse_rule_kind(raw: &str) -> Result<RuleKind, CommandError> {
    RuleKind::parse(raw).ok_or_else(|| {
        let known: Vec<&str> = RuleKind::ALL.iter().map(|kind| kind.as_str()).collect();
        CommandError::InvalidArguments(format!(
            "Unknown rule `{raw}`. Known rules: {}.",
            known.join(", ")
        ))
    })
}

/// Reads a rule constraint in the shape its kind expects.
pub(crate) fn parse_rule_value(kind: RuleKind, raw: &str) -> Result<RuleValue, CommandError> {
    match kind {
        RuleKind::MinLength | RuleKind::MaxLength | RuleKind::Min | RuleKind::Max => raw
            .trim()
            .parse::<f64>()
            .map(RuleValue::Number)
            .map_err(|_| {
                CommandError::InvalidArguments(format!(
                    "`{}` needs a number, got `{raw}`.",
                    kind.as_str()
                ))
            }),
        RuleKind::Pattern => Ok(RuleValue::Text(raw.to_string())),
        RuleKind::Required | RuleKind::Email | RuleKind::Url | RuleKind::Tel => {
            parse_switch(Some(raw)).map(RuleValue::Bool)
        }
    }
}

fn cmd_add_rule(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let usage = "add-rule <field> <kind> [value] [message...]";
    let field_id = context.resolve_field(require_arg(args, 0, usage)?)?;
    let kind = parse_rule_kind(require_arg(args, 1, usage)?)?;
    let field = field_in(context.open_form()?, field_id)?;

    if !applicable_rule_kinds(field.kind).contains(&kind) {
        return Err(CommandError::InvalidArguments(format!(
            "`{}` rules do not apply to {} fields.",
            kind.as_str(),
            field.kind
        )));
    }
    if field.validation_rules.iter().any(|rule| rule.kind == kind) {
        return Err(CommandError::Message(format!(
            "`{}` already has a `{}` rule.",
            field.label,
            kind.as_str()
        )));
    }

    let mut rule = default_rule(kind);
    if let Some(raw) = args.get(2) {
        let value = parse_rule_value(kind, raw)?;
        rule.message = default_message(kind, Some(&value));
        rule.value = Some(value);
    }
    if let Some(message) = rest(args, 3) {
        rule.message = message;
    }
    let label = field.label.clone();
    context
        .store
        .add_validation_rule(field_id, rule)
        .ok_or(CommandError::FormNotOpen)?;
    io::print_success(format!("Added `{}` rule to `{label}`.", kind.as_str()));
    Ok(())
}

fn cmd_remove_rule(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let usage = "remove-rule <field> <kind|position>";
    let field_id = context.resolve_field(require_arg(args, 0, usage)?)?;
    let raw = require_arg(args, 1, usage)?;
    let field = field_in(context.open_form()?, field_id)?;
    let rule = match RuleKind::parse(raw) {
        Some(kind) => field.validation_rules.iter().find(|rule| rule.kind == kind),
        None => field.validation_rules.get(parse_position(raw, "rule")?),
    }
    .ok_or_else(|| {
        CommandError::InvalidArguments(format!("`{}` has no rule `{raw}`.", field.label))
    })?;
    let (rule_id, kind) = (rule.id, rule.kind);
    context.store.remove_validation_rule(field_id, rule_id);
    io::print_success(format!("Removed `{}` rule.", kind.as_str()));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rule_values_follow_the_rule_kind() {
        assert_eq!(
            parse_rule_value(RuleKind::MinLength, "5").expect("number"),
            RuleValue::Number(5.0)
        );
        assert!(parse_rule_value(RuleKind::Max, "lots").is_err());
        assert_eq!(
            parse_rule_value(RuleKind::Pattern, "^[a-z]+$").expect("pattern"),
            RuleValue::Text("^[a-z]+$".into())
        );
        assert_eq!(
            parse_rule_value(RuleKind::Email, "on").expect("flag"),
            RuleValue::Bool(true)
        );
    }

    #[test]
    fn rule_names_use_stored_spelling() {
        assert_eq!(parse_rule_kind("minLength").expect("known"), RuleKind::MinLength);
        assert!(parse_rule_kind("shouting").is_err());
    }
}
