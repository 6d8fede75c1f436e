//! Built-in templates. Every call mints fresh field, option, rule and step ids.

use formwork_domain::{
    Field, FieldType, FormTemplate, NewField, RuleKind, RuleValue, Step, ValidationRule,
};
use std::collections::HashMap;

use uuid::Uuid;

pub const CONTACT_FORM_ID: &str = "contact-form";
pub const SURVEY_FORM_ID: &str = "survey-form";
pub const JOB_APPLICATION_ID: &str = "job-application";

pub fn builtin_templates() -> Vec<FormTemplate> {
    vec![contact_form(), customer_survey(), job_application()]
}

pub fn builtin_template(id: &str) -> Option<FormTemplate> {
    builtin_templates()
        .into_iter()
        .find(|template| template.id == id)
}

fn field(kind: FieldType, label: &str, name: &str) -> NewField {
    NewField::new(kind, label, name)
}

fn rule(kind: RuleKind, value: Option<f64>, message: &str) -> ValidationRule {
    ValidationRule::new(kind, value.map(RuleValue::Number), message)
}

fn build(new_fields: Vec<NewField>) -> Vec<Field> {
    new_fields
        .into_iter()
        .map(|field| field.into_field(Uuid::new_v4()))
        .collect()
}

/// Steps holding consecutive runs of `fields`, sized by `layout`.
fn layout_steps(fields: &[Field], layout: &[(&str, usize)]) -> Vec<Step> {
    let mut remaining = fields.iter();
    layout
        .iter()
        .map(|(title, count)| {
            let mut step = Step::new(*title, None);
            step.fields = remaining.by_ref().take(*count).map(|field| field.id).collect();
            step
        })
        .collect()
}

fn template(id: &str, name: &str, description: &str, fields: Vec<Field>, steps: Vec<Step>) -> FormTemplate {
    FormTemplate {
        id: id.into(),
        name: name.into(),
        description: Some(description.into()),
        fields,
        steps: Some(steps),
    }
}

pub fn contact_form() -> FormTemplate {
    let fields = build(vec![
        field(FieldType::Text, "Full Name", "full_name")
            .with_placeholder("Enter your full name")
            .required()
            .with_rule(rule(RuleKind::Required, None, "Please enter your name"))
            .with_rule(rule(
                RuleKind::MinLength,
                Some(2.0),
                "Name must be at least 2 characters",
            )),
        field(FieldType::Email, "Email Address", "email")
            .with_placeholder("Enter your email address")
            .required()
            .with_rule(rule(RuleKind::Required, None, "Please enter your email address"))
            .with_rule(rule(RuleKind::Email, None, "Please enter a valid email address")),
        field(FieldType::Textarea, "Message", "message")
            .with_placeholder("Enter your message")
            .required()
            .with_rule(rule(RuleKind::Required, None, "Please enter a message"))
            .with_rule(rule(
                RuleKind::MinLength,
                Some(10.0),
                "Message must be at least 10 characters",
            )),
    ]);
    let steps = layout_steps(&fields, &[("Contact Information", 3)]);
    template(
        CONTACT_FORM_ID,
        "Contact Form",
        "A simple contact form with name, email, and message fields",
        fields,
        steps,
    )
}

pub fn customer_survey() -> FormTemplate {
    let fields = build(vec![
        field(FieldType::Text, "Name", "name").with_placeholder("Enter your name"),
        field(FieldType::Email, "Email", "email").with_placeholder("Enter your email"),
        field(FieldType::Select, "How did you hear about us?", "referral_source")
            .with_option("Search Engine", "search")
            .with_option("Social Media", "social")
            .with_option("Friend/Colleague", "referral")
            .with_option("Other", "other")
            .required(),
        field(FieldType::Radio, "How would you rate your experience?", "rating")
            .with_option("Excellent", "5")
            .with_option("Good", "4")
            .with_option("Average", "3")
            .with_option("Below Average", "2")
            .with_option("Poor", "1")
            .required(),
        field(FieldType::Textarea, "Additional Comments", "comments")
            .with_placeholder("Please share any additional feedback"),
    ]);
    let steps = layout_steps(&fields, &[("Personal Information", 2), ("Feedback", 3)]);
    template(
        SURVEY_FORM_ID,
        "Customer Survey",
        "A customer feedback survey with multiple question types",
        fields,
        steps,
    )
}

pub fn job_application() -> FormTemplate {
    let fields = build(vec![
        field(FieldType::Text, "First Name", "first_name")
            .with_placeholder("Enter your first name")
            .required(),
        field(FieldType::Text, "Last Name", "last_name")
            .with_placeholder("Enter your last name")
            .required(),
        field(FieldType::Email, "Email Address", "email")
            .with_placeholder("Enter your email address")
            .required(),
        field(FieldType::Tel, "Phone Number", "phone")
            .with_placeholder("Enter your phone number")
            .required(),
        field(FieldType::Select, "Position", "position")
            .with_option("Software Developer", "developer")
            .with_option("Designer", "designer")
            .with_option("Project Manager", "pm")
            .with_option("Marketing Specialist", "marketing")
            .required(),
        field(FieldType::Textarea, "Work Experience", "experience")
            .with_placeholder("Describe your relevant work experience")
            .required(),
        field(FieldType::Textarea, "Education", "education")
            .with_placeholder("Enter your educational background")
            .required(),
        field(FieldType::File, "Resume/CV", "resume")
            .with_help_text("Upload your resume (PDF, DOC, or DOCX)")
            .required(),
    ]);
    let steps = layout_steps(
        &fields,
        &[
            ("Personal Information", 4),
            ("Professional Information", 3),
            ("Documents", 1),
        ],
    );
    template(
        JOB_APPLICATION_ID,
        "Job Application",
        "A multi-step job application form with personal and professional information",
        fields,
        steps,
    )
}

/// Copy of `template` with new field, option, rule and step ids.
///
/// Step references to the template's own fields follow the new ids; any other
/// reference is kept as it was.
pub fn with_fresh_ids(template: &FormTemplate) -> FormTemplate {
    let mut copy = template.clone();
    let mut renamed = HashMap::new();
    for field in &mut copy.fields {
        let id = Uuid::new_v4();
        renamed.insert(field.id, id);
        field.id = id;
        for option in &mut field.options {
            option.id = Uuid::new_v4();
        }
        for rule in &mut field.validation_rules {
            rule.id = Uuid::new_v4();
        }
    }
    if let Some(steps) = copy.steps.as_mut() {
        for step in steps {
            step.id = Uuid::new_v4();
            for field_id in &mut step.fields {
                if let Some(id) = renamed.get(field_id) {
                    *field_id = *id;
                }
            }
        }
    }
    copy
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::document_warnings;
    use chrono::Utc;
    use formwork_domain::FormDocument;

    #[test]
    fn every_builtin_step_references_its_own_fields() {
        for template in builtin_templates() {
            let mut doc =
                FormDocument::new(Uuid::new_v4(), "t", None, Uuid::new_v4(), Utc::now());
            doc.fields = template.fields.clone();
            doc.steps = template.steps.clone().unwrap_or_default();
            assert!(
                document_warnings(&doc).is_empty(),
                "{}: {:?}",
                template.id,
                document_warnings(&doc)
            );
        }
    }

    #[test]
    fn templates_mint_fresh_ids() {
        let first = contact_form();
        let second = contact_form();
        assert_ne!(first.fields[0].id, second.fields[0].id);
        assert_eq!(first.id, second.id);
    }

    #[test]
    fn fresh_ids_keep_step_membership() {
        let template = job_application();
        let copy = with_fresh_ids(&template);
        let stale = Uuid::new_v4();
        let mut with_stale = template.clone();
        if let Some(steps) = with_stale.steps.as_mut() {
            steps[0].fields.push(stale);
        }

        for (old, new) in template.fields.iter().zip(&copy.fields) {
            assert_ne!(old.id, new.id);
            assert_eq!(old.name, new.name);
            for (old_rule, new_rule) in old.validation_rules.iter().zip(&new.validation_rules) {
                assert_ne!(old_rule.id, new_rule.id);
            }
        }
        let old_steps = template.steps.unwrap_or_default();
        let new_steps = copy.steps.unwrap_or_default();
        for (old_step, new_step) in old_steps.iter().zip(&new_steps) {
            assert_ne!(old_step.id, new_step.id);
            assert_eq!(old_step.fields.len(), new_step.fields.len());
            for field_id in &new_step.fields {
                assert!(copy.fields.iter().any(|field| field.id == *field_id));
            }
        }

        let stale_copy = with_fresh_ids(&with_stale);
        let first_step = &stale_copy.steps.unwrap_or_default()[0];
        assert_eq!(first_step.fields.last(), Some(&stale));
    }

    #[test]
    fn job_application_spans_three_steps() {
        let template = builtin_template(JOB_APPLICATION_ID).expect("builtin");
        let steps = template.steps.expect("steps supplied");
        let sizes: Vec<_> = steps.iter().map(|step| step.fields.len()).collect();
        assert_eq!(sizes, vec![4, 3, 1]);
        assert!(builtin_template("missing").is_none());
    }
}
