use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use predicates::str::contains;
use tempfile::TempDir;

fn shell(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("formwork_cli").expect("binary builds");
    cmd.env("FORMWORK_CLI_SCRIPT", "1")
        .env("FORMWORK_HOME", home)
        .env_remove("RUST_LOG");
    cmd
}

fn forms_file(home: &Path) -> String {
    std::fs::read_to_string(home.join("data").join("formBuilder.forms.json"))
        .expect("forms record written")
}

#[test]
fn building_and_filling_a_two_step_form() {
    let home = TempDir::new().unwrap();
    let script = r#"
new-form "Contact us" Reach the team
add-field text Full Name
edit-field full_name required on
add-field email Email
add-rule email email
add-step Details
assign email 2
fill
next
set full_name Ada
next
set email not-an-email
set email ada@example.com
submit
exit
"#;

    shell(home.path())
        .write_stdin(script)
        .assert()
        .success()
        .stdout(contains("Created form `Contact us`"))
        .stdout(contains("Full Name: This field is required"))
        .stdout(contains("Contact us - step 2 of 2"))
        .stdout(contains("Email: Please enter a valid email address"))
        .stdout(contains("Form submitted successfully!"))
        .stdout(contains(r#""full_name": "Ada""#))
        .stdout(contains(r#""email": "ada@example.com""#));

    let json = forms_file(home.path());
    assert!(json.contains("\"Contact us\""));
    assert!(json.contains("\"Details\""));
}

#[test]
fn submitting_before_the_last_step_is_refused() {
    let home = TempDir::new().unwrap();
    let script = "new-form Survey\nuse-template survey-form\nfill\nsubmit\n";

    shell(home.path())
        .write_stdin(script)
        .assert()
        .success()
        .stdout(contains("Applied template `Customer Survey`"))
        .stdout(contains("cannot submit from step 1 of 2"));
}

#[test]
fn forms_survive_a_restart() {
    let home = TempDir::new().unwrap();
    shell(home.path())
        .write_stdin("new-form Onboarding\nduplicate-form 1\n")
        .assert()
        .success();

    shell(home.path())
        .write_stdin("forms\n")
        .assert()
        .success()
        .stdout(contains("Onboarding (0 fields, 1 step)"))
        .stdout(contains("Onboarding (Copy)"));
}

#[test]
fn move_field_reorders_the_saved_document() {
    let home = TempDir::new().unwrap();
    let script = "new-form Order\nadd-field text First\nadd-field text Second\nadd-field text Third\nmove-field third 1\n";

    shell(home.path())
        .write_stdin(script)
        .assert()
        .success()
        .stdout(contains("Moved field to position 1."));

    let json = forms_file(home.path());
    let third = json.find("\"Third\"").expect("third saved");
    let first = json.find("\"First\"").expect("first saved");
    assert!(third < first, "third field should now lead");
}

#[test]
fn rules_are_checked_against_the_field_type() {
    let home = TempDir::new().unwrap();
    let script = "new-form Rules\nadd-field checkbox Agree\nadd-rule agree minLength 3\nadd-field text Code\nadd-rule code minLength 3\nvalidate code ab\nvalidate code abc\n";

    shell(home.path())
        .write_stdin(script)
        .assert()
        .success()
        .stdout(contains("`minLength` rules do not apply to checkbox fields."))
        .stdout(contains("Minimum length is 3 characters"))
        .stdout(contains("`Code` is valid."));
}

#[test]
fn share_link_and_device_preview() {
    let home = TempDir::new().unwrap();
    shell(home.path())
        .write_stdin("new-form Feedback\nshare\ndevice tablet\n")
        .assert()
        .success()
        .stdout(contains("http://localhost:5173/view/"))
        .stdout(contains("Preview device: tablet (768px)"));
}

#[test]
fn backups_can_be_listed() {
    let home = TempDir::new().unwrap();
    shell(home.path())
        .write_stdin("new-form Backed\nbackup before changes\nbackup list\n")
        .assert()
        .success()
        .stdout(contains("Backup written: forms_"))
        .stdout(contains("before-changes"));
}

#[test]
fn unknown_commands_get_a_suggestion() {
    let home = TempDir::new().unwrap();
    shell(home.path())
        .write_stdin("frms\n")
        .assert()
        .success()
        .stdout(contains("Unknown command `frms`"))
        .stdout(contains("Suggestion: `forms`?"));
}

#[test]
fn builder_commands_need_an_open_form() {
    let home = TempDir::new().unwrap();
    shell(home.path())
        .write_stdin("add-field text Name\nshow\n")
        .assert()
        .success()
        .stdout(contains("No form open").count(2));
}

#[test]
fn options_can_be_renamed() {
    let home = TempDir::new().unwrap();
    let script = "new-form Pets\nadd-field select Pet\nadd-option pet Cat\nadd-option pet Dog\nedit-option pet cat Kitten kitten\nedit-option pet 5 Puppy\nshow\n";

    shell(home.path())
        .write_stdin(script)
        .assert()
        .success()
        .stdout(contains("Updated option `Kitten`."))
        .stdout(contains("Kitten=kitten"))
        .stdout(contains("Puppy=dog"));
}

#[test]
fn forms_open_from_share_links() {
    let home = TempDir::new().unwrap();
    shell(home.path())
        .write_stdin("new-form Linked\nnew-form Other\n")
        .assert()
        .success();

    let record: serde_json::Value =
        serde_json::from_str(&forms_file(home.path())).expect("record is json");
    let id = record
        .as_object()
        .and_then(|forms| {
            forms
                .iter()
                .find(|(_, form)| form["title"] == "Linked")
                .map(|(id, _)| id.clone())
        })
        .expect("linked form saved");

    shell(home.path())
        .write_stdin(format!(
            "open https://forms.example.com/app/view/{id}\nopen /builder/{id}\nopen /builder/new\n"
        ))
        .assert()
        .success()
        .stdout(contains("Opened `Linked`.").count(2))
        .stdout(contains("does not point at a form"));
}
