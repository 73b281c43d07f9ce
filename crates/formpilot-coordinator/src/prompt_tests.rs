use formpilot_protocols::message::FormFieldDescriptor;

use super::*;

fn bare_field() -> FormFieldDescriptor {
    FormFieldDescriptor {
        id: "name".to_string(),
        tag_name: "input".to_string(),
        field_type: "text".to_string(),
        name: "full_name".to_string(),
        label: "Full name".to_string(),
        placeholder: String::new(),
        autocomplete: String::new(),
        options: Vec::new(),
    }
}

#[test]
fn test_describe_field_minimal() {
    let line = describe_field(&bare_field());
    assert_eq!(
        line,
        "- id=\"name\", tag=input, type=text, name=\"full_name\", label=\"Full name\""
    );
}

#[test]
fn test_describe_field_includes_optionals_only_when_set() {
    let mut field = bare_field();
    field.placeholder = "Jane Doe".to_string();
    field.autocomplete = "name".to_string();

    let line = describe_field(&field);
    assert!(line.contains("placeholder=\"Jane Doe\""));
    assert!(line.contains("autocomplete=\"name\""));
    assert!(!line.contains("options="));
}

#[test]
fn test_describe_field_lists_select_options() {
    let mut field = bare_field();
    field.tag_name = "select".to_string();
    field.field_type = "select".to_string();
    field.options = vec!["Brazil".to_string(), "Portugal".to_string()];

    let line = describe_field(&field);
    assert!(line.contains("options=[Brazil, Portugal]"));
}

#[test]
fn test_prompt_embeds_resume_verbatim() {
    let resume = "Ada Lovelace\nMathematician & programmer\n+44 20 7946 0000";
    let prompt = build_autofill_prompt(resume, &[bare_field()]);

    assert!(prompt.contains(resume));
    assert!(prompt.contains("- id=\"name\""));
}

#[test]
fn test_prompt_demands_strict_json() {
    let prompt = build_autofill_prompt("resume", &[bare_field()]);

    assert!(prompt.contains("Return ONLY a JSON object"));
    assert!(prompt.contains("omit it from the result"));
    assert!(prompt.contains("For select fields, pick from the available options."));
}

#[test]
fn test_prompt_one_line_per_field() {
    let mut second = bare_field();
    second.id = "email".to_string();

    let prompt = build_autofill_prompt("resume", &[bare_field(), second]);
    let field_lines = prompt
        .lines()
        .filter(|l| l.starts_with("- id="))
        .count();
    assert_eq!(field_lines, 2);
}
