//! Prompt assembly for the field-to-value mapping request.

use formpilot_protocols::message::FormFieldDescriptor;

/// One line per field. Id, tag, type, name and label are always present;
/// placeholder, autocomplete and options only when non-empty.
pub fn describe_field(field: &FormFieldDescriptor) -> String {
    let mut desc = format!(
        "- id=\"{}\", tag={}, type={}, name=\"{}\", label=\"{}\"",
        field.id, field.tag_name, field.field_type, field.name, field.label
    );
    if !field.placeholder.is_empty() {
        desc.push_str(&format!(", placeholder=\"{}\"", field.placeholder));
    }
    if !field.autocomplete.is_empty() {
        desc.push_str(&format!(", autocomplete=\"{}\"", field.autocomplete));
    }
    if !field.options.is_empty() {
        desc.push_str(&format!(", options=[{}]", field.options.join(", ")));
    }
    desc
}

/// The full mapping prompt: verbatim resume plus the field catalogue,
/// instructing strict JSON output keyed by field id.
pub fn build_autofill_prompt(resume: &str, fields: &[FormFieldDescriptor]) -> String {
    let field_lines = fields
        .iter()
        .map(describe_field)
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "You are an assistant that fills out job application forms using data from a resume.\n\
         \n\
         Below is the resume content:\n\
         ---\n\
         {resume}\n\
         ---\n\
         \n\
         Below are the form fields found on the page:\n\
         {field_lines}\n\
         \n\
         Your task: map each field to the most appropriate value from the resume.\n\
         - Use the field's label, name, placeholder, autocomplete attribute, and type to determine what data it expects.\n\
         - For select fields, pick from the available options.\n\
         - If a field cannot be confidently mapped, omit it from the result.\n\
         - Return ONLY a JSON object where keys are field IDs and values are the strings to fill in.\n\
         - Do NOT include any explanation, only the JSON."
    )
}

#[cfg(test)]
#[path = "prompt_tests.rs"]
mod tests;
