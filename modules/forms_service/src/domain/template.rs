//! Entry title rendering

use crate::contract::{ContentMap, Form};

/// Title template for new entries of a form
pub fn entry_title_template(form: &Form) -> String {
    match form.settings.entry_title_template() {
        Some(template) => template.to_string(),
        None => format!("New entry for {}", form.title),
    }
}

/// Replace each `{key}` with the content value for `key`.
///
/// Placeholders without a matching key stay verbatim.
pub fn render_title(template: &str, content: &ContentMap) -> String {
    let mut title = template.to_string();
    for (key, value) in content.iter() {
        let placeholder = format!("{{{}}}", key);
        if title.contains(&placeholder) {
            title = title.replace(&placeholder, value);
        }
    }
    title
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contract::{ContentField, FormFields, FormSettings};
    use uuid::Uuid;

    fn content(pairs: &[(&str, &str)]) -> ContentMap {
        ContentMap::from_fields(pairs.iter().map(|(k, v)| ContentField::new(*k, *v))).unwrap()
    }

    #[test]
    fn test_render_replaces_every_occurrence() {
        let title = render_title(
            "{name} wrote: {subject} ({name})",
            &content(&[("name", "Alice"), ("subject", "Hello")]),
        );
        assert_eq!(title, "Alice wrote: Hello (Alice)");
    }

    #[test]
    fn test_unmatched_placeholders_stay() {
        let title = render_title("Message from {name} at {company}", &content(&[("name", "Alice")]));
        assert_eq!(title, "Message from Alice at {company}");
    }

    #[test]
    fn test_fallback_template_uses_form_title() {
        let mut form = Form {
            id: Uuid::new_v4(),
            handle: "contact-us".to_string(),
            title: "Contact us".to_string(),
            fields: FormFields::default(),
            settings: FormSettings::default(),
        };
        assert_eq!(entry_title_template(&form), "New entry for Contact us");

        form.settings.entry_title = Some("Message from {name}".to_string());
        assert_eq!(entry_title_template(&form), "Message from {name}");
    }
}
