use crate::domain::{DomainSet, origin_of, resolve_action};
use crate::error::{Result, ScanError};
use crate::result::{
    ButtonRecord, DEFAULT_ENCTYPE, FieldRecord, FormExtraction, FormRecord, OptionRecord,
};
use scraper::{ElementRef, Html, Selector};
use std::collections::{HashMap, HashSet};
use std::fmt;
use tracing::debug;
use url::Url;

/// Deduplication key for a form: its raw identifying attributes, compared by value.
///
/// Absent attributes are empty strings, so `<form>` and `<form action="">` collide.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FormSignature {
    pub action: String,
    pub method: String,
    pub id: String,
    pub name: String,
    pub class: String,
}

impl FormSignature {
    pub fn from_element(form: &ElementRef<'_>) -> Self {
        let attr = |name: &str| form.value().attr(name).unwrap_or_default().to_string();
        Self {
            action: attr("action"),
            method: attr("method"),
            id: attr("id"),
            name: attr("name"),
            class: attr("class"),
        }
    }
}

/// Backslash-escape `\` and `|` so the joined form stays unambiguous
fn escape_part(part: &str) -> String {
    part.replace('\\', "\\\\").replace('|', "\\|")
}

impl fmt::Display for FormSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}|{}|{}|{}|{}",
            escape_part(&self.action),
            escape_part(&self.method),
            escape_part(&self.id),
            escape_part(&self.name),
            escape_part(&self.class)
        )
    }
}

/// Pick a stable identifier for the form at `index`.
///
/// Explicit `id`, then `name`, then `form-{alnum action}-{index}`, then `form-{index}`.
pub fn derive_form_id(
    id: Option<&str>,
    name: Option<&str>,
    action: Option<&str>,
    index: usize,
) -> String {
    fn present(v: Option<&str>) -> Option<&str> {
        v.map(str::trim).filter(|s| !s.is_empty())
    }

    if let Some(id) = present(id) {
        return id.to_string();
    }
    if let Some(name) = present(name) {
        return name.to_string();
    }
    if let Some(action) = present(action) {
        let slug: String = action.chars().filter(|c| c.is_ascii_alphanumeric()).collect();
        if !slug.is_empty() {
            return format!("form-{}-{}", slug, index);
        }
    }
    format!("form-{}", index)
}

fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css)
        .map_err(|e| ScanError::ParseError(format!("invalid selector '{}': {}", css, e)))
}

struct FieldSelectors {
    input: Selector,
    textarea: Selector,
    select: Selector,
    controls: Selector,
    button: Selector,
    option: Selector,
    label: Selector,
}

impl FieldSelectors {
    fn new() -> Result<Self> {
        Ok(Self {
            input: selector("input")?,
            textarea: selector("textarea")?,
            select: selector("select")?,
            controls: selector("input, textarea, select")?,
            button: selector("button")?,
            option: selector("option")?,
            label: selector("label[for]")?,
        })
    }
}

fn text_of(element: &ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

fn lowered_attr(element: &ElementRef<'_>, name: &str) -> Option<String> {
    element
        .value()
        .attr(name)
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_ascii_lowercase)
}

/// `label[for]` text keyed by the id it points at; the first label wins
fn collect_labels(document: &Html, selectors: &FieldSelectors) -> HashMap<String, String> {
    let mut labels = HashMap::new();
    for label in document.select(&selectors.label) {
        let target = label.value().attr("for").unwrap_or_default().trim();
        if !target.is_empty() {
            labels
                .entry(target.to_string())
                .or_insert_with(|| text_of(&label));
        }
    }
    labels
}

/// Split a form's controls into fillable fields and buttons, in document order
fn collect_controls(
    form: &ElementRef<'_>,
    selectors: &FieldSelectors,
    labels: &HashMap<String, String>,
) -> (Vec<FieldRecord>, Vec<ButtonRecord>) {
    let mut fields = Vec::new();
    let mut buttons = Vec::new();

    for control in form.select(&selectors.controls) {
        let element = control.value();
        let attr = |name: &str| element.attr(name).unwrap_or_default().trim().to_string();
        let tag = element.name().to_string();
        let field_type = match lowered_attr(&control, "type") {
            Some(kind) => kind,
            None if tag == "input" => "text".to_string(),
            None => tag.clone(),
        };

        if tag == "input" && matches!(field_type.as_str(), "submit" | "button" | "reset" | "image")
        {
            buttons.push(ButtonRecord {
                button_type: field_type,
                name: attr("name"),
                value: attr("value"),
                text: String::new(),
            });
            continue;
        }

        let id = attr("id");
        let label = if id.is_empty() {
            None
        } else {
            labels.get(&id).cloned()
        };
        let options = if tag == "select" {
            control
                .select(&selectors.option)
                .map(|option| OptionRecord {
                    text: text_of(&option),
                    value: option.value().attr("value").unwrap_or_default().to_string(),
                })
                .collect()
        } else {
            Vec::new()
        };

        fields.push(FieldRecord {
            tag,
            field_type,
            name: attr("name"),
            id,
            placeholder: attr("placeholder"),
            required: element.attr("required").is_some(),
            label,
            options,
        });
    }

    for button in form.select(&selectors.button) {
        let element = button.value();
        buttons.push(ButtonRecord {
            // HTML's default for a bare <button> inside a form
            button_type: lowered_attr(&button, "type").unwrap_or_else(|| "submit".to_string()),
            name: element.attr("name").unwrap_or_default().trim().to_string(),
            value: element.attr("value").unwrap_or_default().trim().to_string(),
            text: text_of(&button),
        });
    }

    (fields, buttons)
}

/// Find every distinct `<form>` in `html`, in document order.
///
/// `page_label` is the page URL as the caller spelled it and is only used to
/// build `page#id` links; `page_url` is the base for resolving actions.
pub fn extract_forms(html: &str, page_label: &str, page_url: &Url) -> Result<FormExtraction> {
    let document = Html::parse_document(html);
    let form_selector = selector("form")?;
    let fields = FieldSelectors::new()?;
    let labels = collect_labels(&document, &fields);

    let mut extraction = FormExtraction::new(page_label.to_string());
    let mut seen: HashSet<FormSignature> = HashSet::new();
    let mut domains = DomainSet::new();

    for (index, form) in document.select(&form_selector).enumerate() {
        let element = form.value();
        let signature = FormSignature::from_element(&form);

        if seen.contains(&signature) {
            debug!("Skipping duplicate form #{} ({})", index, signature);
            extraction.duplicates_skipped += 1;
            continue;
        }

        let id = derive_form_id(
            element.attr("id"),
            element.attr("name"),
            element.attr("action"),
            index,
        );

        let action = resolve_action(page_url, &signature.action);
        let domain = origin_of(&action);
        domains.insert(&domain);

        let method = if signature.method.trim().is_empty() {
            "GET".to_string()
        } else {
            signature.method.trim().to_uppercase()
        };

        let input_count = form.select(&fields.input).count();
        let textarea_count = form.select(&fields.textarea).count();
        let select_count = form.select(&fields.select).count();
        let (controls, buttons) = collect_controls(&form, &fields, &labels);
        let enctype =
            lowered_attr(&form, "enctype").unwrap_or_else(|| DEFAULT_ENCTYPE.to_string());

        debug!(
            "Form #{} id={} action={} fields={}",
            index,
            id,
            action,
            input_count + textarea_count + select_count
        );

        extraction.forms.push(FormRecord {
            id,
            name: signature.name.clone(),
            action: action.to_string(),
            method,
            domain,
            input_count,
            textarea_count,
            select_count,
            total_fields: input_count + textarea_count + select_count,
            signature: signature.to_string(),
            enctype,
            has_file_upload: controls.iter().any(|f| f.field_type == "file"),
            has_required_fields: controls.iter().any(|f| f.required),
            fields: controls,
            buttons,
        });
        seen.insert(signature);
    }

    extraction.domains = domains.into_vec();
    Ok(extraction)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = "https://example.com/page";

    fn run(html: &str) -> FormExtraction {
        let url = Url::parse(PAGE).unwrap();
        extract_forms(html, PAGE, &url).unwrap()
    }

    #[test]
    fn test_distinct_forms_all_emitted() {
        let html = r#"<html><body>
            <form id="login" action="/login" method="post"><input name="u"><input name="p" type="password"></form>
            <form id="search" action="/search"><input name="q"></form>
            <form class="newsletter" action="https://mail.example.org/subscribe"><input name="email"></form>
        </body></html>"#;

        let extraction = run(html);
        assert_eq!(extraction.forms.len(), 3);
        assert_eq!(extraction.duplicates_skipped, 0);
        assert_eq!(extraction.forms[0].id, "login");
        assert_eq!(extraction.forms[0].method, "POST");
        assert_eq!(extraction.forms[1].method, "GET");
        assert_eq!(extraction.forms[2].domain, "https://mail.example.org");
    }

    #[test]
    fn test_identical_forms_deduplicated() {
        let html = r#"
            <form action="/subscribe" method="post" class="nl"><input name="email"></form>
            <p>footer</p>
            <form action="/subscribe" method="post" class="nl"><input name="email"><input name="extra"></form>
        "#;

        let extraction = run(html);
        assert_eq!(extraction.forms.len(), 1);
        assert_eq!(extraction.duplicates_skipped, 1);
        // the first occurrence wins
        assert_eq!(extraction.forms[0].input_count, 1);
    }

    #[test]
    fn test_forms_differing_only_by_class_are_distinct() {
        let html = r#"
            <form action="/a" class="x"></form>
            <form action="/a" class="y"></form>
        "#;
        assert_eq!(run(html).forms.len(), 2);
    }

    #[test]
    fn test_delimiter_in_attribute_does_not_collide() {
        // joined with '|' these two would produce the same string
        let html = r#"
            <form action="a|b" method=""></form>
            <form action="a" method="b|"></form>
        "#;
        let extraction = run(html);
        assert_eq!(extraction.forms.len(), 2);
        assert_ne!(extraction.forms[0].signature, extraction.forms[1].signature);
    }

    #[test]
    fn test_signature_escapes_delimiter_and_backslash() {
        let extraction = run(r#"
            <form action="a|b" method=""></form>
            <form action="a" method="b|"></form>
            <form action="x\" method="|"></form>
            <form action="x" method="\|"></form>
        "#);
        let signatures: Vec<&str> = extraction
            .forms
            .iter()
            .map(|f| f.signature.as_str())
            .collect();
        assert_eq!(signatures[0], r"a\|b||||");
        assert_eq!(signatures[1], r"a|b\||||");
        let unique: HashSet<&str> = signatures.iter().copied().collect();
        assert_eq!(unique.len(), 4);
    }

    #[test]
    fn test_field_counts() {
        let html = r#"
            <form id="contact">
                <input name="a"><input name="b" type="hidden">
                <textarea name="msg"></textarea>
                <select name="topic"><option>1</option></select>
                <select name="other"></select>
                <button type="submit">Send</button>
            </form>
        "#;

        let form = &run(html).forms[0];
        assert_eq!(form.input_count, 2);
        assert_eq!(form.textarea_count, 1);
        assert_eq!(form.select_count, 2);
        assert_eq!(form.total_fields, 5);
        assert_eq!(
            form.total_fields,
            form.input_count + form.textarea_count + form.select_count
        );
    }

    #[test]
    fn test_empty_form_has_zero_fields() {
        let form = &run("<form id='empty'></form>").forms[0];
        assert_eq!(form.total_fields, 0);
    }

    #[test]
    fn test_relative_action_resolution() {
        let form = &run(r#"<form action="/submit"></form>"#).forms[0];
        assert_eq!(form.action, "https://example.com/submit");
        assert_eq!(form.domain, "https://example.com");
    }

    #[test]
    fn test_missing_action_uses_page_url() {
        let extraction = run(r#"<form id="f"><input></form><form id="g" action=""></form>"#);
        assert_eq!(extraction.forms[0].action, PAGE);
        assert_eq!(extraction.forms[1].action, PAGE);
        assert_eq!(extraction.domains, vec!["https://example.com".to_string()]);
    }

    #[test]
    fn test_domains_unique_in_first_seen_order() {
        let html = r#"
            <form id="1" action="https://b.example.net/x"></form>
            <form id="2" action="/local"></form>
            <form id="3" action="https://b.example.net/y"></form>
            <form id="4"></form>
        "#;
        let extraction = run(html);
        assert_eq!(extraction.forms.len(), 4);
        assert_eq!(
            extraction.domains,
            vec![
                "https://b.example.net".to_string(),
                "https://example.com".to_string()
            ]
        );
    }

    #[test]
    fn test_id_fallback_chain() {
        let html = r#"
            <form id="explicit" name="ignored"></form>
            <form name="by-name"></form>
            <form action="/api/v1/submit.php"></form>
            <form></form>
        "#;
        let ids: Vec<String> = run(html).forms.into_iter().map(|f| f.id).collect();
        assert_eq!(ids, vec!["explicit", "by-name", "form-apiv1submitphp-2", "form-3"]);
    }

    #[test]
    fn test_derive_form_id_ignores_blank_attributes() {
        assert_eq!(derive_form_id(Some(""), Some("  "), None, 4), "form-4");
        assert_eq!(derive_form_id(None, None, Some("/"), 1), "form-1");
        assert_eq!(derive_form_id(Some(" main "), None, None, 0), "main");
    }

    #[test]
    fn test_signature_string() {
        let form = &run(r#"<form action="/a" method="post" id="x" name="n" class="c"></form>"#).forms[0];
        assert_eq!(form.signature, "/a|post|x|n|c");
        assert_eq!(form.name, "n");
    }

    #[test]
    fn test_form_links_use_caller_spelling() {
        let url = Url::parse("https://example.com").unwrap();
        let extraction =
            extract_forms("<form id='a'></form>", "https://example.com", &url).unwrap();
        assert_eq!(extraction.form_links(), vec!["https://example.com#a"]);
        assert_eq!(extraction.forms[0].action, "https://example.com/");
    }

    #[test]
    fn test_field_details() {
        let html = r#"
            <label for="email">Email address</label>
            <form id="signup" enctype="multipart/form-data" method="post">
                <input id="email" type="email" name="email" placeholder="you@example.com" required>
                <input name="nick">
                <textarea name="bio"></textarea>
                <select name="plan">
                    <option value="free"> Free </option>
                    <option>Pro</option>
                </select>
                <input type="file" name="avatar">
                <input type="submit" name="go" value="Join">
                <button>Sign up</button>
                <button type="reset">Clear</button>
            </form>
        "#;
        let form = &run(html).forms[0];

        assert_eq!(form.enctype, "multipart/form-data");
        assert!(form.has_file_upload);
        assert!(form.has_required_fields);

        let types: Vec<&str> = form.fields.iter().map(|f| f.field_type.as_str()).collect();
        assert_eq!(types, vec!["email", "text", "textarea", "select", "file"]);

        let email = &form.fields[0];
        assert_eq!(email.label.as_deref(), Some("Email address"));
        assert_eq!(email.placeholder, "you@example.com");
        assert!(email.required);
        assert!(!form.fields[1].required);
        assert!(form.fields[1].label.is_none());

        let plan = &form.fields[3];
        assert_eq!(plan.tag, "select");
        assert_eq!(plan.options.len(), 2);
        assert_eq!(plan.options[0].text, "Free");
        assert_eq!(plan.options[0].value, "free");
        assert_eq!(plan.options[1].value, "");

        let buttons: Vec<(&str, &str)> = form
            .buttons
            .iter()
            .map(|b| (b.button_type.as_str(), b.text.as_str()))
            .collect();
        assert_eq!(
            buttons,
            vec![("submit", ""), ("submit", "Sign up"), ("reset", "Clear")]
        );
        assert_eq!(form.buttons[0].value, "Join");

        // buttons still count towards input_count, only fillable controls land in fields
        assert_eq!(form.input_count, 4);
        assert_eq!(form.fields.len(), 5);
    }

    #[test]
    fn test_plain_form_defaults() {
        let form = &run(r#"<form id="q"><input name="q"></form>"#).forms[0];
        assert_eq!(form.enctype, "application/x-www-form-urlencoded");
        assert!(!form.has_file_upload);
        assert!(!form.has_required_fields);
        assert!(form.buttons.is_empty());
        assert_eq!(form.fields[0].field_type, "text");
    }

    #[test]
    fn test_no_forms() {
        let extraction = run("<html><body><p>nothing here</p></body></html>");
        assert!(extraction.forms.is_empty());
        assert!(extraction.domains.is_empty());
    }
}
