use serde::{Deserialize, Serialize};

pub const DEFAULT_ENCTYPE: &str = "application/x-www-form-urlencoded";

/// A `<select>` choice
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionRecord {
    pub text: String,
    pub value: String,
}

/// A fillable `input`, `textarea` or `select`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldRecord {
    pub tag: String,
    #[serde(rename = "type")]
    pub field_type: String,
    pub name: String,
    pub id: String,
    pub placeholder: String,
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<OptionRecord>,
}

/// A `<button>` or a submit/reset/button `<input>`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ButtonRecord {
    #[serde(rename = "type")]
    pub button_type: String,
    pub name: String,
    pub value: String,
    pub text: String,
}

/// One deduplicated `<form>` found on a page
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormRecord {
    pub id: String,
    pub name: String,
    pub action: String,
    pub method: String,
    pub domain: String,
    pub input_count: usize,
    pub textarea_count: usize,
    pub select_count: usize,
    pub total_fields: usize,
    pub signature: String,
    pub enctype: String,
    #[serde(default)]
    pub fields: Vec<FieldRecord>,
    #[serde(default)]
    pub buttons: Vec<ButtonRecord>,
    #[serde(default)]
    pub has_file_upload: bool,
    #[serde(default)]
    pub has_required_fields: bool,
}

impl FormRecord {
    /// `page#id` anchor the dashboard uses to address this form
    pub fn link(&self, page_url: &str) -> String {
        format!("{}#{}", page_url, self.id)
    }
}

/// Everything one form extraction pass produced
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormExtraction {
    pub page_url: String,
    pub forms: Vec<FormRecord>,
    pub domains: Vec<String>,
    pub duplicates_skipped: usize,
}

impl FormExtraction {
    pub fn new(page_url: String) -> Self {
        Self {
            page_url,
            forms: Vec::new(),
            domains: Vec::new(),
            duplicates_skipped: 0,
        }
    }

    pub fn form_links(&self) -> Vec<String> {
        self.forms.iter().map(|f| f.link(&self.page_url)).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkRecord {
    pub url: String,
    pub text: String,
    pub title: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinkExtraction {
    pub page_url: String,
    pub internal_links: Vec<LinkRecord>,
    pub external_links: Vec<LinkRecord>,
}

impl LinkExtraction {
    pub fn new(page_url: String) -> Self {
        Self {
            page_url,
            internal_links: Vec::new(),
            external_links: Vec::new(),
        }
    }

    pub fn total(&self) -> usize {
        self.internal_links.len() + self.external_links.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str) -> FormRecord {
        FormRecord {
            id: id.to_string(),
            name: String::new(),
            action: "https://example.com/submit".to_string(),
            method: "POST".to_string(),
            domain: "https://example.com".to_string(),
            input_count: 2,
            textarea_count: 1,
            select_count: 0,
            total_fields: 3,
            signature: "/submit|post|||".to_string(),
            enctype: DEFAULT_ENCTYPE.to_string(),
            ..FormRecord::default()
        }
    }

    #[test]
    fn test_form_record_json_shape() {
        let value = serde_json::to_value(record("login")).unwrap();
        for key in [
            "id",
            "name",
            "action",
            "method",
            "domain",
            "input_count",
            "textarea_count",
            "select_count",
            "total_fields",
            "signature",
            "enctype",
            "fields",
            "buttons",
            "has_file_upload",
            "has_required_fields",
        ] {
            assert!(value.get(key).is_some(), "missing key {}", key);
        }
        assert_eq!(value["total_fields"], 3);
    }

    #[test]
    fn test_field_record_json_shape() {
        let field = FieldRecord {
            tag: "input".to_string(),
            field_type: "email".to_string(),
            name: "email".to_string(),
            required: true,
            ..FieldRecord::default()
        };
        let value = serde_json::to_value(&field).unwrap();
        assert_eq!(value["type"], "email");
        assert_eq!(value["required"], true);
        assert!(value.get("label").is_none());
        assert!(value.get("options").is_none());
    }

    #[test]
    fn test_form_links() {
        let mut extraction = FormExtraction::new("https://example.com/page".to_string());
        extraction.forms.push(record("login"));
        extraction.forms.push(record("form-1"));
        assert_eq!(
            extraction.form_links(),
            vec![
                "https://example.com/page#login",
                "https://example.com/page#form-1"
            ]
        );
    }
}
