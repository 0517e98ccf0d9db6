use formscout_scanner::FormRecord;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Aggregate figures over one page's forms
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormSummary {
    pub total_forms: usize,
    pub forms_by_method: BTreeMap<String, usize>,
    pub forms_without_fields: usize,
    pub forms_with_file_upload: usize,
    pub forms_with_required_fields: usize,
    pub average_fields_per_form: f64,
}

impl FormSummary {
    pub fn from_records(forms: &[FormRecord]) -> Self {
        let mut forms_by_method = BTreeMap::new();
        for form in forms {
            *forms_by_method.entry(form.method.clone()).or_insert(0) += 1;
        }

        let total_fields: usize = forms.iter().map(|f| f.total_fields).sum();
        let average_fields_per_form = if forms.is_empty() {
            0.0
        } else {
            total_fields as f64 / forms.len() as f64
        };

        Self {
            total_forms: forms.len(),
            forms_by_method,
            forms_without_fields: forms.iter().filter(|f| f.total_fields == 0).count(),
            forms_with_file_upload: forms.iter().filter(|f| f.has_file_upload).count(),
            forms_with_required_fields: forms.iter().filter(|f| f.has_required_fields).count(),
            average_fields_per_form,
        }
    }
}
