//! Bilingual option dictionaries.
//!
//! Every enumerated column (case type, hearing status, ...) is stored as a
//! short snake_case value. The dictionaries below are the single source of
//! truth for the allowed values and their English / Arabic labels, and are
//! served verbatim by `GET /api/v1/options`.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::locale::Lang;

/// One allowed value with its labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OptionItem {
    pub value: &'static str,
    pub label_en: &'static str,
    pub label_ar: &'static str,
}

/// An option rendered for a single language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LocalizedOption {
    pub value: &'static str,
    pub label: &'static str,
}

const fn item(value: &'static str, label_en: &'static str, label_ar: &'static str) -> OptionItem {
    OptionItem {
        value,
        label_en,
        label_ar,
    }
}

/// The dictionaries exposed by the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OptionKind {
    ClientTypes,
    CaseTypes,
    CaseStatuses,
    CasePriorities,
    LawyerRoles,
    Specializations,
    HearingTypes,
    HearingStatuses,
    InvoiceStatuses,
    PaymentMethods,
    DocumentTypes,
    DocumentEntityTypes,
    Languages,
}

impl OptionKind {
    pub const ALL: [OptionKind; 13] = [
        OptionKind::ClientTypes,
        OptionKind::CaseTypes,
        OptionKind::CaseStatuses,
        OptionKind::CasePriorities,
        OptionKind::LawyerRoles,
        OptionKind::Specializations,
        OptionKind::HearingTypes,
        OptionKind::HearingStatuses,
        OptionKind::InvoiceStatuses,
        OptionKind::PaymentMethods,
        OptionKind::DocumentTypes,
        OptionKind::DocumentEntityTypes,
        OptionKind::Languages,
    ];

    /// The snake_case key used in URLs and JSON.
    pub fn key(self) -> &'static str {
        match self {
            OptionKind::ClientTypes => "client_types",
            OptionKind::CaseTypes => "case_types",
            OptionKind::CaseStatuses => "case_statuses",
            OptionKind::CasePriorities => "case_priorities",
            OptionKind::LawyerRoles => "lawyer_roles",
            OptionKind::Specializations => "specializations",
            OptionKind::HearingTypes => "hearing_types",
            OptionKind::HearingStatuses => "hearing_statuses",
            OptionKind::InvoiceStatuses => "invoice_statuses",
            OptionKind::PaymentMethods => "payment_methods",
            OptionKind::DocumentTypes => "document_types",
            OptionKind::DocumentEntityTypes => "document_entity_types",
            OptionKind::Languages => "languages",
        }
    }

    pub fn from_key(key: &str) -> Option<OptionKind> {
        OptionKind::ALL.into_iter().find(|k| k.key() == key)
    }

    pub fn items(self) -> &'static [OptionItem] {
        match self {
            OptionKind::ClientTypes => CLIENT_TYPES,
            OptionKind::CaseTypes => CASE_TYPES,
            OptionKind::CaseStatuses => CASE_STATUSES,
            OptionKind::CasePriorities => CASE_PRIORITIES,
            OptionKind::LawyerRoles => LAWYER_ROLES,
            OptionKind::Specializations => SPECIALIZATIONS,
            OptionKind::HearingTypes => HEARING_TYPES,
            OptionKind::HearingStatuses => HEARING_STATUSES,
            OptionKind::InvoiceStatuses => INVOICE_STATUSES,
            OptionKind::PaymentMethods => PAYMENT_METHODS,
            OptionKind::DocumentTypes => DOCUMENT_TYPES,
            OptionKind::DocumentEntityTypes => DOCUMENT_ENTITY_TYPES,
            OptionKind::Languages => LANGUAGES,
        }
    }

    pub fn contains(self, value: &str) -> bool {
        self.items().iter().any(|i| i.value == value)
    }

    /// Label for `value` in `lang`, or `None` for an unknown value.
    pub fn label(self, value: &str, lang: Lang) -> Option<&'static str> {
        self.items()
            .iter()
            .find(|i| i.value == value)
            .map(|i| lang.pick(i.label_en, i.label_ar))
    }

    pub fn localized(self, lang: Lang) -> Vec<LocalizedOption> {
        self.items()
            .iter()
            .map(|i| LocalizedOption {
                value: i.value,
                label: lang.pick(i.label_en, i.label_ar),
            })
            .collect()
    }
}

/// Reject `value` unless it belongs to the `kind` dictionary.
///
/// `field` names the offending input field in the error message.
pub fn ensure_valid(kind: OptionKind, field: &str, value: &str) -> Result<(), CoreError> {
    if kind.contains(value) {
        return Ok(());
    }
    let allowed: Vec<&str> = kind.items().iter().map(|i| i.value).collect();
    Err(CoreError::Validation(format!(
        "Invalid {field} '{value}'. Allowed values: {}",
        allowed.join(", ")
    )))
}

/// Like [`ensure_valid`] for optional (update) fields.
pub fn ensure_valid_opt(
    kind: OptionKind,
    field: &str,
    value: Option<&str>,
) -> Result<(), CoreError> {
    match value {
        Some(v) => ensure_valid(kind, field, v),
        None => Ok(()),
    }
}

// ---------------------------------------------------------------------------
// Dictionaries
// ---------------------------------------------------------------------------

pub const CLIENT_TYPES: &[OptionItem] = &[
    item("individual", "Individual", "فرد"),
    item("company", "Company", "شركة"),
    item("government", "Government entity", "جهة حكومية"),
];

pub const CASE_TYPES: &[OptionItem] = &[
    item("civil", "Civil", "مدني"),
    item("criminal", "Criminal", "جنائي"),
    item("commercial", "Commercial", "تجاري"),
    item("labor", "Labor", "عمالي"),
    item("family", "Personal status", "أحوال شخصية"),
    item("administrative", "Administrative", "إداري"),
    item("real_estate", "Real estate", "عقاري"),
];

pub const CASE_STATUSES: &[OptionItem] = &[
    item("open", "Open", "مفتوحة"),
    item("in_progress", "In progress", "قيد النظر"),
    item("on_hold", "On hold", "معلقة"),
    item("closed", "Closed", "مغلقة"),
    item("archived", "Archived", "مؤرشفة"),
];

pub const CASE_PRIORITIES: &[OptionItem] = &[
    item("low", "Low", "منخفضة"),
    item("medium", "Medium", "متوسطة"),
    item("high", "High", "عالية"),
    item("urgent", "Urgent", "عاجلة"),
];

pub const LAWYER_ROLES: &[OptionItem] = &[
    item("lead", "Lead counsel", "المحامي الرئيسي"),
    item("associate", "Associate", "محامٍ مساعد"),
    item("consultant", "Consultant", "مستشار"),
];

pub const SPECIALIZATIONS: &[OptionItem] = &[
    item("general", "General practice", "ممارسة عامة"),
    item("civil", "Civil law", "القانون المدني"),
    item("criminal", "Criminal law", "القانون الجنائي"),
    item("commercial", "Commercial law", "القانون التجاري"),
    item("labor", "Labor law", "قانون العمل"),
    item("family", "Family law", "الأحوال الشخصية"),
    item("administrative", "Administrative law", "القانون الإداري"),
    item("real_estate", "Real estate law", "القانون العقاري"),
];

pub const HEARING_TYPES: &[OptionItem] = &[
    item("first_session", "First session", "جلسة أولى"),
    item("pleading", "Pleading", "مرافعة"),
    item("evidence", "Evidence", "بينات"),
    item("expert", "Expert review", "خبرة"),
    item("judgment", "Judgment", "النطق بالحكم"),
    item("appeal", "Appeal", "استئناف"),
];

pub const HEARING_STATUSES: &[OptionItem] = &[
    item("scheduled", "Scheduled", "مجدولة"),
    item("postponed", "Postponed", "مؤجلة"),
    item("completed", "Completed", "منعقدة"),
    item("cancelled", "Cancelled", "ملغاة"),
];

pub const INVOICE_STATUSES: &[OptionItem] = &[
    item("draft", "Draft", "مسودة"),
    item("sent", "Sent", "مرسلة"),
    item("partially_paid", "Partially paid", "مدفوعة جزئياً"),
    item("paid", "Paid", "مدفوعة"),
    item("overdue", "Overdue", "متأخرة"),
    item("cancelled", "Cancelled", "ملغاة"),
];

pub const PAYMENT_METHODS: &[OptionItem] = &[
    item("cash", "Cash", "نقداً"),
    item("bank_transfer", "Bank transfer", "تحويل بنكي"),
    item("cheque", "Cheque", "شيك"),
    item("card", "Card", "بطاقة"),
];

pub const DOCUMENT_TYPES: &[OptionItem] = &[
    item("contract", "Contract", "عقد"),
    item("power_of_attorney", "Power of attorney", "وكالة"),
    item("court_filing", "Court filing", "مذكرة"),
    item("judgment", "Judgment", "حكم"),
    item("evidence", "Evidence", "دليل"),
    item("correspondence", "Correspondence", "مراسلات"),
    item("identity", "Identity document", "إثبات هوية"),
    item("other", "Other", "أخرى"),
];

pub const DOCUMENT_ENTITY_TYPES: &[OptionItem] = &[
    item("client", "Client", "عميل"),
    item("case", "Case", "قضية"),
    item("hearing", "Hearing", "جلسة"),
    item("invoice", "Invoice", "فاتورة"),
    item("lawyer", "Lawyer", "محامٍ"),
];

pub const LANGUAGES: &[OptionItem] = &[
    item("en", "English", "الإنجليزية"),
    item("ar", "Arabic", "العربية"),
];

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn every_dictionary_is_well_formed() {
        for kind in OptionKind::ALL {
            let items = kind.items();
            assert!(!items.is_empty(), "{} must not be empty", kind.key());

            let values: HashSet<_> = items.iter().map(|i| i.value).collect();
            assert_eq!(values.len(), items.len(), "{} has duplicates", kind.key());

            for i in items {
                assert!(!i.label_en.is_empty(), "{}:{} lacks English", kind.key(), i.value);
                assert!(!i.label_ar.is_empty(), "{}:{} lacks Arabic", kind.key(), i.value);
                assert!(
                    i.value
                        .chars()
                        .all(|c| c.is_ascii_lowercase() || c == '_'),
                    "{} is not snake_case",
                    i.value
                );
            }
        }
    }

    #[test]
    fn keys_round_trip() {
        for kind in OptionKind::ALL {
            assert_eq!(OptionKind::from_key(kind.key()), Some(kind));
        }
        assert_eq!(OptionKind::from_key("colours"), None);
    }

    #[test]
    fn labels_follow_language() {
        assert_eq!(
            OptionKind::CaseTypes.label("labor", Lang::En),
            Some("Labor")
        );
        assert_eq!(
            OptionKind::CaseTypes.label("labor", Lang::Ar),
            Some("عمالي")
        );
        assert_eq!(OptionKind::CaseTypes.label("maritime", Lang::En), None);

        let localized = OptionKind::Languages.localized(Lang::Ar);
        assert_eq!(localized[1].value, "ar");
        assert_eq!(localized[1].label, "العربية");
    }

    #[test]
    fn ensure_valid_lists_allowed_values() {
        assert!(ensure_valid(OptionKind::CasePriorities, "priority", "urgent").is_ok());
        let err = ensure_valid(OptionKind::CasePriorities, "priority", "asap").unwrap_err();
        assert_matches!(err, CoreError::Validation(msg) if msg.contains("low, medium, high, urgent"));
        assert!(ensure_valid_opt(OptionKind::CasePriorities, "priority", None).is_ok());
    }

    #[test]
    fn kind_serializes_as_key() {
        let json = serde_json::to_string(&OptionKind::DocumentEntityTypes).unwrap();
        assert_eq!(json, "\"document_entity_types\"");
    }
}
