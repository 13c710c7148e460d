use serde::Serialize;

use crate::letter::Letter;

/// The url-encoded body the remote reply generator expects.
///
/// `region`, `treat`, `ATT` and `PageCheckqElf` are no longer used by the remote
/// service but must still be present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LetterForm {
    pub lang: &'static str,
    pub firstname: String,
    pub email: String,
    pub gender: &'static str,
    pub age: String,
    pub city: String,
    pub region: &'static str,
    pub country: String,
    pub good: &'static str,
    pub present1: String,
    pub present2: String,
    pub present3: String,
    pub comment: String,
    pub consent: &'static str,
    pub stamp: String,
    pub treat: &'static str,
    #[serde(rename = "ATT")]
    pub att: &'static str,
    #[serde(rename = "PageCheckqElf")]
    pub page_check: &'static str,
}

impl From<&Letter> for LetterForm {
    fn from(letter: &Letter) -> Self {
        let [present1, present2, present3] = letter.presents().clone();
        Self {
            lang: "EN",
            firstname: letter.first_name().into(),
            email: letter.contact_email().as_str().to_owned(),
            gender: letter.gender().as_form_value(),
            age: letter.age().get().to_string(),
            city: letter.city().into(),
            region: " ",
            country: letter.country().into(),
            good: letter.goodness().as_form_value(),
            present1,
            present2,
            present3,
            comment: letter.comment().into(),
            consent: if letter.consent() { "Yes" } else { "No" },
            stamp: letter.stamp_choice().into_inner().to_string(),
            treat: " ",
            att: "",
            page_check: "1",
        }
    }
}
