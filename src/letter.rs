use nutype::nutype;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};

use crate::error::LetterError;

pub static CONTACT_EMAIL_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^@]+@[^@]+\.[^@]+").unwrap());

/// The sender's gender as understood by the remote form, which only knows two.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Gender {
    Boy,
    Girl,
}

impl Gender {
    /// `2` is a girl, every other code is coerced to a boy.
    pub fn from_code(code: i64) -> Self {
        match code {
            2 => Self::Girl,
            _ => Self::Boy,
        }
    }

    pub fn as_form_value(self) -> &'static str {
        match self {
            Self::Boy => "boy",
            Self::Girl => "girl",
        }
    }
}

/// Age in whole years. Fractional input is truncated, never rounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Age(u32);

impl Age {
    pub fn get(self) -> u32 {
        self.0
    }
}

impl From<u32> for Age {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

impl TryFrom<f64> for Age {
    type Error = LetterError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        if value < 0.0 {
            return Err(LetterError::NegativeAge(value));
        }
        let years = value.trunc();
        if !years.is_finite() || years > f64::from(u32::MAX) {
            return Err(LetterError::AgeOutOfRange {
                value,
                max: u32::MAX,
            });
        }
        Ok(Self(years as u32))
    }
}

/// How good the sender has been this year.
///
/// - `0`: my halo has been to the repair shop a few times
/// - `1`: I should still be on the nice list
/// - `2`: my halo is just a little bit crooked
/// - `3`: I should be the angel at the top of the tree
#[nutype(
    validate(greater_or_equal = 0, less_or_equal = 3),
    derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, TryFrom)
)]
pub struct Goodness(i64);

impl Goodness {
    pub fn as_form_value(&self) -> &'static str {
        match self.into_inner() {
            3 => "REALLY REALLY good",
            2 => "really good",
            1 => "good",
            _ => "sorta good",
        }
    }
}

/// The decorative stamp printed on the reply page. It never shows up in the
/// extracted text.
#[nutype(
    validate(greater_or_equal = 1, less_or_equal = 4),
    derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, TryFrom, Default),
    default = 1
)]
pub struct StampChoice(i64);

/// Address the remote staff may use to reach the sender. Empty means none given.
#[nutype(
    validate(predicate = |email| email.is_empty() || CONTACT_EMAIL_REGEX.is_match(email)),
    derive(Debug, Clone, PartialEq, Eq, Hash, Deref, AsRef, Default),
    default = ""
)]
pub struct ContactEmail(String);

/// Unvalidated letter fields, as typed by the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct NewLetter {
    pub first_name: String,
    pub gender: i64,
    pub age: f64,
    pub city: String,
    pub country: String,
    pub goodness: i64,
    pub presents: [String; 3],
    pub comment: String,
    pub consent: bool,
    pub contact_email: String,
    pub stamp_choice: i64,
}

impl NewLetter {
    pub fn new(
        first_name: impl Into<String>,
        gender: i64,
        age: f64,
        city: impl Into<String>,
        country: impl Into<String>,
        goodness: i64,
        presents: [&str; 3],
    ) -> Self {
        Self {
            first_name: first_name.into(),
            gender,
            age,
            city: city.into(),
            country: country.into(),
            goodness,
            presents: presents.map(str::to_owned),
            comment: String::new(),
            consent: false,
            contact_email: String::new(),
            stamp_choice: 1,
        }
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = comment.into();
        self
    }

    /// Whether the comment may be published on the remote service's public page.
    pub fn with_consent(mut self, consent: bool) -> Self {
        self.consent = consent;
        self
    }

    pub fn with_contact_email(mut self, contact_email: impl Into<String>) -> Self {
        self.contact_email = contact_email.into();
        self
    }

    pub fn with_stamp_choice(mut self, stamp_choice: i64) -> Self {
        self.stamp_choice = stamp_choice;
        self
    }

    pub fn validate(self) -> Result<Letter, LetterError> {
        let age = Age::try_from(self.age)?;
        let goodness = Goodness::try_new(self.goodness)
            .map_err(|_| LetterError::GoodnessOutOfRange(self.goodness))?;
        let stamp_choice = StampChoice::try_new(self.stamp_choice)
            .map_err(|_| LetterError::StampOutOfRange(self.stamp_choice))?;
        let contact_email = ContactEmail::try_new(self.contact_email.clone())
            .map_err(|_| LetterError::InvalidContactEmail(self.contact_email))?;

        Ok(Letter {
            first_name: self.first_name,
            gender: self.gender,
            age,
            city: self.city,
            country: self.country,
            goodness,
            presents: self.presents,
            comment: self.comment,
            consent: self.consent,
            contact_email,
            stamp_choice,
        })
    }
}

/// A letter that has passed validation and is ready to be sent.
#[derive(Debug, Clone, PartialEq)]
pub struct Letter {
    first_name: String,
    gender: i64,
    age: Age,
    city: String,
    country: String,
    goodness: Goodness,
    presents: [String; 3],
    comment: String,
    consent: bool,
    contact_email: ContactEmail,
    stamp_choice: StampChoice,
}

impl TryFrom<NewLetter> for Letter {
    type Error = LetterError;

    fn try_from(value: NewLetter) -> Result<Self, Self::Error> {
        value.validate()
    }
}

impl Letter {
    /// Builds a letter from loosely typed JSON, e.g. a letter file.
    ///
    /// Keys use the camelCase names `firstName`, `gender`, `age`, `city`,
    /// `country`, `goodness`, `present1`..`present3`, and optionally `comment`,
    /// `consent`, `contactEmail` and `stampChoice`. A value of the wrong kind is
    /// reported before any range check runs.
    pub fn from_json(value: &Value) -> Result<Self, LetterError> {
        let object = value.as_object().ok_or(LetterError::InvalidType {
            field: "letter",
            expected: "an object",
        })?;

        let mut letter = NewLetter {
            first_name: string(object, "firstName")?,
            gender: integer(object, "gender")?,
            age: number(object, "age")?,
            city: string(object, "city")?,
            country: string(object, "country")?,
            goodness: integer(object, "goodness")?,
            presents: [
                string(object, "present1")?,
                string(object, "present2")?,
                string(object, "present3")?,
            ],
            comment: String::new(),
            consent: false,
            contact_email: String::new(),
            stamp_choice: 1,
        };
        if object.contains_key("comment") {
            letter.comment = string(object, "comment")?;
        }
        if object.contains_key("consent") {
            letter.consent = boolean(object, "consent")?;
        }
        if object.contains_key("contactEmail") {
            letter.contact_email = string(object, "contactEmail")?;
        }
        if object.contains_key("stampChoice") {
            letter.stamp_choice = integer(object, "stampChoice")?;
        }

        letter.validate()
    }

    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    /// The gender code exactly as given.
    pub fn gender_code(&self) -> i64 {
        self.gender
    }

    pub fn gender(&self) -> Gender {
        Gender::from_code(self.gender)
    }

    pub fn age(&self) -> Age {
        self.age
    }

    pub fn city(&self) -> &str {
        &self.city
    }

    pub fn country(&self) -> &str {
        &self.country
    }

    pub fn goodness(&self) -> Goodness {
        self.goodness
    }

    pub fn presents(&self) -> &[String; 3] {
        &self.presents
    }

    pub fn comment(&self) -> &str {
        &self.comment
    }

    pub fn consent(&self) -> bool {
        self.consent
    }

    pub fn contact_email(&self) -> &ContactEmail {
        &self.contact_email
    }

    pub fn stamp_choice(&self) -> StampChoice {
        self.stamp_choice
    }
}

fn field<'a>(object: &'a Map<String, Value>, field: &'static str) -> Result<&'a Value, LetterError> {
    object.get(field).ok_or(LetterError::MissingField { field })
}

fn string(object: &Map<String, Value>, name: &'static str) -> Result<String, LetterError> {
    field(object, name)?
        .as_str()
        .map(str::to_owned)
        .ok_or(LetterError::InvalidType {
            field: name,
            expected: "a string",
        })
}

fn integer(object: &Map<String, Value>, name: &'static str) -> Result<i64, LetterError> {
    field(object, name)?.as_i64().ok_or(LetterError::InvalidType {
        field: name,
        expected: "an integer",
    })
}

fn number(object: &Map<String, Value>, name: &'static str) -> Result<f64, LetterError> {
    field(object, name)?.as_f64().ok_or(LetterError::InvalidType {
        field: name,
        expected: "a number",
    })
}

fn boolean(object: &Map<String, Value>, name: &'static str) -> Result<bool, LetterError> {
    field(object, name)?.as_bool().ok_or(LetterError::InvalidType {
        field: name,
        expected: "a boolean",
    })
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;
    use crate::error::LetterErrorKind;

    fn alex() -> NewLetter {
        NewLetter::new(
            "Alex",
            2,
            9.0,
            "Springfield",
            "USA",
            3,
            ["bike", "lego", "book"],
        )
    }

    fn alex_json() -> Value {
        json!({
            "firstName": "Alex",
            "gender": 2,
            "age": 9.0,
            "city": "Springfield",
            "country": "USA",
            "goodness": 3,
            "present1": "bike",
            "present2": "lego",
            "present3": "book",
        })
    }

    #[test]
    fn defaults() {
        let letter = alex().validate().unwrap();
        assert_eq!(letter.comment(), "");
        assert!(!letter.consent());
        assert_eq!(letter.contact_email().as_str(), "");
        assert_eq!(letter.stamp_choice().into_inner(), 1);
    }

    #[test]
    fn gender_coercion() {
        for code in [i64::MIN, -1, 0, 1, 3, 42, i64::MAX] {
            assert_eq!(Gender::from_code(code), Gender::Boy, "code {code}");
            assert_eq!(Gender::from_code(code).as_form_value(), "boy");
        }
        assert_eq!(Gender::from_code(2).as_form_value(), "girl");

        let letter = NewLetter { gender: 7, ..alex() }.validate().unwrap();
        assert_eq!(letter.gender_code(), 7);
        assert_eq!(letter.gender(), Gender::Boy);
    }

    #[test]
    fn goodness() {
        for (input, expected) in [
            (0, Some("sorta good")),
            (1, Some("good")),
            (2, Some("really good")),
            (3, Some("REALLY REALLY good")),
            (-1, None),
            (4, None),
            (i64::MAX, None),
        ] {
            let result = NewLetter { goodness: input, ..alex() }.validate();
            match expected {
                Some(phrase) => assert_eq!(result.unwrap().goodness().as_form_value(), phrase),
                None => assert_eq!(result.unwrap_err(), LetterError::GoodnessOutOfRange(input)),
            }
        }
    }

    #[test]
    fn age_truncates() {
        for (input, expected) in [(9.7, 9), (9.0, 9), (0.0, 0), (0.99, 0), (120.5, 120)] {
            let letter = NewLetter { age: input, ..alex() }.validate().unwrap();
            assert_eq!(letter.age().get(), expected);
        }
    }

    #[test]
    fn age_out_of_domain() {
        for input in [-1.0, -0.5, f64::NEG_INFINITY] {
            let err = NewLetter { age: input, ..alex() }.validate().unwrap_err();
            assert_eq!(err, LetterError::NegativeAge(input));
            assert_eq!(err.kind(), LetterErrorKind::Value);
        }
        for input in [f64::INFINITY, 1e12] {
            let err = NewLetter { age: input, ..alex() }.validate().unwrap_err();
            assert!(matches!(err, LetterError::AgeOutOfRange { .. }));
        }
        let err = NewLetter { age: f64::NAN, ..alex() }.validate().unwrap_err();
        assert_eq!(err.kind(), LetterErrorKind::Value);
    }

    #[test]
    fn stamp_choice() {
        for input in 1..=4 {
            let letter = alex().with_stamp_choice(input).validate().unwrap();
            assert_eq!(letter.stamp_choice().into_inner(), input);
        }
        for input in [0, 5, -3] {
            let err = alex().with_stamp_choice(input).validate().unwrap_err();
            assert_eq!(err, LetterError::StampOutOfRange(input));
            assert_eq!(err.kind(), LetterErrorKind::Value);
        }
    }

    #[test]
    fn contact_email() {
        for (input, valid) in [
            ("", true),
            ("a@b.co", true),
            ("santa@north.pole.example", true),
            ("not-an-email", false),
            ("@b.co", false),
            ("a@b", false),
            ("a@@b.co", false),
        ] {
            let result = alex().with_contact_email(input).validate();
            if valid {
                assert_eq!(result.unwrap().contact_email().as_str(), input);
            } else {
                assert_eq!(
                    result.unwrap_err(),
                    LetterError::InvalidContactEmail(input.into())
                );
            }
        }
    }

    #[test]
    fn optional_fields() {
        let letter = alex()
            .with_comment("I fed the reindeer")
            .with_consent(true)
            .with_contact_email("alex@example.com")
            .with_stamp_choice(3)
            .validate()
            .unwrap();
        assert_eq!(letter.comment(), "I fed the reindeer");
        assert!(letter.consent());
        assert_eq!(letter.contact_email().as_str(), "alex@example.com");
        assert_eq!(letter.stamp_choice().into_inner(), 3);
    }

    #[test]
    fn from_json() {
        let letter = Letter::from_json(&alex_json()).unwrap();
        assert_eq!(letter, alex().validate().unwrap());
        assert_eq!(letter.gender(), Gender::Girl);
        assert_eq!(letter.presents(), &["bike", "lego", "book"].map(String::from));
    }

    #[test]
    fn from_json_optional_fields() {
        let mut value = alex_json();
        value["comment"] = json!("hi");
        value["consent"] = json!(true);
        value["contactEmail"] = json!("a@b.co");
        value["stampChoice"] = json!(4);
        value["age"] = json!(9.7);

        let letter = Letter::from_json(&value).unwrap();
        assert_eq!(letter.comment(), "hi");
        assert!(letter.consent());
        assert_eq!(letter.contact_email().as_str(), "a@b.co");
        assert_eq!(letter.stamp_choice().into_inner(), 4);
        assert_eq!(letter.age().get(), 9);
    }

    #[test]
    fn from_json_type_errors() {
        for (key, value, expected) in [
            ("firstName", json!(5), "a string"),
            ("city", json!(["Springfield"]), "a string"),
            ("country", json!(null), "a string"),
            ("gender", json!("girl"), "an integer"),
            ("goodness", json!(2.5), "an integer"),
            ("age", json!("nine"), "a number"),
            ("consent", json!("yes"), "a boolean"),
            ("stampChoice", json!(true), "an integer"),
        ] {
            let mut letter = alex_json();
            letter[key] = value;
            let err = Letter::from_json(&letter).unwrap_err();
            assert_eq!(
                err,
                LetterError::InvalidType {
                    field: key,
                    expected
                }
            );
            assert_eq!(err.kind(), LetterErrorKind::Type);
        }
    }

    #[test]
    fn from_json_missing_field() {
        let mut letter = alex_json();
        letter.as_object_mut().unwrap().remove("present2");
        let err = Letter::from_json(&letter).unwrap_err();
        assert_eq!(err, LetterError::MissingField { field: "present2" });
        assert_eq!(err.kind(), LetterErrorKind::Type);

        let err = Letter::from_json(&json!([1, 2, 3])).unwrap_err();
        assert_eq!(err.kind(), LetterErrorKind::Type);
    }

    #[test]
    fn from_json_value_errors() {
        for (key, value) in [
            ("age", json!(-2)),
            ("goodness", json!(4)),
            ("stampChoice", json!(0)),
            ("contactEmail", json!("not-an-email")),
        ] {
            let mut letter = alex_json();
            letter[key] = value;
            let err = Letter::from_json(&letter).unwrap_err();
            assert_eq!(err.kind(), LetterErrorKind::Value, "{key}");
        }
    }
}
