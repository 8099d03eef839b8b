//! Volleyball player profiles.
//!
//! The form-side collaborator of the layout engine: it holds what a player
//! submits, validates required fields, and turns the result into the fixed
//! row list the profile sheet prints.

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use chrono::NaiveDate;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::model::{DocumentSpec, FieldEntry};

/// Title used when the caller does not supply one.
pub const DEFAULT_TITLE: &str = "Volleyball Player Profile";

/// Row labels in print order.
pub const FIELD_LABELS: [&str; 12] = [
    "Full Name",
    "Selected Position",
    "Height (cm)",
    "Weight (kg)",
    "Date of Birth",
    "Email",
    "Address",
    "Mobile No",
    "WhatsApp No",
    "Workplace",
    "Workplace Address",
    "International Tournaments (last 5 years)",
];

/// Playing position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Position {
    /// Outside/opposite hitter
    #[serde(rename = "High Attacker", alias = "high-attacker", alias = "high_attacker")]
    HighAttacker,
    /// Middle blocker
    #[serde(rename = "Quick Attacker", alias = "quick-attacker", alias = "quick_attacker")]
    QuickAttacker,
    #[serde(rename = "Setter", alias = "setter")]
    Setter,
    #[serde(rename = "Libero", alias = "libero")]
    Libero,
}

impl Position {
    /// Every selectable position, in form order.
    pub const ALL: [Position; 4] = [
        Position::HighAttacker,
        Position::QuickAttacker,
        Position::Setter,
        Position::Libero,
    ];

    /// Display name as printed on the sheet.
    pub fn as_str(self) -> &'static str {
        match self {
            Position::HighAttacker => "High Attacker",
            Position::QuickAttacker => "Quick Attacker",
            Position::Setter => "Setter",
            Position::Libero => "Libero",
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Position {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let key: String = s
            .trim()
            .chars()
            .filter(|c| !matches!(*c, ' ' | '-' | '_'))
            .flat_map(char::to_lowercase)
            .collect();
        Position::ALL
            .into_iter()
            .find(|p| p.as_str().replace(' ', "").to_lowercase() == key)
            .ok_or_else(|| {
                Error::validation(
                    "position",
                    format!(
                        "unknown position {:?} (expected one of: High Attacker, Quick Attacker, Setter, Libero)",
                        s
                    ),
                )
            })
    }
}

/// What a player submits on the profile form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerProfile {
    pub name: String,
    pub position: Position,
    /// Height in centimeters, as entered
    pub height_cm: String,
    /// Weight in kilograms, as entered
    pub weight_kg: String,
    pub date_of_birth: NaiveDate,
    pub email: String,
    /// Personal address (optional)
    #[serde(default)]
    pub address: String,
    pub mobile: String,
    pub whatsapp: String,
    /// Workplace, or "N/A"
    pub workplace: String,
    pub work_address: String,
    /// International tournaments of the last five years, or "N/A"
    pub tournaments: String,
}

fn email_pattern() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| {
        Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email pattern is valid")
    })
}

impl PlayerProfile {
    /// Parse a profile from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Check required fields and the email format.
    pub fn validate(&self) -> Result<()> {
        let required = [
            ("name", &self.name),
            ("height_cm", &self.height_cm),
            ("weight_kg", &self.weight_kg),
            ("email", &self.email),
            ("mobile", &self.mobile),
            ("whatsapp", &self.whatsapp),
            ("workplace", &self.workplace),
            ("work_address", &self.work_address),
            ("tournaments", &self.tournaments),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(Error::validation(field, "is required"));
            }
        }

        if !email_pattern().is_match(self.email.trim()) {
            return Err(Error::validation(
                "email",
                format!("{:?} is not an email address", self.email),
            ));
        }

        Ok(())
    }

    /// The printed rows, in sheet order.
    pub fn fields(&self) -> Result<Vec<FieldEntry>> {
        let values = [
            self.name.clone(),
            self.position.to_string(),
            self.height_cm.clone(),
            self.weight_kg.clone(),
            self.date_of_birth.format("%Y-%m-%d").to_string(),
            self.email.clone(),
            self.address.clone(),
            self.mobile.clone(),
            self.whatsapp.clone(),
            self.workplace.clone(),
            self.work_address.clone(),
            self.tournaments.clone(),
        ];
        FIELD_LABELS
            .iter()
            .zip(values)
            .map(|(label, value)| FieldEntry::new(*label, value))
            .collect()
    }

    /// Validate and build the render input.
    ///
    /// A blank `title` falls back to [`DEFAULT_TITLE`].
    pub fn to_document_spec(&self, title: &str, photo: Option<Vec<u8>>) -> Result<DocumentSpec> {
        self.validate()?;
        let title = if title.trim().is_empty() {
            DEFAULT_TITLE
        } else {
            title
        };
        let mut spec = DocumentSpec::new(title).with_fields(self.fields()?);
        spec.image = photo;
        Ok(spec)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> PlayerProfile {
        PlayerProfile {
            name: "H.N. Anupama Perera".to_string(),
            position: Position::Setter,
            height_cm: "172".to_string(),
            weight_kg: "61".to_string(),
            date_of_birth: NaiveDate::from_ymd_opt(1999, 4, 12).unwrap(),
            email: "anupama@example.com".to_string(),
            address: String::new(),
            mobile: "0771234567".to_string(),
            whatsapp: "0771234567".to_string(),
            workplace: "N/A".to_string(),
            work_address: "N/A".to_string(),
            tournaments: "N/A".to_string(),
        }
    }

    #[test]
    fn test_position_parse_and_display() {
        assert_eq!("Setter".parse::<Position>().unwrap(), Position::Setter);
        assert_eq!(
            "high attacker".parse::<Position>().unwrap(),
            Position::HighAttacker
        );
        assert_eq!(
            "quick-attacker".parse::<Position>().unwrap(),
            Position::QuickAttacker
        );
        assert_eq!("LIBERO".parse::<Position>().unwrap(), Position::Libero);
        assert!("Coach".parse::<Position>().is_err());
        assert_eq!(Position::QuickAttacker.to_string(), "Quick Attacker");
    }

    #[test]
    fn test_fields_in_sheet_order() {
        let fields = sample().fields().unwrap();
        assert_eq!(fields.len(), 12);
        let labels: Vec<_> = fields.iter().map(|f| f.label()).collect();
        assert_eq!(labels, FIELD_LABELS.to_vec());
        assert_eq!(fields[1].value(), "Setter");
        assert_eq!(fields[4].value(), "1999-04-12");
        assert!(fields[6].is_blank());

        // every row is printed even when its value is blank
        let mut profile = sample();
        profile.tournaments = String::new();
        let fields = profile.fields().unwrap();
        assert_eq!(fields.len(), FIELD_LABELS.len());
        assert!(fields[11].is_blank());
    }

    #[test]
    fn test_missing_required_field() {
        let mut profile = sample();
        profile.mobile = "  ".to_string();
        match profile.validate() {
            Err(Error::Validation { field, .. }) => assert_eq!(field, "mobile"),
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_address_is_optional() {
        assert!(sample().validate().is_ok());
    }

    #[test]
    fn test_bad_email() {
        let mut profile = sample();
        profile.email = "anupama.example.com".to_string();
        assert!(matches!(
            profile.validate(),
            Err(Error::Validation { ref field, .. }) if field == "email"
        ));
    }

    #[test]
    fn test_document_spec_default_title() {
        let spec = sample().to_document_spec("  ", None).unwrap();
        assert_eq!(spec.title, DEFAULT_TITLE);
        assert_eq!(spec.field_count(), 12);
        assert!(!spec.has_image());
    }

    #[test]
    fn test_profile_from_json() {
        let json = r#"{
            "name": "H.N. Anupama Perera",
            "position": "Quick Attacker",
            "height_cm": "175",
            "weight_kg": "63",
            "date_of_birth": "2000-01-31",
            "email": "a@b.lk",
            "mobile": "1",
            "whatsapp": "2",
            "workplace": "N/A",
            "work_address": "N/A",
            "tournaments": "N/A"
        }"#;
        let profile = PlayerProfile::from_json(json).unwrap();
        assert_eq!(profile.position, Position::QuickAttacker);
        assert_eq!(profile.address, "");
        assert!(profile.validate().is_ok());
    }
}
