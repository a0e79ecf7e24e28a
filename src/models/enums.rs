use crate::error::FormError;
use serde::{Deserialize, Serialize};

/// Macro to generate a choice enum with as_str + label + std::str::FromStr pattern.
/// The string literal is the option value rendered into the `<select>`.
macro_rules! choice_enum {
    ($name:ident, $field:literal { $($variant:ident => $s:literal, $label:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
        pub enum $name {
            $(#[serde(rename = $s)] $variant),+
        }

        impl $name {
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $s),+
                }
            }

            /// Human-readable label shown next to the option.
            pub fn label(&self) -> &'static str {
                match self {
                    $(Self::$variant => $label),+
                }
            }

            /// All option literals, in display order.
            pub fn values() -> Vec<String> {
                Self::ALL.iter().map(|c| c.as_str().to_string()).collect()
            }
        }

        impl std::str::FromStr for $name {
            type Err = FormError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($s => Ok(Self::$variant)),+,
                    _ => Err(FormError::InvalidOption {
                        field: $field.into(),
                        value: s.into(),
                    }),
                }
            }
        }
    };
}

choice_enum!(ContactType, "contact_type" {
    Direct => "direct", "Direct contact with participant",
    Indirect => "indirect", "Contact with person other than participant",
    NoContact => "no_contact", "No contact made",
});

choice_enum!(YesNo, "yes_no" {
    Yes => "Yes", "Yes",
    No => "No", "No",
});

choice_enum!(ApptLocation, "appt_location" {
    Home => "home", "At home",
    Work => "work", "At work",
    Clinic => "clinic", "At clinic",
    Other => "OTHER", "Other location",
});

choice_enum!(ApptGrading, "appt_grading" {
    Firm => "firm", "Firm appointment",
    Weak => "weak", "Possible appointment",
    Guess => "guess", "Estimated by RA",
});

/// Option literal that reveals an "other, please specify" free-text field.
pub const OTHER: &str = "OTHER";
