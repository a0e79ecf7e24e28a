//! Reference rule table for the call-log entry form.
//!
//! Every revealed field is required. `may_call` defaults to "Yes" whenever
//! contact was made.

use crate::models::enums::{ContactType, YesNo, OTHER};

use super::types::{ActionSet, DriverRules};

pub fn call_log_entry_rules() -> Vec<DriverRules> {
    let may_call_default = YesNo::Yes.as_str();

    vec![
        DriverRules::new("contact_type")
            .when(
                ContactType::Direct.as_str(),
                ActionSet::new()
                    .show_required(&["appt", "may_call"])
                    .preset("may_call", may_call_default)
                    .clear(&["time_of_week", "time_of_day"]),
            )
            .when(
                ContactType::Indirect.as_str(),
                ActionSet::new()
                    .show_required(&["time_of_week", "time_of_day", "may_call"])
                    .preset("may_call", may_call_default)
                    .clear(&["appt"]),
            )
            .otherwise(ActionSet::new().clear(&[
                "appt",
                "time_of_week",
                "time_of_day",
                "may_call",
            ])),
        DriverRules::new("appt")
            .when(
                YesNo::Yes.as_str(),
                ActionSet::new()
                    .show_required(&["appt_date", "appt_grading", "appt_location"])
                    .clear(&["appt_reason_unwilling"]),
            )
            .when(
                YesNo::No.as_str(),
                ActionSet::new()
                    .show_required(&["appt_reason_unwilling"])
                    .clear(&["appt_date", "appt_grading", "appt_location"]),
            )
            .otherwise(ActionSet::new().clear(&[
                "appt_date",
                "appt_grading",
                "appt_location",
                "appt_reason_unwilling",
            ])),
        DriverRules::new("appt_location")
            .when(OTHER, ActionSet::new().show_required(&["appt_location_other"]))
            .otherwise(ActionSet::new().clear(&["appt_location_other"])),
        DriverRules::new("appt_reason_unwilling")
            .when(
                OTHER,
                ActionSet::new().show_required(&["appt_reason_unwilling_other"]),
            )
            .otherwise(ActionSet::new().clear(&["appt_reason_unwilling_other"])),
    ]
}
