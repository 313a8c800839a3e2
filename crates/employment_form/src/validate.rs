//! Section validation.
//!
//! Pass 1 checks visible required fields for presence and format, pass 2
//! checks visible optional email fields that hold a value. The first
//! failure flags and focuses the field and aborts.

use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;
use tracing::warn;

use crate::effects::Effect;
use crate::errors::{FieldIssue, ValidationFailure};
use crate::field::{Field, FieldKind, FieldRef};
use crate::state::FormState;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Presence and format of a required field.
pub fn check_required(field: &Field) -> Result<(), FieldIssue> {
    if field.is_blank() {
        return Err(match field.kind {
            FieldKind::Checkbox => FieldIssue::Unchecked,
            _ => FieldIssue::Missing,
        });
    }
    check_format(field)
}

/// Format of a non-empty value, by kind.
pub fn check_format(field: &Field) -> Result<(), FieldIssue> {
    let value = field.value.trim();
    match &field.kind {
        FieldKind::Email if !is_valid_email(value) => Err(FieldIssue::InvalidEmail),
        FieldKind::Number if value.parse::<f64>().is_err() => Err(FieldIssue::InvalidNumber),
        FieldKind::Date if NaiveDate::parse_from_str(value, DATE_FORMAT).is_err() => {
            Err(FieldIssue::InvalidDate)
        }
        FieldKind::Select { options } if !options.iter().any(|o| o == value) => {
            Err(FieldIssue::InvalidOption)
        }
        _ => Ok(()),
    }
}

/// Browser `type=email` grammar: `local@label(.label)*`.
static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$"#,
    )
    .expect("email pattern compiles")
});

pub fn is_valid_email(value: &str) -> bool {
    EMAIL.is_match(value)
}

/// Validate one section. Mutates error flags and focus, pushes the matching effects.
pub fn validate_section(
    state: &mut FormState,
    index: usize,
    effects: &mut Vec<Effect>,
) -> Result<(), ValidationFailure> {
    let refs = state.section_refs(index);

    // pass 1: visible required fields
    for at in &refs {
        let Some(field) = state.field_at(at) else {
            continue;
        };
        if !field.visible || !field.required {
            continue;
        }
        match check_required(field) {
            Ok(()) => unflag(state, at, effects),
            Err(issue) => return Err(fail(state, index, at, issue, effects)),
        }
    }

    // pass 2: optional emails holding a value
    for at in &refs {
        let Some(field) = state.field_at(at) else {
            continue;
        };
        if !field.visible || field.required || field.kind != FieldKind::Email {
            continue;
        }
        if field.is_blank() || is_valid_email(field.value.trim()) {
            unflag(state, at, effects);
        } else {
            return Err(fail(state, index, at, FieldIssue::InvalidEmail, effects));
        }
    }

    Ok(())
}

fn unflag(state: &mut FormState, at: &FieldRef, effects: &mut Vec<Effect>) {
    if let Ok(field) = state.field_at_mut(at) {
        if field.flagged {
            field.flagged = false;
            effects.push(Effect::FlagError {
                field: at.clone(),
                flagged: false,
            });
        }
    }
}

fn fail(
    state: &mut FormState,
    section: usize,
    at: &FieldRef,
    issue: FieldIssue,
    effects: &mut Vec<Effect>,
) -> ValidationFailure {
    warn!(section, field = %at, %issue, "section validation failed");
    if let Ok(field) = state.field_at_mut(at) {
        field.flagged = true;
    }
    state.set_focus(at.clone());
    effects.push(Effect::FlagError {
        field: at.clone(),
        flagged: true,
    });
    effects.push(Effect::Alert(issue.to_string()));
    effects.push(Effect::Focus(at.clone()));
    ValidationFailure {
        section,
        field: at.clone(),
        issue,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::FieldDef;
    use crate::group::GroupId;
    use crate::schema::employment_application;
    use pretty_assertions::assert_eq;

    fn field(kind: FieldKind, value: &str) -> Field {
        let mut field = Field::from_def(&FieldDef::new("f", "F", kind).required());
        field.value = value.into();
        field
    }

    #[test]
    fn email_check_matches_browser_rules() {
        for ok in ["a@b", "nur.aisyah@example.com.my", "x+tag@mail-1.example"] {
            assert!(is_valid_email(ok), "{ok}");
        }
        let long_label = format!("a@{}.com", "x".repeat(64));
        for bad in ["", "plain", "@example.com", "a@", "a@-x.com", "a b@c.com", "a@b..c", long_label.as_str()] {
            assert!(!is_valid_email(bad), "{bad}");
        }
    }

    #[test]
    fn required_checks_by_kind() {
        assert_eq!(check_required(&field(FieldKind::Text, "   ")), Err(FieldIssue::Missing));
        assert_eq!(check_required(&field(FieldKind::Checkbox, "")), Err(FieldIssue::Unchecked));
        assert_eq!(check_required(&field(FieldKind::Number, "12a")), Err(FieldIssue::InvalidNumber));
        assert_eq!(check_required(&field(FieldKind::Date, "31/12/2024")), Err(FieldIssue::InvalidDate));
        assert_eq!(check_required(&field(FieldKind::Date, "2024-12-31")), Ok(()));
        assert_eq!(
            check_required(&field(FieldKind::select(["", "A"]), "B")),
            Err(FieldIssue::InvalidOption)
        );
        assert_eq!(check_required(&field(FieldKind::select(["", "A"]), "")), Err(FieldIssue::Missing));
    }

    #[test]
    fn first_missing_required_field_is_flagged_and_focused() {
        let mut state = FormState::new(employment_application("Malaysia"));
        state.set_value(&FieldRef::form("positionApplied"), "Site Engineer").unwrap();

        let mut effects = Vec::new();
        let failure = validate_section(&mut state, 0, &mut effects).unwrap_err();
        assert_eq!(failure.field, FieldRef::form("joiningDate"));
        assert_eq!(failure.issue, FieldIssue::Missing);
        assert_eq!(state.focus(), Some(&FieldRef::form("joiningDate")));
        assert!(state.field("joiningDate").unwrap().flagged);
        assert_eq!(
            effects,
            vec![
                Effect::FlagError { field: FieldRef::form("joiningDate"), flagged: true },
                Effect::Alert("Please fill out this field.".into()),
                Effect::Focus(FieldRef::form("joiningDate")),
            ]
        );
    }

    #[test]
    fn hidden_required_candidates_are_skipped() {
        let mut state = FormState::new(employment_application("Malaysia"));
        // office use: nothing required, nothing hidden
        assert!(validate_section(&mut state, 7, &mut Vec::new()).is_ok());
        // bankOther is hidden until bank == Other
        for (name, value) in [("bank", "Maybank"), ("bankAccount", "1234")] {
            state.set_value(&FieldRef::form(name), value).unwrap();
        }
        assert!(validate_section(&mut state, 3, &mut Vec::new()).is_ok());
    }

    #[test]
    fn optional_email_in_a_block_must_be_valid() {
        let mut state = FormState::new(employment_application("Malaysia"));
        for (name, value) in [("company", "Gamuda"), ("jobTitle", "Engineer"), ("refEmail", "nope")] {
            state
                .set_value(&FieldRef::block(GroupId::Employment, 0, name), value)
                .unwrap();
        }
        let mut effects = Vec::new();
        let failure = validate_section(&mut state, 4, &mut effects).unwrap_err();
        assert_eq!(failure.issue, FieldIssue::InvalidEmail);
        assert_eq!(failure.field, FieldRef::block(GroupId::Employment, 0, "refEmail"));
        assert!(effects.contains(&Effect::Alert("Please enter a valid email address.".into())));

        state
            .set_value(&FieldRef::block(GroupId::Employment, 0, "refEmail"), "")
            .unwrap();
        let mut effects = Vec::new();
        assert!(validate_section(&mut state, 4, &mut effects).is_ok());
        assert_eq!(
            effects,
            vec![Effect::FlagError {
                field: FieldRef::block(GroupId::Employment, 0, "refEmail"),
                flagged: false,
            }]
        );
    }
}
