//! Conditional requirements.
//!
//! Each rule maps the value of one controlling field to target states of its
//! dependent fields. Evaluation is a pure function of the controlling values;
//! `apply_rules` / `apply_rules_for` write the result into `FormState` and
//! report every change as effects.

use tracing::debug;

use crate::effects::Effect;
use crate::field::FieldRef;
use crate::state::FormState;

/// Selector value that asks for an elaboration field.
pub const OTHER: &str = "Other";

/// Target state of one dependent field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetState {
    pub field: &'static str,
    pub visible: bool,
    pub required: bool,
    /// Reset the value even while the field stays visible.
    pub clear: bool,
}

impl TargetState {
    pub fn required(field: &'static str) -> Self {
        Self {
            field,
            visible: true,
            required: true,
            clear: false,
        }
    }

    pub fn optional(field: &'static str) -> Self {
        Self {
            field,
            visible: true,
            required: false,
            clear: false,
        }
    }

    pub fn cleared(field: &'static str) -> Self {
        Self {
            field,
            visible: true,
            required: false,
            clear: true,
        }
    }

    pub fn hidden(field: &'static str) -> Self {
        Self {
            field,
            visible: false,
            required: false,
            clear: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Branch {
    pub when: String,
    pub targets: Vec<TargetState>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConditionalRule {
    controller: &'static str,
    branches: Vec<Branch>,
    fallback: Vec<TargetState>,
}

fn each(fields: &[&'static str], state: fn(&'static str) -> TargetState) -> Vec<TargetState> {
    fields.iter().copied().map(state).collect()
}

impl ConditionalRule {
    pub fn new(controller: &'static str, fallback: Vec<TargetState>) -> Self {
        Self {
            controller,
            branches: Vec::new(),
            fallback,
        }
    }

    pub fn when(mut self, value: impl Into<String>, targets: Vec<TargetState>) -> Self {
        self.branches.push(Branch {
            when: value.into(),
            targets,
        });
        self
    }

    /// `Other` reveals and requires the elaboration; anything else hides and clears it.
    pub fn other_elaboration(selector: &'static str, elaboration: &'static str) -> Self {
        Self::new(selector, vec![TargetState::hidden(elaboration)])
            .when(OTHER, vec![TargetState::required(elaboration)])
    }

    /// `Yes` requires the dependents; any other value un-requires and clears them.
    pub fn location(flag: &'static str, dependents: &[&'static str]) -> Self {
        Self::new(flag, each(dependents, TargetState::cleared))
            .when("Yes", each(dependents, TargetState::required))
    }

    /// Home country requires the national ID, `Other` or a foreign country the passport.
    pub fn citizenship(
        selector: &'static str,
        home_country: &str,
        national_id: &[&'static str],
        passport: &[&'static str],
        elaboration: &'static str,
    ) -> Self {
        let mut home = each(national_id, TargetState::required);
        home.extend(each(passport, TargetState::optional));
        home.push(TargetState::hidden(elaboration));

        let mut other = each(national_id, TargetState::optional);
        other.extend(each(passport, TargetState::required));
        other.push(TargetState::required(elaboration));

        let mut foreign = each(national_id, TargetState::optional);
        foreign.extend(each(passport, TargetState::required));
        foreign.push(TargetState::hidden(elaboration));

        Self::new(selector, foreign)
            .when(home_country, home)
            .when(OTHER, other)
    }

    /// `Married` reveals and requires the dependents; anything else hides and clears them.
    pub fn marital(selector: &'static str, dependents: &[&'static str]) -> Self {
        Self::new(selector, each(dependents, TargetState::hidden))
            .when("Married", each(dependents, TargetState::required))
    }

    pub fn controller(&self) -> &'static str {
        self.controller
    }

    /// Target states for a controlling value; first matching branch wins.
    pub fn resolve(&self, value: &str) -> &[TargetState] {
        self.branches
            .iter()
            .find(|branch| branch.when == value)
            .map(|branch| branch.targets.as_slice())
            .unwrap_or(&self.fallback)
    }

    pub fn dependents(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.branches
            .iter()
            .flat_map(|b| b.targets.iter())
            .chain(self.fallback.iter())
            .map(|t| t.field)
    }
}

pub fn is_controller(rules: &[ConditionalRule], field: &str) -> bool {
    rules.iter().any(|rule| rule.controller == field)
}

/// Re-evaluate every rule.
pub fn apply_rules(state: &mut FormState) -> Vec<Effect> {
    let mut effects = Vec::new();
    for rule in state.rules().to_vec() {
        apply_rule(state, &rule, &mut effects);
    }
    effects
}

/// Re-evaluate the rules controlled by `controller`.
pub fn apply_rules_for(state: &mut FormState, controller: &str) -> Vec<Effect> {
    let mut effects = Vec::new();
    let rules: Vec<ConditionalRule> = state
        .rules()
        .iter()
        .filter(|rule| rule.controller == controller)
        .cloned()
        .collect();
    for rule in &rules {
        apply_rule(state, rule, &mut effects);
    }
    effects
}

fn apply_rule(state: &mut FormState, rule: &ConditionalRule, effects: &mut Vec<Effect>) {
    let value = state.value(rule.controller).unwrap_or_default().to_string();
    let targets = rule.resolve(&value).to_vec();
    debug!(controller = rule.controller, value = %value, "applying rule");

    for target in targets {
        let Some(field) = state.field_mut(target.field) else {
            debug!(field = target.field, "rule target not in form; skipped");
            continue;
        };
        let at = FieldRef::form(target.field);
        let required = target.required && target.visible;

        if field.visible != target.visible {
            field.visible = target.visible;
            effects.push(Effect::SetVisible {
                field: at.clone(),
                visible: target.visible,
            });
        }
        if field.required != required {
            field.required = required;
            effects.push(Effect::SetRequired {
                field: at.clone(),
                required,
            });
        }
        if (target.clear || !target.visible) && field.clear() {
            effects.push(Effect::SetValue {
                field: at.clone(),
                value: field.value.clone(),
            });
        }
        if !required && field.flagged {
            field.flagged = false;
            effects.push(Effect::FlagError {
                field: at,
                flagged: false,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{employment_application, NATIONAL_ID_FIELDS, PASSPORT_FIELDS};
    use pretty_assertions::assert_eq;

    fn form() -> FormState {
        FormState::new(employment_application("Malaysia"))
    }

    fn set(state: &mut FormState, name: &str, value: &str) -> Vec<Effect> {
        state.set_value(&FieldRef::form(name), value).unwrap();
        apply_rules_for(state, name)
    }

    fn required(state: &FormState, names: &[&str]) -> Vec<bool> {
        names
            .iter()
            .map(|n| state.field(n).unwrap().required)
            .collect()
    }

    #[test]
    fn home_country_requires_national_id_only() {
        let mut state = form();
        set(&mut state, "citizenship", "Malaysia");
        assert_eq!(required(&state, &NATIONAL_ID_FIELDS), vec![true; 4]);
        assert_eq!(required(&state, &PASSPORT_FIELDS), vec![false; 4]);
        assert!(!state.field("citizenshipOther").unwrap().visible);
    }

    #[test]
    fn other_or_foreign_citizenship_inverts_requirements() {
        for value in ["Other", "Singapore"] {
            let mut state = form();
            set(&mut state, "citizenship", "Malaysia");
            set(&mut state, "citizenship", value);
            assert_eq!(required(&state, &NATIONAL_ID_FIELDS), vec![false; 4], "{value}");
            assert_eq!(required(&state, &PASSPORT_FIELDS), vec![true; 4], "{value}");
            assert_eq!(
                state.field("citizenshipOther").unwrap().required,
                value == OTHER
            );
        }
    }

    #[test]
    fn home_country_comes_from_the_schema() {
        let mut state = FormState::new(employment_application("Singapore"));
        set(&mut state, "citizenship", "Singapore");
        assert_eq!(required(&state, &NATIONAL_ID_FIELDS), vec![true; 4]);
        set(&mut state, "citizenship", "Malaysia");
        assert_eq!(required(&state, &PASSPORT_FIELDS), vec![true; 4]);
    }

    #[test]
    fn leaving_location_yes_clears_dependents() {
        let mut state = form();
        set(&mut state, "currentlyInMalaysia", "Yes");
        state
            .set_value(&FieldRef::form("completeAddressMalaysia"), "Jalan Tun Razak")
            .unwrap();
        state.set_value(&FieldRef::form("yearsOfStayMalaysia"), "4").unwrap();
        assert_eq!(
            required(&state, &["completeAddressMalaysia", "yearsOfStayMalaysia"]),
            vec![true, true]
        );

        let effects = set(&mut state, "currentlyInMalaysia", "No");
        for name in ["completeAddressMalaysia", "yearsOfStayMalaysia"] {
            let field = state.field(name).unwrap();
            assert_eq!(field.value, "");
            assert!(!field.required);
            assert!(field.visible);
        }
        assert!(effects.contains(&Effect::SetValue {
            field: FieldRef::form("yearsOfStayMalaysia"),
            value: String::new(),
        }));
    }

    #[test]
    fn other_selector_toggles_elaboration() {
        let mut state = form();
        let effects = set(&mut state, "bank", OTHER);
        assert_eq!(
            effects,
            vec![
                Effect::SetVisible { field: FieldRef::form("bankOther"), visible: true },
                Effect::SetRequired { field: FieldRef::form("bankOther"), required: true },
            ]
        );
        state.set_value(&FieldRef::form("bankOther"), "Bank Rakyat").unwrap();

        set(&mut state, "bank", "Maybank");
        let other = state.field("bankOther").unwrap();
        assert!(!other.visible);
        assert!(!other.required);
        assert_eq!(other.value, "");
    }

    #[test]
    fn marital_status_reveals_marriage_details() {
        let mut state = form();
        set(&mut state, "maritalStatus", "Married");
        assert_eq!(required(&state, &["marriageDate", "numberOfKids"]), vec![true, true]);
        state.set_value(&FieldRef::form("numberOfKids"), "2").unwrap();

        set(&mut state, "maritalStatus", "Single");
        let kids = state.field("numberOfKids").unwrap();
        assert!(!kids.visible && !kids.required);
        assert_eq!(kids.value, "");
    }

    #[test]
    fn hidden_fields_are_never_required_after_full_evaluation() {
        let mut state = form();
        for (name, value) in [
            ("citizenship", "Other"),
            ("currentlyInMalaysia", "Yes"),
            ("maritalStatus", "Divorced"),
            ("positionApplied", OTHER),
        ] {
            state.set_value(&FieldRef::form(name), value).unwrap();
        }
        apply_rules(&mut state);
        assert!(state.fields().all(|f| f.visible || (!f.required && f.value.is_empty())));
        // second evaluation is a no-op
        assert_eq!(apply_rules(&mut state), Vec::new());
    }

    #[test]
    fn controllers_are_disjoint() {
        let state = form();
        let mut controllers: Vec<&str> = state.rules().iter().map(|r| r.controller()).collect();
        let total = controllers.len();
        controllers.sort_unstable();
        controllers.dedup();
        assert_eq!(controllers.len(), total);
        assert!(is_controller(state.rules(), "citizenship"));
        assert!(!is_controller(state.rules(), "fullName"));
    }
}
