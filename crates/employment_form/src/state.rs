//! Runtime form state.
//!
//! One explicit object holds everything the reducer mutates: sections,
//! top-level fields, repeatable groups, the current section, the phase and
//! the signed-in identity.

use std::collections::{BTreeMap, HashMap};

use auth::Identity;
use strum::Display;
use tracing::debug;

use crate::errors::FormError;
use crate::field::{Field, FieldRef};
use crate::group::{GroupId, RepeatableGroup};
use crate::guard::attach_guards;
use crate::rules::{apply_rules, ConditionalRule};
use crate::schema::FormSchema;

/// Where the applicant is in the overall flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum Phase {
    /// Login gate shown; form events are ignored.
    SignedOut,
    Editing,
    /// POST in flight; further submits are ignored.
    Submitting,
    /// Terminal confirmation state.
    Confirmed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub title: &'static str,
    pub fields: Vec<String>,
    pub groups: Vec<GroupId>,
    pub active: bool,
}

#[derive(Debug, Clone)]
pub struct FormState {
    pub title: &'static str,
    sections: Vec<Section>,
    fields: HashMap<String, Field>,
    groups: BTreeMap<GroupId, RepeatableGroup>,
    rules: Vec<ConditionalRule>,
    current: usize,
    phase: Phase,
    identity: Option<Identity>,
    focus: Option<FieldRef>,
}

impl FormState {
    /// Build fields and groups, bind guards, evaluate every rule once and
    /// activate the first section.
    pub fn new(schema: FormSchema) -> Self {
        let mut sections = Vec::with_capacity(schema.sections.len());
        let mut fields = HashMap::new();
        let mut groups = BTreeMap::new();

        for def in schema.sections {
            let section = Section {
                title: def.title,
                fields: def.fields.iter().map(|f| f.name.to_string()).collect(),
                groups: def.groups.iter().map(|g| g.id).collect(),
                active: sections.is_empty(),
            };
            for field_def in &def.fields {
                fields.insert(field_def.name.to_string(), Field::from_def(field_def));
            }
            for group_def in def.groups {
                groups.insert(group_def.id, RepeatableGroup::new(group_def.id, group_def.fields));
            }
            sections.push(section);
        }

        let bound = attach_guards(fields.values_mut());

        let mut state = Self {
            title: schema.title,
            sections,
            fields,
            groups,
            rules: schema.rules,
            current: 0,
            phase: Phase::SignedOut,
            identity: None,
            focus: None,
        };
        apply_rules(&mut state);
        debug!(
            sections = state.sections.len(),
            fields = state.fields.len(),
            guards = bound,
            "form state built"
        );
        state
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn section_count(&self) -> usize {
        self.sections.len()
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    /// Moves the active marker. Callers keep `index` in range.
    pub(crate) fn activate(&mut self, index: usize) {
        self.current = index;
        for (i, section) in self.sections.iter_mut().enumerate() {
            section.active = i == index;
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub(crate) fn set_phase(&mut self, phase: Phase) {
        if self.phase != phase {
            debug!(from = %self.phase, to = %phase, "phase change");
            self.phase = phase;
        }
    }

    pub fn identity(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }

    pub fn set_identity(&mut self, identity: Option<Identity>) {
        self.identity = identity;
    }

    pub fn focus(&self) -> Option<&FieldRef> {
        self.focus.as_ref()
    }

    pub(crate) fn set_focus(&mut self, field: FieldRef) {
        self.focus = Some(field);
    }

    pub fn rules(&self) -> &[ConditionalRule] {
        &self.rules
    }

    /// Top-level fields in section order.
    pub fn fields(&self) -> impl Iterator<Item = &Field> + '_ {
        self.sections
            .iter()
            .flat_map(|s| s.fields.iter())
            .filter_map(|name| self.fields.get(name))
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.get(name)
    }

    pub fn field_mut(&mut self, name: &str) -> Option<&mut Field> {
        self.fields.get_mut(name)
    }

    pub fn value(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(|f| f.value.as_str())
    }

    pub fn groups(&self) -> impl Iterator<Item = &RepeatableGroup> + '_ {
        self.groups.values()
    }

    pub fn group(&self, id: GroupId) -> Option<&RepeatableGroup> {
        self.groups.get(&id)
    }

    pub fn group_mut(&mut self, id: GroupId) -> Result<&mut RepeatableGroup, FormError> {
        self.groups.get_mut(&id).ok_or(FormError::UnknownGroup(id))
    }

    pub fn field_at(&self, at: &FieldRef) -> Option<&Field> {
        match at {
            FieldRef::Form(name) => self.fields.get(name),
            FieldRef::Block { group, block, name } => {
                self.groups.get(group)?.block(*block)?.field(name)
            }
        }
    }

    pub fn field_at_mut(&mut self, at: &FieldRef) -> Result<&mut Field, FormError> {
        let field = match at {
            FieldRef::Form(name) => self.fields.get_mut(name),
            FieldRef::Block { group, block, name } => self
                .groups
                .get_mut(group)
                .and_then(|g| g.block_mut(*block))
                .and_then(|b| b.field_mut(name)),
        };
        field.ok_or_else(|| FormError::UnknownField(at.clone()))
    }

    /// Raw write without guards or rules. Hidden fields keep their empty value.
    pub fn set_value(&mut self, at: &FieldRef, value: impl Into<String>) -> Result<(), FormError> {
        let field = self.field_at_mut(at)?;
        if !field.visible {
            debug!(field = %at, "write to hidden field ignored");
            return Ok(());
        }
        field.value = value.into();
        Ok(())
    }

    /// Extract every block of `group`; see `RepeatableGroup::extract`.
    pub fn extract_group(
        &self,
        group: GroupId,
        names: &[&str],
    ) -> Result<Vec<crate::payload::GroupRecord>, FormError> {
        self.group(group)
            .map(|g| g.extract(names))
            .ok_or(FormError::UnknownGroup(group))
    }

    /// Every field address of a section: top-level fields, then block fields in block order.
    pub fn section_refs(&self, index: usize) -> Vec<FieldRef> {
        let Some(section) = self.sections.get(index) else {
            return Vec::new();
        };
        let mut refs: Vec<FieldRef> = section.fields.iter().map(FieldRef::form).collect();
        for id in &section.groups {
            let Some(group) = self.groups.get(id) else {
                continue;
            };
            for block in group.blocks() {
                refs.extend(
                    block
                        .fields()
                        .iter()
                        .map(|f| FieldRef::block(*id, block.id(), f.name.clone())),
                );
            }
        }
        refs
    }

    /// Section holding a field address.
    pub fn section_of(&self, at: &FieldRef) -> Option<usize> {
        self.sections.iter().position(|section| match at {
            FieldRef::Form(name) => section.fields.iter().any(|f| f == name),
            FieldRef::Block { group, .. } => section.groups.contains(group),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::employment_application;
    use pretty_assertions::assert_eq;

    #[test]
    fn starts_signed_out_on_first_section() {
        let state = FormState::new(employment_application("Malaysia"));
        assert_eq!(state.phase(), Phase::SignedOut);
        assert_eq!(state.current_index(), 0);
        assert_eq!(state.section_count(), 8);
        let active: Vec<bool> = state.sections().iter().map(|s| s.active).collect();
        assert_eq!(active.iter().filter(|a| **a).count(), 1);
        assert!(active[0]);
    }

    #[test]
    fn guards_are_bound_on_construction() {
        let state = FormState::new(employment_application("Malaysia"));
        for name in ["mobile2", "telHome", "whatsappNo", "bankAccount"] {
            assert!(state.field(name).unwrap().guards.numeric, "{name}");
        }
        assert!(state.field("fullName").unwrap().guards.safe_leading);
        assert!(!state.field("email2").unwrap().guards.safe_leading);
        assert!(!state.field("dob").unwrap().guards.safe_leading);
    }

    #[test]
    fn hidden_fields_ignore_writes() {
        let mut state = FormState::new(employment_application("Malaysia"));
        state.set_value(&FieldRef::form("bankOther"), "Bank Islam").unwrap();
        assert_eq!(state.value("bankOther"), Some(""));
    }

    #[test]
    fn unknown_addresses_are_errors() {
        let mut state = FormState::new(employment_application("Malaysia"));
        let missing = FieldRef::form("shoeSize");
        assert_eq!(
            state.set_value(&missing, "42"),
            Err(FormError::UnknownField(missing.clone()))
        );
        let bad_block = FieldRef::block(GroupId::Family, 7, "familyName");
        assert!(state.set_value(&bad_block, "x").is_err());
    }

    #[test]
    fn section_refs_include_block_fields() {
        let mut state = FormState::new(employment_application("Malaysia"));
        state.group_mut(GroupId::Employment).unwrap().add_block();
        let refs = state.section_refs(4);
        assert_eq!(refs.len(), 26);
        assert_eq!(refs[0], FieldRef::block(GroupId::Employment, 0, "company"));
        assert_eq!(refs[13], FieldRef::block(GroupId::Employment, 1, "company"));
        assert_eq!(state.section_of(&refs[13]), Some(4));
        assert_eq!(state.section_of(&FieldRef::form("email2")), Some(2));
    }
}
