//! Submission payload assembly.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::group::GroupId;
use crate::state::FormState;

/// One extracted block: field name -> value.
pub type GroupRecord = BTreeMap<String, String>;

/// Flat payload categories fed from top-level fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    PersonalData,
    ContactInfo,
    BankInfo,
    EmergencyContact,
    OfficeUse,
}

/// Body of the workflow POST. Built fresh on every submit attempt.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionPayload {
    pub personal_data: BTreeMap<String, String>,
    pub contact_info: BTreeMap<String, String>,
    pub bank_info: BTreeMap<String, String>,
    pub employment: Vec<GroupRecord>,
    pub education: Vec<GroupRecord>,
    pub certifications: Vec<GroupRecord>,
    pub family: Vec<GroupRecord>,
    pub emergency_contact: BTreeMap<String, String>,
    pub office_use: BTreeMap<String, String>,
    pub authenticated_email: Option<String>,
}

impl SubmissionPayload {
    /// Read every declared field of `state`, extract all groups and attach the signed-in email.
    pub fn assemble(state: &FormState) -> Self {
        let mut payload = SubmissionPayload {
            authenticated_email: state.identity().map(|identity| identity.email.clone()),
            ..Default::default()
        };

        for field in state.fields() {
            let Some(slot) = field.payload else {
                continue;
            };
            payload
                .category_mut(slot.category)
                .insert(slot.key.to_string(), field.value.clone());
        }

        for group in state.groups() {
            let records = group.extract(&group.field_names());
            *payload.group_mut(group.id()) = records;
        }

        payload
    }

    fn category_mut(&mut self, category: Category) -> &mut BTreeMap<String, String> {
        match category {
            Category::PersonalData => &mut self.personal_data,
            Category::ContactInfo => &mut self.contact_info,
            Category::BankInfo => &mut self.bank_info,
            Category::EmergencyContact => &mut self.emergency_contact,
            Category::OfficeUse => &mut self.office_use,
        }
    }

    fn group_mut(&mut self, group: GroupId) -> &mut Vec<GroupRecord> {
        match group {
            GroupId::Employment => &mut self.employment,
            GroupId::Education => &mut self.education,
            GroupId::Family => &mut self.family,
            GroupId::Certifications => &mut self.certifications,
        }
    }
}
