//! Declarative form layout: sections, fields, groups and rules.
//!
//! `employment_application` is the concrete application form; `FormState::new`
//! turns any `FormSchema` into runtime state.

use crate::field::{FieldDef, FieldKind};
use crate::group::GroupId;
use crate::payload::Category;
use crate::rules::ConditionalRule;

pub const NATIONAL_ID_FIELDS: [&str; 4] = [
    "icNumber",
    "icPlaceOfIssue",
    "icDateOfIssue",
    "icDateOfExpiry",
];

pub const PASSPORT_FIELDS: [&str; 4] = [
    "primaryPassport",
    "passportPlaceOfIssue",
    "passportDateOfIssue",
    "passportDateOfExpiry",
];

pub const LOCATION_FIELDS: [&str; 2] = ["completeAddressMalaysia", "yearsOfStayMalaysia"];

pub const MARRIAGE_FIELDS: [&str; 2] = ["marriageDate", "numberOfKids"];

#[derive(Debug, Clone)]
pub struct GroupDef {
    pub id: GroupId,
    pub fields: Vec<FieldDef>,
}

#[derive(Debug, Clone)]
pub struct SectionDef {
    pub title: &'static str,
    pub fields: Vec<FieldDef>,
    pub groups: Vec<GroupDef>,
}

impl SectionDef {
    pub fn new(title: &'static str) -> Self {
        Self {
            title,
            fields: Vec::new(),
            groups: Vec::new(),
        }
    }

    pub fn fields(mut self, fields: impl IntoIterator<Item = FieldDef>) -> Self {
        self.fields.extend(fields);
        self
    }

    pub fn group(mut self, id: GroupId, fields: impl IntoIterator<Item = FieldDef>) -> Self {
        self.groups.push(GroupDef {
            id,
            fields: fields.into_iter().collect(),
        });
        self
    }
}

#[derive(Debug, Clone)]
pub struct FormSchema {
    pub title: &'static str,
    pub sections: Vec<SectionDef>,
    pub rules: Vec<ConditionalRule>,
}

impl FormSchema {
    pub fn field_count(&self) -> usize {
        self.sections.iter().map(|s| s.fields.len()).sum()
    }
}

fn field(
    category: Category,
    name: &'static str,
    label: &'static str,
    kind: FieldKind,
) -> FieldDef {
    FieldDef::new(name, label, kind).payload(category, name)
}

fn personal(name: &'static str, label: &'static str, kind: FieldKind) -> FieldDef {
    field(Category::PersonalData, name, label, kind)
}

fn contact(name: &'static str, label: &'static str, kind: FieldKind) -> FieldDef {
    field(Category::ContactInfo, name, label, kind)
}

fn bank(name: &'static str, label: &'static str, kind: FieldKind) -> FieldDef {
    field(Category::BankInfo, name, label, kind)
}

fn emergency(key: &'static str, name: &'static str, label: &'static str, kind: FieldKind) -> FieldDef {
    FieldDef::new(name, label, kind).payload(Category::EmergencyContact, key)
}

fn office(name: &'static str, label: &'static str, kind: FieldKind) -> FieldDef {
    field(Category::OfficeUse, name, label, kind)
}

fn yes_no() -> FieldKind {
    FieldKind::select(["", "Yes", "No"])
}

/// The employment application: eight sections, four repeatable groups.
///
/// `home_country` is the citizenship value that asks for national-ID details.
pub fn employment_application(home_country: &str) -> FormSchema {
    use FieldKind::*;

    let position = SectionDef::new("Position & Personal Details").fields([
        personal(
            "positionApplied",
            "Position applied for",
            FieldKind::select([
                "",
                "Site Engineer",
                "Project Manager",
                "Safety Officer",
                "Quantity Surveyor",
                "Other",
            ]),
        )
        .required(),
        personal("positionOther1", "Please specify the position", Text).hidden(),
        personal("joiningDate", "Earliest joining date", Date).required(),
        personal("fullName", "Full name (as per IC/passport)", Text).required(),
        personal("dob", "Date of birth", Date).required(),
        personal("age", "Age", Number).required(),
        personal("stateOfBirth", "State / country of birth", Text).required(),
        personal("gender", "Gender", FieldKind::select(["", "Male", "Female"])).required(),
        personal(
            "maritalStatus",
            "Marital status",
            FieldKind::select(["", "Single", "Married", "Divorced", "Widowed"]),
        )
        .required(),
        personal("marriageDate", "Date of marriage", Date).hidden(),
        personal("numberOfKids", "Number of children", Number).hidden(),
        personal("race", "Race", Text),
        personal("religion", "Religion", Text),
        personal("mothersMaidenName", "Mother's maiden name", Text),
    ]);

    let citizenship = SectionDef::new("Citizenship & Residence").fields([
        personal(
            "citizenship",
            "Citizenship",
            FieldKind::select(["", "Malaysia", "Singapore", "Indonesia", "India", "Other"]),
        )
        .required(),
        personal("citizenshipOther", "Please specify citizenship", Text).hidden(),
        personal("currentlyInMalaysia", "Currently residing in Malaysia?", yes_no()).required(),
        personal("homeCountryAddress", "Home country address", TextArea).required(),
        personal("yearsOfStayHome", "Years at home address", Number),
        personal("completeAddressMalaysia", "Complete address in Malaysia", TextArea),
        personal("yearsOfStayMalaysia", "Years of stay in Malaysia", Number),
        personal("durationStayFrom", "Stay from", Date),
        personal("durationStayTo", "Stay to", Date),
        personal("icNumber", "IC number", Text),
        personal("icPlaceOfIssue", "IC place of issue", Text),
        personal("icDateOfIssue", "IC date of issue", Date),
        personal("icDateOfExpiry", "IC date of expiry", Date),
        personal("primaryPassport", "Passport number", Text),
        personal("passportPlaceOfIssue", "Passport place of issue", Text),
        personal("passportDateOfIssue", "Passport date of issue", Date),
        personal("passportDateOfExpiry", "Passport date of expiry", Date),
        personal("visaCollectionCentre", "Visa collection centre", Text),
    ]);

    let contact_section = SectionDef::new("Contact & Emergency Contact").fields([
        FieldDef::new("email2", "Email", Email)
            .required()
            .payload(Category::ContactInfo, "email"),
        FieldDef::new("mobile2", "Mobile number", Tel)
            .required()
            .numeric_only()
            .payload(Category::ContactInfo, "mobile"),
        contact("telHome", "Home telephone", Tel).numeric_only(),
        contact("whatsappNo", "WhatsApp number", Tel).numeric_only(),
        contact("linkedInId", "LinkedIn", Text),
        contact("facebook", "Facebook", Text),
        FieldDef::new("joblocation", "Preferred job location", Text)
            .payload(Category::ContactInfo, "jobLocation"),
        emergency("name", "emergencyName", "Emergency contact name", Text).required(),
        emergency("relation", "emergencyRelation", "Relationship", Text).required(),
        emergency("phone", "emergencyPhone", "Emergency contact phone", Tel).required(),
        emergency("address", "emergencyAddress", "Emergency contact address", TextArea),
        emergency("location", "emergencyLocation", "Emergency contact location", Text),
    ]);

    let bank_section = SectionDef::new("Bank & Statutory Details").fields([
        bank(
            "bank",
            "Bank",
            FieldKind::select(["", "Maybank", "CIMB Bank", "Public Bank", "RHB Bank", "Other"]),
        )
        .required(),
        bank("bankOther", "Please specify the bank", Text).hidden(),
        bank("bankAccount", "Account number", Text)
            .required()
            .numeric_only(),
        bank("accountType", "Account type", FieldKind::select(["", "Savings", "Current"])),
        bank("taxNumber", "Income tax number", Text),
        bank("epfNumber", "EPF number", Text),
        bank("epfRate", "EPF contribution rate (%)", Number),
        bank("socsoNumber", "SOCSO number", Text),
        bank("majorSkillSet", "Major skill set", TextArea),
    ]);

    let employment = SectionDef::new("Employment History").group(
        GroupId::Employment,
        [
            FieldDef::new("company", "Company", Text).required(),
            FieldDef::new("from", "From", Date),
            FieldDef::new("to", "To", Date),
            FieldDef::new("employeeId", "Employee ID", Text),
            FieldDef::new("contactNumber", "Company phone", Tel).numeric_only(),
            FieldDef::new("jobTitle", "Job title", Text).required(),
            FieldDef::new("officeAddress", "Office address", TextArea),
            FieldDef::new("refName", "Reference name", Text),
            FieldDef::new("refPhone", "Reference phone", Tel).numeric_only(),
            FieldDef::new("refPosition", "Reference position", Text),
            FieldDef::new("refEmail", "Reference email", Email),
            FieldDef::new("reasonForLeaving", "Reason for leaving", TextArea),
            FieldDef::new("lastSalary", "Last drawn salary", Number),
        ],
    );

    let education = SectionDef::new("Education & Certifications")
        .group(
            GroupId::Education,
            [
                FieldDef::new("eduSchool", "School / university", Text).required(),
                FieldDef::new("eduInstitute", "Institute", Text),
                FieldDef::new("eduYear", "Year of completion", Number),
                FieldDef::new("eduGraduated", "Graduated", yes_no()),
                FieldDef::new("eduDegree", "Degree / qualification", Text),
                FieldDef::new("eduGPA", "GPA / grade", Text),
                FieldDef::new("eduStream", "Stream / major", Text),
            ],
        )
        .group(
            GroupId::Certifications,
            [
                FieldDef::new("certInstitution", "Institution", Text),
                FieldDef::new("certCompletionDate", "Completion date", Date),
                FieldDef::new("certCourseTitle", "Course title", Text),
                FieldDef::new("certNumber", "Certificate number", Text),
            ],
        );

    let family = SectionDef::new("Family Details").group(
        GroupId::Family,
        [
            FieldDef::new("familyName", "Name", Text),
            FieldDef::new(
                "familyRelation",
                "Relationship",
                FieldKind::select(["", "Spouse", "Child", "Parent", "Sibling"]),
            ),
            FieldDef::new("familyPassport", "IC / passport", Text),
            FieldDef::new("familyDOB", "Date of birth", Date),
            FieldDef::new("familyOccupation", "Occupation", Text),
        ],
    );

    let office_use = SectionDef::new("For Office Use").fields([
        office("costCenterCode", "Cost center code", Text),
        office("costCenterName", "Cost center name", Text),
        office("actualJoiningDate", "Actual joining date", Date),
        office("category", "Category", Text),
        office("department", "Department", Text),
        office("project", "Project", Text),
        FieldDef::new("officePositionApplied", "Position", Text)
            .payload(Category::OfficeUse, "positionApplied"),
        office("officeUseDate", "Date", Date),
    ]);

    FormSchema {
        title: "Employment Application",
        sections: vec![
            position,
            citizenship,
            contact_section,
            bank_section,
            employment,
            education,
            family,
            office_use,
        ],
        rules: vec![
            ConditionalRule::other_elaboration("positionApplied", "positionOther1"),
            ConditionalRule::other_elaboration("bank", "bankOther"),
            ConditionalRule::location("currentlyInMalaysia", &LOCATION_FIELDS),
            ConditionalRule::citizenship(
                "citizenship",
                home_country,
                &NATIONAL_ID_FIELDS,
                &PASSPORT_FIELDS,
                "citizenshipOther",
            ),
            ConditionalRule::marital("maritalStatus", &MARRIAGE_FIELDS),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn field_names_are_unique() {
        let schema = employment_application("Malaysia");
        let mut seen = HashSet::new();
        for section in &schema.sections {
            for def in &section.fields {
                assert!(seen.insert(def.name), "duplicate field {}", def.name);
                assert!(def.payload.is_some(), "{} has no payload slot", def.name);
            }
        }
        assert_eq!(seen.len(), schema.field_count());
    }

    #[test]
    fn rule_targets_exist() {
        let schema = employment_application("Malaysia");
        let names: HashSet<&str> = schema
            .sections
            .iter()
            .flat_map(|s| s.fields.iter().map(|f| f.name))
            .collect();
        for rule in &schema.rules {
            assert!(names.contains(rule.controller()));
            for dependent in rule.dependents() {
                assert!(names.contains(dependent), "{dependent}");
            }
        }
    }

    #[test]
    fn every_group_is_declared_once() {
        let schema = employment_application("Malaysia");
        let mut groups: Vec<GroupId> = schema
            .sections
            .iter()
            .flat_map(|s| s.groups.iter().map(|g| g.id))
            .collect();
        groups.sort();
        assert_eq!(
            groups,
            vec![
                GroupId::Employment,
                GroupId::Education,
                GroupId::Family,
                GroupId::Certifications
            ]
        );
    }
}
