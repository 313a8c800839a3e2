use thiserror::Error;

use crate::field::FieldRef;
use crate::group::{BlockId, GroupId};

/// Why a single field was rejected. The display text is shown to the applicant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FieldIssue {
    #[error("Please fill out this field.")]
    Missing,
    #[error("Please check this box if you want to proceed.")]
    Unchecked,
    #[error("Please enter a valid email address.")]
    InvalidEmail,
    #[error("Please enter a number.")]
    InvalidNumber,
    #[error("Please enter a valid date.")]
    InvalidDate,
    #[error("Please select an item in the list.")]
    InvalidOption,
}

/// First invalid field found while validating a section.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("section {section}: {field}: {issue}")]
pub struct ValidationFailure {
    pub section: usize,
    pub field: FieldRef,
    pub issue: FieldIssue,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("At least one entry is required.")]
    MinimumBlocks { group: GroupId },

    #[error("block {block} of group `{group}` has no removal control")]
    NotRemovable { group: GroupId, block: BlockId },

    #[error("unknown block {block} in group `{group}`")]
    UnknownBlock { group: GroupId, block: BlockId },

    #[error("unknown field `{0}`")]
    UnknownField(FieldRef),

    #[error("group `{0}` is not part of this form")]
    UnknownGroup(GroupId),

    #[error("not signed in")]
    NotSignedIn,

    #[error("a submission is already in flight")]
    SubmissionInFlight,

    #[error("the application has already been submitted")]
    AlreadySubmitted,
}

/// Failure of the network submission boundary.
#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("workflow endpoint answered with status {status}")]
    Rejected { status: u16 },

    #[error("failed to encode submission payload: {0}")]
    Encode(#[from] serde_json::Error),

    #[error(transparent)]
    Transport(#[from] reqwest::Error),

    #[error("no workflow endpoint configured")]
    MissingEndpoint,
}
