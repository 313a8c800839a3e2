//! Field definitions & runtime field state.
//!
//! - `FieldKind`: supported input kinds
//! - `FieldDef`: declarative description (schema side, never mutated)
//! - `Field`: runtime instance built from a `FieldDef`
//!
//! Usage:
//! ```ignore
//! let def = FieldDef::new("mobile2", "Mobile", FieldKind::Tel)
//!     .required()
//!     .numeric_only()
//!     .payload(Category::ContactInfo, "mobile");
//! let field = Field::from_def(&def);
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::group::{BlockId, GroupId};
use crate::guard::GuardMarks;
use crate::payload::Category;

/// Input kind of a field.
///
/// Notes:
/// - Text / TextArea are free text (safe-leading guard applies)
/// - Select resets to its first option; an empty first option acts as placeholder
/// - Checkbox stores `"on"` when checked and `""` otherwise
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    TextArea,
    Email,
    Tel,
    Number,
    Date,
    Select { options: Vec<String> },
    Checkbox,
}

impl FieldKind {
    pub fn select<I, S>(options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        FieldKind::Select {
            options: options.into_iter().map(Into::into).collect(),
        }
    }

    /// Free-text kinds are the only ones receiving the safe-leading guard.
    pub fn is_free_text(&self) -> bool {
        matches!(self, FieldKind::Text | FieldKind::TextArea)
    }

    /// Value of a freshly built field of this kind.
    pub fn default_value(&self) -> String {
        match self {
            FieldKind::Select { options } => options.first().cloned().unwrap_or_default(),
            _ => String::new(),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            FieldKind::Text => "text",
            FieldKind::TextArea => "textarea",
            FieldKind::Email => "email",
            FieldKind::Tel => "tel",
            FieldKind::Number => "number",
            FieldKind::Date => "date",
            FieldKind::Select { .. } => "select",
            FieldKind::Checkbox => "checkbox",
        }
    }
}

/// Where a top-level field lands in the submission payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PayloadSlot {
    pub category: Category,
    pub key: &'static str,
}

/// Declarative description of a field.
#[derive(Debug, Clone)]
pub struct FieldDef {
    pub name: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub required: bool,
    pub hidden: bool,
    pub numeric_only: bool,
    pub payload: Option<PayloadSlot>,
}

impl FieldDef {
    pub fn new(name: &'static str, label: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            label,
            kind,
            required: false,
            hidden: false,
            numeric_only: false,
            payload: None,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Initially hidden; a conditional rule decides when it appears.
    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    pub fn numeric_only(mut self) -> Self {
        self.numeric_only = true;
        self
    }

    pub fn payload(mut self, category: Category, key: &'static str) -> Self {
        self.payload = Some(PayloadSlot { category, key });
        self
    }
}

/// Runtime field state.
///
/// Invariant: `!visible` implies `!required` and an empty value.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub name: String,
    pub kind: FieldKind,
    pub value: String,
    pub required: bool,
    pub visible: bool,
    pub flagged: bool,
    pub numeric_only: bool,
    pub guards: GuardMarks,
    pub payload: Option<PayloadSlot>,
}

impl Field {
    pub fn from_def(def: &FieldDef) -> Self {
        Self {
            name: def.name.to_string(),
            kind: def.kind.clone(),
            value: def.kind.default_value(),
            required: def.required && !def.hidden,
            visible: !def.hidden,
            flagged: false,
            numeric_only: def.numeric_only,
            guards: GuardMarks::default(),
            payload: def.payload,
        }
    }

    /// Reset to the default value of the kind (empty for text, first option for selects).
    /// Returns whether the value changed.
    pub fn clear(&mut self) -> bool {
        let default = self.kind.default_value();
        if self.value == default {
            return false;
        }
        self.value = default;
        true
    }

    pub fn is_blank(&self) -> bool {
        self.value.trim().is_empty()
    }
}

/// Address of a field: either a top-level field or a field inside a block.
///
/// Serialized untagged so event scripts can write `"fullName"` or
/// `{ "group": "employment", "block": 1, "name": "company" }`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldRef {
    Form(String),
    Block {
        group: GroupId,
        block: BlockId,
        name: String,
    },
}

impl FieldRef {
    pub fn form(name: impl Into<String>) -> Self {
        FieldRef::Form(name.into())
    }

    pub fn block(group: GroupId, block: BlockId, name: impl Into<String>) -> Self {
        FieldRef::Block {
            group,
            block,
            name: name.into(),
        }
    }
}

impl fmt::Display for FieldRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldRef::Form(name) => f.write_str(name),
            FieldRef::Block { group, block, name } => write!(f, "{group}[{block}].{name}"),
        }
    }
}
