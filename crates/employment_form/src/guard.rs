//! Input guards.
//!
//! Two sanitizers, each bound at most once per field:
//! - numeric: strips every non-digit on value changes (input, paste, change)
//! - safe-leading: on blur, neutralizes values a spreadsheet would read as a formula
//!
//! Guards only ever touch `Field::value`.

use crate::field::Field;

/// Leading characters that make spreadsheets evaluate a cell.
pub const FORMULA_SENTINELS: [char; 4] = ['=', '+', '-', '@'];

/// Prefix that forces a literal cell.
pub const LITERAL_PREFIX: char = '\'';

/// Which guards are bound to a field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GuardMarks {
    pub numeric: bool,
    pub safe_leading: bool,
}

/// Event that may fire a guard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardTrigger {
    Input,
    Paste,
    Change,
    Blur,
}

pub fn numeric_only(raw: &str) -> String {
    raw.chars().filter(char::is_ascii_digit).collect()
}

/// `"  =SUM(A1)"` -> `"'=SUM(A1)"`, `"##note"` -> `"note"`, `"plain"` unchanged.
pub fn safe_leading(raw: &str) -> String {
    let stripped = raw
        .trim_start()
        .trim_start_matches(|c: char| !c.is_alphanumeric() && !FORMULA_SENTINELS.contains(&c));

    if stripped.starts_with(FORMULA_SENTINELS) {
        format!("{LITERAL_PREFIX}{stripped}")
    } else {
        stripped.to_string()
    }
}

/// Returns `true` if the guard was newly bound.
pub fn bind_numeric_guard(field: &mut Field) -> bool {
    if field.guards.numeric {
        return false;
    }
    field.guards.numeric = true;
    true
}

/// Returns `true` if the guard was newly bound. Exempt kinds are never bound.
pub fn bind_safe_leading_guard(field: &mut Field) -> bool {
    if field.guards.safe_leading || !field.kind.is_free_text() {
        return false;
    }
    field.guards.safe_leading = true;
    true
}

/// Bind every guard a field asks for. Returns the number of new bindings.
pub fn attach_guards<'a>(fields: impl IntoIterator<Item = &'a mut Field>) -> usize {
    let mut bound = 0;
    for field in fields {
        if field.numeric_only && bind_numeric_guard(field) {
            bound += 1;
        }
        if bind_safe_leading_guard(field) {
            bound += 1;
        }
    }
    bound
}

/// Run the guards bound to `field` for `trigger`. Returns `true` if the value changed.
pub fn fire(field: &mut Field, trigger: GuardTrigger) -> bool {
    let sanitized = match trigger {
        GuardTrigger::Input | GuardTrigger::Paste | GuardTrigger::Change
            if field.guards.numeric =>
        {
            numeric_only(&field.value)
        }
        GuardTrigger::Blur if field.guards.safe_leading => safe_leading(&field.value),
        _ => return false,
    };

    if sanitized == field.value {
        return false;
    }
    field.value = sanitized;
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::{FieldDef, FieldKind};
    use pretty_assertions::assert_eq;

    fn field(kind: FieldKind) -> Field {
        Field::from_def(&FieldDef::new("f", "F", kind))
    }

    #[test]
    fn numeric_guard_keeps_digits_only() {
        let mut f = field(FieldKind::Tel);
        bind_numeric_guard(&mut f);
        f.value = "a1b2c3".into();
        assert!(fire(&mut f, GuardTrigger::Input));
        assert_eq!(f.value, "123");

        f.value = "+60 12-345 6789".into();
        assert!(fire(&mut f, GuardTrigger::Paste));
        assert_eq!(f.value, "60123456789");
    }

    #[test]
    fn formula_is_prefixed_and_text_preserved() {
        assert_eq!(safe_leading("  =SUM(A1)"), "'=SUM(A1)");
        assert_eq!(safe_leading("@cmd"), "'@cmd");
        assert_eq!(safe_leading("-5 years"), "'-5 years");
        assert_eq!(safe_leading("  ## Jalan Ampang"), "Jalan Ampang");
        assert_eq!(safe_leading("Kuala Lumpur"), "Kuala Lumpur");
        assert_eq!(safe_leading("   "), "");
    }

    #[test]
    fn binding_is_idempotent() {
        let mut f = field(FieldKind::Text);
        assert!(bind_safe_leading_guard(&mut f));
        assert!(!bind_safe_leading_guard(&mut f));
        assert!(bind_numeric_guard(&mut f));
        assert!(!bind_numeric_guard(&mut f));
    }

    #[test]
    fn exempt_kinds_never_get_safe_leading() {
        for kind in [
            FieldKind::Email,
            FieldKind::Tel,
            FieldKind::Number,
            FieldKind::Date,
            FieldKind::Checkbox,
            FieldKind::select(["", "A"]),
        ] {
            let mut f = field(kind);
            assert!(!bind_safe_leading_guard(&mut f));
            f.value = "=1".into();
            assert!(!fire(&mut f, GuardTrigger::Blur));
            assert_eq!(f.value, "=1");
        }
    }

    #[test]
    fn unbound_guards_do_not_fire() {
        let mut f = field(FieldKind::TextArea);
        f.value = "=x".into();
        assert!(!fire(&mut f, GuardTrigger::Blur));
        assert_eq!(attach_guards([&mut f]), 1);
        assert!(fire(&mut f, GuardTrigger::Blur));
        assert_eq!(f.value, "'=x");
        // guards never touch required or visibility
        assert!(f.visible);
        assert!(!f.required);
    }
}
