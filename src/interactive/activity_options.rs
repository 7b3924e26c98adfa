//! Selectable activity list shown by the dialog

use crate::schedule::ActivityOption;

/// The "available" choice followed by the fetched options, minus any fetched entry
/// that reuses the sentinel code
pub fn build_choices(fetched: &[ActivityOption]) -> Vec<ActivityOption> {
    std::iter::once(ActivityOption::available())
        .chain(fetched.iter().filter(|o| !o.is_available()).cloned())
        .collect()
}

/// Position of `code` in `choices`
pub fn position_of(choices: &[ActivityOption], code: &str) -> Option<usize> {
    choices.iter().position(|o| o.code == code)
}

/// Display name for `code`, or the code itself when it is not listed
pub fn display_name<'a>(choices: &'a [ActivityOption], code: &'a str) -> &'a str {
    choices
        .iter()
        .find(|o| o.code == code)
        .map(|o| o.name.as_str())
        .unwrap_or(code)
}
