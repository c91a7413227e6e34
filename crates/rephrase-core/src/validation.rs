//! Input validation: word counting and the submission gate

use crate::action::Action;
use crate::error::ValidationError;
use serde::Serialize;

/// Default maximum number of words for every action except research.
pub const WORD_LIMIT: usize = 200;

/// Number of maximal non-whitespace runs in `text`.
pub fn count_words(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Derived validation state for the current input and action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct InputValidation {
    pub word_count: usize,
    pub limit: usize,
    pub over_limit: bool,
    pub can_submit: bool,
}

impl InputValidation {
    /// Counter label shown under the input, e.g. `"12 / 200 words"`.
    pub fn counter_label(&self) -> String {
        format!("{} / {} words", self.word_count, self.limit)
    }

    /// Why submission is blocked, if it is.
    pub fn check(&self) -> Result<(), ValidationError> {
        if self.word_count == 0 {
            Err(ValidationError::Empty)
        } else if self.over_limit {
            Err(ValidationError::OverLimit {
                count: self.word_count,
                limit: self.limit,
            })
        } else {
            Ok(())
        }
    }
}

/// Validate `text` for `action` against `limit`.
pub fn validate_input(text: &str, action: Action, limit: usize) -> InputValidation {
    let word_count = count_words(text);
    let over_limit = action.enforces_word_limit() && word_count > limit;
    InputValidation {
        word_count,
        limit,
        over_limit,
        can_submit: word_count > 0 && !over_limit,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(n: usize) -> String {
        vec!["word"; n].join(" ")
    }

    #[test]
    fn test_blank_input_counts_zero() {
        assert_eq!(count_words(""), 0);
        assert_eq!(count_words("   \n\t  "), 0);
    }

    #[test]
    fn test_counts_whitespace_delimited_runs() {
        assert_eq!(count_words("  The cat\tsat.\n\nOn  the mat "), 6);
        assert_eq!(count_words("one"), 1);
    }

    #[test]
    fn test_empty_input_cannot_submit() {
        let v = validate_input("  ", Action::Detect, WORD_LIMIT);
        assert!(!v.can_submit);
        assert_eq!(v.check(), Err(ValidationError::Empty));
    }

    #[test]
    fn test_limit_is_inclusive() {
        let at_limit = validate_input(&words(200), Action::Rewrite, WORD_LIMIT);
        assert!(at_limit.can_submit);
        assert!(!at_limit.over_limit);

        let over = validate_input(&words(201), Action::Rewrite, WORD_LIMIT);
        assert!(over.over_limit);
        assert!(!over.can_submit);
        assert_eq!(
            over.check(),
            Err(ValidationError::OverLimit {
                count: 201,
                limit: 200
            })
        );
    }

    #[test]
    fn test_research_ignores_limit() {
        let v = validate_input(&words(500), Action::Research, WORD_LIMIT);
        assert!(!v.over_limit);
        assert!(v.can_submit);
    }

    #[test]
    fn test_counter_label() {
        let v = validate_input("a b c", Action::Detect, WORD_LIMIT);
        assert_eq!(v.counter_label(), "3 / 200 words");
    }

    #[test]
    fn test_custom_limit() {
        let v = validate_input("a b c", Action::Detect, 2);
        assert!(v.over_limit);
        assert_eq!(v.counter_label(), "3 / 2 words");
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn any_action() -> impl Strategy<Value = Action> {
        prop_oneof![
            Just(Action::Rewrite),
            Just(Action::Detect),
            Just(Action::PlagiarismCheck),
            Just(Action::Research),
        ]
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        /// Property: joining n non-empty tokens with arbitrary whitespace yields n words
        #[test]
        fn word_count_matches_token_count(
            tokens in prop::collection::vec("[a-zA-Z0-9.,!?'-]{1,12}", 0..60),
            sep in "[ \t\n]{1,3}",
        ) {
            let text = tokens.join(&sep);
            prop_assert_eq!(count_words(&text), tokens.len());
        }

        /// Property: submission is enabled iff count > 0 and (research or count <= limit)
        #[test]
        fn submission_gate(n in 0usize..260, action in any_action()) {
            let text = vec!["w"; n].join(" ");
            let v = validate_input(&text, action, WORD_LIMIT);
            let expected = n > 0 && (action == Action::Research || n <= WORD_LIMIT);
            prop_assert_eq!(v.can_submit, expected);
            prop_assert_eq!(v.check().is_ok(), expected);
        }
    }
}
