//! Interactive collection of configuration values.
//! Only the known keys that were not supplied by any other source are asked for.

use crate::config::{known_defaults, ConfigValue, PartialConfig};
use crate::constants::defaults::{
    AUTHOR_EMAIL, AUTHOR_NAME, DOCKER_SUPPORT, LICENSE, PORT, PROJECT_DESCRIPTION, PROJECT_NAME,
    REPOSITORY_URL,
};
use crate::error::{Error, Result};
use dialoguer::{Confirm, Input};
use regex::Regex;

const PROJECT_NAME_PATTERN: &str = r"^[a-zA-Z0-9_-]+$";

/// Checks the answer before it is accepted.
pub type Validator = fn(&str) -> Result<()>;

/// Source of interactive answers.
pub trait Prompter {
    fn text(&self, prompt: &str, default: &str, validator: Option<Validator>) -> Result<String>;
    fn confirm(&self, prompt: &str, default: bool) -> Result<bool>;
}

/// Terminal prompts backed by dialoguer.
#[derive(Debug, Default)]
pub struct DialoguerPrompter;

impl DialoguerPrompter {
    pub fn new() -> Self {
        Self
    }
}

impl Prompter for DialoguerPrompter {
    fn text(&self, prompt: &str, default: &str, validator: Option<Validator>) -> Result<String> {
        let mut input = Input::<String>::new()
            .with_prompt(prompt)
            .default(default.to_string())
            .allow_empty(true);
        if let Some(validator) = validator {
            input = input.validate_with(move |value: &String| -> std::result::Result<(), String> {
                validator(value).map_err(|e| e.to_string())
            });
        }
        Ok(input.interact_text()?)
    }

    fn confirm(&self, prompt: &str, default: bool) -> Result<bool> {
        Ok(Confirm::new().with_prompt(prompt).default(default).interact()?)
    }
}

/// Project names may only contain letters, numbers, hyphens and underscores.
pub fn validate_project_name(name: &str) -> Result<()> {
    let re = Regex::new(PROJECT_NAME_PATTERN)
        .map_err(|e| Error::ValidationError(e.to_string()))?;
    if re.is_match(name) {
        Ok(())
    } else {
        Err(Error::ValidationError(format!(
            "'{name}' is not a valid project name: use only letters, numbers, hyphens and underscores"
        )))
    }
}

fn question(key: &str) -> &'static str {
    match key {
        PROJECT_NAME => "Project name",
        PROJECT_DESCRIPTION => "Project description",
        AUTHOR_NAME => "Author name",
        AUTHOR_EMAIL => "Author email",
        REPOSITORY_URL => "Repository URL",
        LICENSE => "License",
        DOCKER_SUPPORT => "Add Docker support?",
        PORT => "Port",
        _ => "Value",
    }
}

/// Asks for every known key missing from `answers` and returns the completed set.
///
/// Supplied values are kept as they are; answers are appended after them.
///
/// # Errors
/// * `Error::PromptError` if the terminal interaction fails
/// * `Error::ValidationError` if a prompter returns an invalid project name
pub fn prompt_missing(prompter: &dyn Prompter, mut answers: PartialConfig) -> Result<PartialConfig> {
    for (key, default) in known_defaults() {
        if answers.contains_key(key) {
            continue;
        }

        let value = match default {
            ConfigValue::Bool(default) => ConfigValue::Bool(prompter.confirm(question(key), default)?),
            ConfigValue::Number(default) => {
                ConfigValue::parse_literal(&prompter.text(question(key), &default.to_string(), None)?)
            }
            ConfigValue::String(default) => {
                let validator: Option<Validator> =
                    if key == PROJECT_NAME { Some(validate_project_name) } else { None };
                let answer = prompter.text(question(key), &default, validator)?;
                if let Some(validator) = validator {
                    validator(&answer)?;
                }
                ConfigValue::String(answer)
            }
        };
        answers.insert(key.to_string(), value);
    }
    Ok(answers)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    /// Answers from a fixed script and remembers what was asked.
    struct ScriptedPrompter {
        texts: RefCell<Vec<&'static str>>,
        confirms: RefCell<Vec<bool>>,
        asked: RefCell<Vec<String>>,
    }

    impl ScriptedPrompter {
        fn new(texts: Vec<&'static str>, confirms: Vec<bool>) -> Self {
            Self {
                texts: RefCell::new(texts),
                confirms: RefCell::new(confirms),
                asked: RefCell::new(Vec::new()),
            }
        }
    }

    impl Prompter for ScriptedPrompter {
        fn text(&self, prompt: &str, default: &str, _validator: Option<Validator>) -> Result<String> {
            self.asked.borrow_mut().push(prompt.to_string());
            let answer = self.texts.borrow_mut().remove(0);
            Ok(if answer.is_empty() { default.to_string() } else { answer.to_string() })
        }

        fn confirm(&self, prompt: &str, _default: bool) -> Result<bool> {
            self.asked.borrow_mut().push(prompt.to_string());
            Ok(self.confirms.borrow_mut().remove(0))
        }
    }

    #[test]
    fn test_validate_project_name() {
        assert!(validate_project_name("my-app_2").is_ok());
        assert!(validate_project_name("my app").is_err());
        assert!(validate_project_name("").is_err());
        assert!(validate_project_name("../escape").is_err());
    }

    #[test]
    fn test_prompt_missing_only_asks_for_absent_keys() {
        let mut supplied = PartialConfig::new();
        supplied.insert(PROJECT_NAME.to_string(), "demo".into());
        supplied.insert(PORT.to_string(), 8080u64.into());
        let prompter = ScriptedPrompter::new(vec!["A demo", "", "", "", "Apache-2.0"], vec![true]);

        let answers = prompt_missing(&prompter, supplied).unwrap();

        assert_eq!(
            *prompter.asked.borrow(),
            vec![
                "Project description",
                "Author name",
                "Author email",
                "Repository URL",
                "License",
                "Add Docker support?"
            ]
        );
        assert_eq!(answers.get(PROJECT_NAME), Some(&ConfigValue::from("demo")));
        assert_eq!(answers.get(PROJECT_DESCRIPTION), Some(&ConfigValue::from("A demo")));
        assert_eq!(answers.get(LICENSE), Some(&ConfigValue::from("Apache-2.0")));
        assert_eq!(answers.get(DOCKER_SUPPORT), Some(&ConfigValue::Bool(true)));
        assert_eq!(answers.get(PORT), Some(&ConfigValue::from(8080u64)));
    }

    #[test]
    fn test_prompted_port_is_a_number() {
        let prompter =
            ScriptedPrompter::new(vec!["demo", "", "", "", "", "", "4000"], vec![false]);
        let answers = prompt_missing(&prompter, PartialConfig::new()).unwrap();
        assert_eq!(answers.get(PORT), Some(&ConfigValue::from(4000u64)));
    }

    #[test]
    fn test_invalid_project_name_is_rejected() {
        let prompter = ScriptedPrompter::new(vec!["not valid"], vec![]);
        match prompt_missing(&prompter, PartialConfig::new()) {
            Err(Error::ValidationError(msg)) => assert!(msg.contains("not valid")),
            other => panic!("Expected ValidationError, got {other:?}"),
        }
    }
}
