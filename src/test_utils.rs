use std::collections::VecDeque;
use std::sync::Once;

use dotenvy::dotenv;
use rustyline::error::ReadlineError;

use crate::menu::LineSource;

static INIT: Once = Once::new();

/// Loads `.env` and installs a debug-level logger once per test binary.
pub fn init_logging_for_tests() {
    INIT.call_once(|| {
        dotenv().ok();
        let _ = env_logger::builder()
            .target(env_logger::Target::Stdout)
            .filter_level(log::LevelFilter::Debug)
            .is_test(true)
            .try_init();
    });
}

/// Feeds canned answers to the menu and records every prompt it was shown.
/// Reports EOF once the answers run out.
pub struct ScriptedInput {
    answers: VecDeque<String>,
    pub prompts: Vec<String>,
}

impl ScriptedInput {
    pub fn new(answers: &[&str]) -> Self {
        ScriptedInput {
            answers: answers.iter().map(|a| a.to_string()).collect(),
            prompts: Vec::new(),
        }
    }

    pub fn remaining(&self) -> usize {
        self.answers.len()
    }
}

impl LineSource for ScriptedInput {
    fn read_line(&mut self, prompt: &str) -> rustyline::Result<String> {
        self.prompts.push(prompt.to_string());
        self.answers.pop_front().ok_or(ReadlineError::Eof)
    }
}
