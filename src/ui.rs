// src/ui.rs

use std::cell::RefCell;
use std::time::Duration;

use anyhow::{Context, Result};
use dialoguer::{Confirm, Select};
use indicatif::{ProgressBar, ProgressStyle};

use crate::flow::Interact;

/// Interactive prompts and the progress spinner on a real terminal.
/// At most one spinner is live at a time.
pub struct TerminalUi {
    spinner_style: ProgressStyle,
    active: RefCell<Option<ProgressBar>>,
}

impl TerminalUi {
    pub fn new() -> Result<Self> {
        let spinner_style = ProgressStyle::default_spinner()
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏")
            .template("{spinner:.green} {msg}")
            .context("Failed to create progress bar style")?;

        Ok(Self {
            spinner_style,
            active: RefCell::new(None),
        })
    }

    fn clear_spinner(&self) {
        if let Some(pb) = self.active.borrow_mut().take() {
            pb.finish_and_clear();
        }
    }
}

impl Interact for TerminalUi {
    fn select(&self, prompt: &str, options: &[String]) -> Option<usize> {
        Select::new()
            .with_prompt(prompt)
            .items(options)
            .default(0)
            .interact_opt()
            .ok()
            .flatten()
    }

    fn confirm(&self, prompt: &str, default: bool) -> Option<bool> {
        Confirm::new()
            .with_prompt(prompt)
            .default(default)
            .interact_opt()
            .ok()
            .flatten()
    }

    fn spin_start(&self, message: &str) {
        self.clear_spinner();
        let pb = ProgressBar::new_spinner();
        pb.set_style(self.spinner_style.clone());
        pb.set_message(message.to_string());
        pb.enable_steady_tick(Duration::from_millis(100));
        *self.active.borrow_mut() = Some(pb);
    }

    fn spin_succeed(&self, message: &str) {
        self.clear_spinner();
        println!("✔ {}", message);
    }

    fn spin_fail(&self, message: &str) {
        self.clear_spinner();
        eprintln!("✖ {}", message);
    }
}
