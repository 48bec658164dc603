use citycast_core::{Controls, Fragment, RenderSink};
use inquire::Confirm;

/// Writes fragments to stdout and asks confirmations on the terminal.
#[derive(Debug, Default)]
pub struct TerminalSink {
    /// Answer yes to every confirmation without prompting.
    pub assume_yes: bool,
}

impl TerminalSink {
    pub fn new(assume_yes: bool) -> Self {
        Self { assume_yes }
    }
}

impl RenderSink for TerminalSink {
    fn replace(&mut self, fragment: Fragment) {
        println!();
        print!("{fragment}");
    }

    fn append(&mut self, fragment: Fragment) {
        println!();
        print!("{fragment}");
    }

    fn set_controls(&mut self, controls: Controls) {
        tracing::debug!(
            label = controls.button_label(),
            input_enabled = controls.input_enabled(),
            "controls changed"
        );
    }

    fn confirm(&mut self, question: &str) -> bool {
        if self.assume_yes {
            return true;
        }

        match Confirm::new(question).with_default(false).prompt() {
            Ok(answer) => answer,
            Err(e) => {
                tracing::debug!("confirmation aborted: {e}");
                false
            }
        }
    }
}
