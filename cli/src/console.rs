//! Console observer: prints debate progress as it streams.

use podium_application::SessionObserver;
use podium_domain::{Participant, Stage};
use std::io::Write;

/// Prints each turn's tokens as they arrive, with stage banners.
pub struct ConsoleObserver {
    /// Also print reasoning tokens (dimmed would need a TTY check;
    /// plain prefix keeps piping clean)
    show_thinking: bool,
}

impl ConsoleObserver {
    pub fn new() -> Self {
        Self {
            show_thinking: false,
        }
    }

    pub fn with_thinking(mut self, show: bool) -> Self {
        self.show_thinking = show;
        self
    }
}

impl Default for ConsoleObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionObserver for ConsoleObserver {
    fn on_stage_changed(&self, stage: Stage) {
        println!();
        println!("=== {} ===", stage.display_name());
    }

    fn on_turn_start(&self, participant: &Participant, _stage: Stage) {
        println!();
        println!("[{} — {}]", participant.display_name, participant.role);
    }

    fn on_token(&self, chunk: &str) {
        print!("{}", chunk);
        let _ = std::io::stdout().flush();
    }

    fn on_thinking(&self, chunk: &str) {
        if self.show_thinking {
            print!("{}", chunk);
            let _ = std::io::stdout().flush();
        }
    }

    fn on_turn_committed(&self, _participant: &Participant) {
        println!();
    }

    fn on_debate_complete(&self) {
        println!();
        println!("=== Debate complete ===");
    }
}
