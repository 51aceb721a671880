//! A recording host for driving whole sessions in tests.

use rp_core::{Action, Host};

/// Records every emitted action; the session can be ended from the test.
#[derive(Debug, Default)]
pub struct ScriptedHost {
    pub actions: Vec<Action>,
    pub over: bool,
    /// End the session automatically after this many actions (0 = never).
    pub action_limit: usize,
}

impl ScriptedHost {
    pub fn new() -> Self {
        ScriptedHost::default()
    }

    pub fn with_limit(action_limit: usize) -> Self {
        ScriptedHost {
            action_limit,
            ..ScriptedHost::default()
        }
    }

    pub fn last(&self) -> Option<&Action> {
        self.actions.last()
    }
}

impl Host for ScriptedHost {
    fn emit(&mut self, action: Action) {
        self.actions.push(action);
        if self.action_limit > 0 && self.actions.len() >= self.action_limit {
            self.over = true;
        }
    }

    fn session_over(&self) -> bool {
        self.over
    }
}
