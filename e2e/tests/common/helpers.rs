//! Mocked process services for sequencer tests

use std::sync::{Arc, Mutex};

use e2e::traits::{MockCommandRunner, MockPortProbe, MockRunningProcess};
use e2e::{CommandOutcome, RunningProcess};

/// Ordered record of the commands the sequencer ran
#[derive(Clone, Default)]
pub struct EventLog(Arc<Mutex<Vec<String>>>);

impl EventLog {
    pub fn push(&self, event: impl Into<String>) {
        self.0.lock().unwrap().push(event.into());
    }

    pub fn events(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }

    pub fn contains(&self, event: &str) -> bool {
        self.0.lock().unwrap().iter().any(|e| e == event)
    }
}

/// Command runner and port probe mocks sharing one event log
pub struct ServiceMocks {
    pub log: EventLog,
    pub commands: MockCommandRunner,
    pub ports: MockPortProbe,
}

impl ServiceMocks {
    /// Every command succeeds except `playwright test`, which exits `test_exit`
    pub fn new(port_reachable: bool, test_exit: i32) -> Self {
        let log = EventLog::default();
        let mut commands = MockCommandRunner::new();
        let mut ports = MockPortProbe::new();

        let run_log = log.clone();
        commands.expect_run().returning(move |spec| {
            run_log.push(spec.display_command());
            let code = if spec.has_arg("test") { test_exit } else { 0 };
            Ok(CommandOutcome::exited(code))
        });

        let spawn_log = log.clone();
        commands.expect_spawn().returning(move |spec| {
            spawn_log.push(format!("spawn {}", spec.display_command()));
            let stop_log = spawn_log.clone();
            let mut process = MockRunningProcess::new();
            process.expect_id().return_const(Some(4321u32));
            process.expect_terminate().returning(move |_| {
                stop_log.push("terminate");
                Ok(())
            });
            Ok(Box::new(process) as Box<dyn RunningProcess>)
        });

        ports.expect_is_reachable().returning(move |_| Ok(port_reachable));

        Self { log, commands, ports }
    }
}
