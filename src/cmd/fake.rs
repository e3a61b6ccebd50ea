use std::cell::RefCell;
use std::collections::HashMap;

use super::{format_command, CmdError, CmdRunner};

#[derive(Debug, Clone)]
pub enum FakeCmdResult {
    Stdout(String),
    Failure(String),
}

/// In-memory runner. Answers from canned results keyed by the space-joined
/// command line and records every argument vector it is asked to run.
/// Commands without a canned result succeed with empty output.
#[derive(Debug, Default)]
pub struct FakeCmdRunner {
    results: HashMap<String, FakeCmdResult>,
    commands: RefCell<Vec<Vec<String>>>,
}

impl FakeCmdRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_cmd_result(&mut self, command: &str, result: FakeCmdResult) {
        self.results.insert(command.to_owned(), result);
    }

    pub fn commands(&self) -> Vec<Vec<String>> {
        self.commands.borrow().clone()
    }
}

impl CmdRunner for FakeCmdRunner {
    fn run(&self, args: &[&str]) -> Result<String, CmdError> {
        if args.is_empty() {
            return Err(CmdError::EmptyCommand);
        }

        self.commands
            .borrow_mut()
            .push(args.iter().map(|x| x.to_string()).collect());

        let command = format_command(args);
        match self.results.get(&command) {
            Some(FakeCmdResult::Stdout(s)) => Ok(s.clone()),
            Some(FakeCmdResult::Failure(stderr)) => Err(CmdError::Failed {
                command,
                status: "exit status: 1".to_owned(),
                stderr: stderr.clone(),
            }),
            None => Ok(String::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_records_commands() {
        crate::tests_init();

        let mut runner = FakeCmdRunner::new();
        runner.add_cmd_result("echo a", FakeCmdResult::Stdout("a\n".to_owned()));
        runner.add_cmd_result("false", FakeCmdResult::Failure("nope".to_owned()));

        assert_eq!(runner.run(&["echo", "a"]).unwrap(), "a\n");
        assert_eq!(runner.run(&["true"]).unwrap(), "");
        assert!(runner.run(&["false"]).unwrap_err().to_string().contains("nope"));

        assert_eq!(
            runner.commands(),
            vec![
                vec!["echo".to_owned(), "a".to_owned()],
                vec!["true".to_owned()],
                vec!["false".to_owned()],
            ]
        );
    }
}
