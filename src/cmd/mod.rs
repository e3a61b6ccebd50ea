pub mod fake;

use std::io;
use std::process::Command;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CmdError {
    #[error("empty command")]
    EmptyCommand,
    #[error("running `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: io::Error,
    },
    #[error("`{command}` failed ({status}): {stderr}")]
    Failed {
        command: String,
        status: String,
        stderr: String,
    },
    #[error("giving up after {tries} attempts: {last}")]
    Exhausted {
        tries: u32,
        #[source]
        last: Box<CmdError>,
    },
}

/// Runs an external command to completion and returns its standard output.
pub trait CmdRunner {
    fn run(&self, args: &[&str]) -> Result<String, CmdError>;
}

pub fn format_command(args: &[&str]) -> String {
    args.join(" ")
}

#[derive(Debug, Default, Copy, Clone)]
pub struct ExecCmdRunner;

impl ExecCmdRunner {
    pub fn new() -> Self {
        Self
    }
}

impl CmdRunner for ExecCmdRunner {
    fn run(&self, args: &[&str]) -> Result<String, CmdError> {
        let (program, rest) = args.split_first().ok_or(CmdError::EmptyCommand)?;
        let command = format_command(args);
        debug!("running `{}`", command);

        let output = Command::new(program)
            .args(rest)
            .output()
            .map_err(|source| CmdError::Spawn {
                command: command.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(CmdError::Failed {
                command,
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_owned(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_command() {
        crate::tests_init();

        assert!(matches!(
            ExecCmdRunner::new().run(&[]),
            Err(CmdError::EmptyCommand)
        ));
    }

    #[test]
    fn test_missing_program() {
        crate::tests_init();

        let r = ExecCmdRunner::new().run(&["partsync-no-such-program", "-m"]);
        match r {
            Err(CmdError::Spawn { command, .. }) => {
                assert_eq!(command, "partsync-no-such-program -m")
            }
            r => panic!("unexpected result {:?}", r),
        }
    }

    #[test]
    fn test_exhausted_message_keeps_last_error() {
        crate::tests_init();

        let e = CmdError::Exhausted {
            tries: 3,
            last: Box::new(CmdError::Failed {
                command: "parted -s /dev/sda rm 3".to_owned(),
                status: "exit status: 1".to_owned(),
                stderr: "device busy".to_owned(),
            }),
        };
        assert_eq!(
            e.to_string(),
            "giving up after 3 attempts: `parted -s /dev/sda rm 3` failed (exit status: 1): device busy"
        );
    }
}
