use std::{error, fmt, result};

use crate::cmd::{format_command, CmdError, CmdRunner};
use crate::{Error, Result};

/// Last error of an operation that failed on every attempt.
#[derive(Debug)]
pub struct Exhausted<E> {
    pub tries: u32,
    pub last: E,
}

impl<E: fmt::Display> fmt::Display for Exhausted<E> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "giving up after {} attempts: {}", self.tries, self.last)
    }
}

impl<E: error::Error + 'static> error::Error for Exhausted<E> {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        Some(&self.last)
    }
}

#[derive(Debug, Copy, Clone)]
pub struct Retry {
    max_tries: u32,
}

impl Retry {
    pub fn new(max_tries: u32) -> Result<Self> {
        if max_tries < 1 {
            return Err(Error::InvalidMaxTries);
        }

        Ok(Self { max_tries })
    }

    #[inline]
    pub fn max_tries(&self) -> u32 {
        self.max_tries
    }

    pub fn run<T, E, F>(&self, what: &str, mut op: F) -> result::Result<T, Exhausted<E>>
    where
        E: fmt::Display,
        F: FnMut() -> result::Result<T, E>,
    {
        let mut attempt = 1;
        loop {
            match op() {
                Ok(x) => return Ok(x),
                Err(e) => {
                    warn!(
                        "{} failed with error '{}', attempt {} out of {}",
                        what, e, attempt, self.max_tries
                    );
                    if attempt >= self.max_tries {
                        return Err(Exhausted {
                            tries: attempt,
                            last: e,
                        });
                    }
                }
            }
            attempt += 1;
        }
    }
}

fn always(_: &[&str]) -> bool {
    true
}

/// Retries commands of the wrapped runner; all of them unless narrowed
/// with `retry_only`.
pub struct RetryingCmdRunner<R: CmdRunner> {
    inner: R,
    retry: Retry,
    retry_if: fn(&[&str]) -> bool,
}

impl<R: CmdRunner> RetryingCmdRunner<R> {
    pub fn new(inner: R, max_tries: u32) -> Result<Self> {
        Ok(Self {
            inner,
            retry: Retry::new(max_tries)?,
            retry_if: always,
        })
    }

    /// Commands rejected by `retry_if` run exactly once.
    pub fn retry_only(mut self, retry_if: fn(&[&str]) -> bool) -> Self {
        self.retry_if = retry_if;
        self
    }

    pub fn inner(&self) -> &R {
        &self.inner
    }
}

impl<R: CmdRunner> CmdRunner for RetryingCmdRunner<R> {
    fn run(&self, args: &[&str]) -> result::Result<String, CmdError> {
        if !(self.retry_if)(args) {
            return self.inner.run(args);
        }

        let what = format!("`{}`", format_command(args));
        self.retry
            .run(&what, || self.inner.run(args))
            .map_err(|e| CmdError::Exhausted {
                tries: e.tries,
                last: Box::new(e.last),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cmd::fake::{FakeCmdResult, FakeCmdRunner};
    use crate::part::parted::is_print_command;
    use std::cell::Cell;

    #[test]
    fn test_zero_tries_rejected() {
        crate::tests_init();

        assert!(matches!(Retry::new(0), Err(Error::InvalidMaxTries)));
        assert_eq!(Retry::new(1).unwrap().max_tries(), 1);
    }

    #[test]
    fn test_stops_on_first_success() {
        crate::tests_init();

        let calls = Cell::new(0);
        let r = Retry::new(5).unwrap().run("flaky", || {
            calls.set(calls.get() + 1);
            if calls.get() < 3 {
                Err("not yet")
            } else {
                Ok(calls.get())
            }
        });

        assert_eq!(r.unwrap(), 3);
        assert_eq!(calls.get(), 3);
    }

    #[test]
    fn test_returns_last_error() {
        crate::tests_init();

        let calls = Cell::new(0);
        let r: result::Result<(), _> = Retry::new(3).unwrap().run("broken", || {
            calls.set(calls.get() + 1);
            Err(format!("failure {}", calls.get()))
        });

        let e = r.unwrap_err();
        assert_eq!(e.tries, 3);
        assert_eq!(e.last, "failure 3");
        assert_eq!(e.to_string(), "giving up after 3 attempts: failure 3");
    }

    #[test]
    fn test_retrying_runner() {
        crate::tests_init();

        let mut fake = FakeCmdRunner::new();
        fake.add_cmd_result(
            "parted -s /dev/sda rm 3",
            FakeCmdResult::Failure("fake-parted-error".to_owned()),
        );
        let runner = RetryingCmdRunner::new(fake, 2).unwrap();

        assert!(runner.run(&["parted", "-m", "/dev/sda"]).is_ok());
        let e = runner.run(&["parted", "-s", "/dev/sda", "rm", "3"]).unwrap_err();
        assert!(matches!(e, CmdError::Exhausted { tries: 2, .. }));
        assert!(e.to_string().contains("fake-parted-error"));
        assert_eq!(runner.inner().commands().len(), 3);
    }

    #[test]
    fn test_retrying_runner_skips_mutating_commands() {
        crate::tests_init();

        let mut fake = FakeCmdRunner::new();
        fake.add_cmd_result(
            "parted -m /dev/sda unit B print",
            FakeCmdResult::Failure("fake-parted-error".to_owned()),
        );
        fake.add_cmd_result(
            "parted -s /dev/sda rm 3",
            FakeCmdResult::Failure("fake-parted-error".to_owned()),
        );
        let runner = RetryingCmdRunner::new(fake, 3)
            .unwrap()
            .retry_only(is_print_command);

        let e = runner.run(&["parted", "-s", "/dev/sda", "rm", "3"]).unwrap_err();
        assert!(matches!(e, CmdError::Failed { .. }));
        assert_eq!(runner.inner().commands().len(), 1);

        let e = runner
            .run(&["parted", "-m", "/dev/sda", "unit", "B", "print"])
            .unwrap_err();
        assert!(matches!(e, CmdError::Exhausted { tries: 3, .. }));
        assert_eq!(runner.inner().commands().len(), 4);
    }
}
