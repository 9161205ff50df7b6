//! Command definition

use plugsmith_foundation::{Error, Result};
use std::fmt;
use std::path::PathBuf;

/// An external command to run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    /// Program name or path
    pub program: String,

    /// Arguments
    pub args: Vec<String>,

    /// Working directory (inherits the parent's when `None`)
    pub cwd: Option<PathBuf>,

    /// Forward the child's stdout to ours; stderr is always forwarded
    pub forward_stdout: bool,
}

impl CommandSpec {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            cwd: None,
            forward_stdout: true,
        }
    }

    /// Build from an argv vector; the first element is the program
    pub fn from_argv(argv: Vec<String>) -> Result<Self> {
        let mut argv = argv.into_iter();
        let program = argv
            .next()
            .filter(|p| !p.is_empty())
            .ok_or_else(|| Error::Config("command template is empty".to_string()))?;
        Ok(Self::new(program).with_args(argv))
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn with_cwd(mut self, cwd: impl Into<PathBuf>) -> Self {
        self.cwd = Some(cwd.into());
        self
    }

    pub fn with_forward_stdout(mut self, forward: bool) -> Self {
        self.forward_stdout = forward;
        self
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}
