use std::process::ExitCode;

/// Process exit status of a `glotx` command.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ExitStatus {
    /// Nothing left to do: changes were applied, or no match was found.
    Success,
    /// A dry run found changes to apply, or `init` found an existing config.
    Failure,
    /// A file or the configuration could not be processed.
    Error,
}

impl ExitStatus {
    pub fn code(self) -> u8 {
        match self {
            ExitStatus::Success => 0,
            ExitStatus::Failure => 1,
            ExitStatus::Error => 2,
        }
    }
}

impl From<ExitStatus> for ExitCode {
    fn from(status: ExitStatus) -> Self {
        ExitCode::from(status.code())
    }
}
