use std::fmt;
use std::io;

use dpllsat::SolverError;

/// Everything that can go wrong on the CLI path: reading the input file, parsing it as
/// DIMACS CNF, or handing the parsed clauses to the solver core.
#[derive(Debug)]
pub enum CliError {
    Io(io::Error),
    /// A DIMACS syntax error, with the 1-based line number it was found on.
    Dimacs { line: u32, message: String },
    Solver(SolverError),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Io(e) => write!(f, "{}", e),
            CliError::Dimacs { line, message } => write!(f, "line {}: {}", line, message),
            CliError::Solver(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Io(e) => Some(e),
            CliError::Solver(e) => Some(e),
            CliError::Dimacs { .. } => None,
        }
    }
}

impl From<io::Error> for CliError {
    fn from(e: io::Error) -> Self {
        CliError::Io(e)
    }
}

impl From<SolverError> for CliError {
    fn from(e: SolverError) -> Self {
        CliError::Solver(e)
    }
}
