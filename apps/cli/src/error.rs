use core_types::CoreError;
use data_loader::LoadError;
use scoring_engine::ScoringError;
use session_store::StoreError;

pub const EXIT_OK: i32 = 0;
pub const EXIT_SCORING: i32 = 1;
pub const EXIT_IO: i32 = 2;
pub const EXIT_INVALID_COMMAND: i32 = 3;
pub const EXIT_SESSION_NOT_FOUND: i32 = 4;

#[derive(Debug)]
pub struct CliError {
    pub code: i32,
    pub command: String,
    pub kind: String,
    pub message: String,
}

impl CliError {
    fn new(code: i32, cmd: &str, kind: &str, message: impl Into<String>) -> Self {
        Self {
            code,
            command: cmd.to_string(),
            kind: kind.to_string(),
            message: message.into(),
        }
    }

    pub fn invalid(cmd: &str, message: impl Into<String>) -> Self {
        Self::new(EXIT_INVALID_COMMAND, cmd, "InvalidCommand", message)
    }

    pub fn session_missing(cmd: &str, id: &str) -> Self {
        Self::new(
            EXIT_SESSION_NOT_FOUND,
            cmd,
            "SessionNotFound",
            format!("session not found: {id}"),
        )
    }

    pub fn io(cmd: &str, path: &str, err: std::io::Error) -> Self {
        Self::new(EXIT_IO, cmd, "IoError", format!("{path}: {err}"))
    }

    pub fn answers(cmd: &str, message: impl Into<String>) -> Self {
        Self::new(EXIT_SCORING, cmd, "AnswerError", message)
    }

    pub fn core(cmd: &str, err: CoreError) -> Self {
        match err {
            CoreError::MissingSet | CoreError::UnknownKind(_) | CoreError::UnknownSet(_) => {
                Self::invalid(cmd, err.to_string())
            }
            other => Self::new(EXIT_SCORING, cmd, "ScoringError", other.to_string()),
        }
    }

    pub fn load(cmd: &str, err: LoadError) -> Self {
        match err {
            LoadError::Selection(core) => Self::core(cmd, core),
            LoadError::NotFound { .. } => Self::new(EXIT_IO, cmd, "NotFound", err.to_string()),
            LoadError::Malformed { .. } => Self::new(EXIT_IO, cmd, "Malformed", err.to_string()),
            LoadError::Io { .. } => Self::new(EXIT_IO, cmd, "IoError", err.to_string()),
        }
    }

    pub fn scoring(cmd: &str, err: ScoringError) -> Self {
        match err {
            ScoringError::Session(core) => Self::core(cmd, core),
            other => Self::new(EXIT_SCORING, cmd, "ScoringError", other.to_string()),
        }
    }

    pub fn store(cmd: &str, err: StoreError) -> Self {
        match err {
            StoreError::InvalidId(_) => Self::invalid(cmd, err.to_string()),
            other => Self::new(EXIT_IO, cmd, "StoreError", other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use core_types::CoreError;
    use data_loader::LoadError;
    use session_store::StoreError;

    use super::{CliError, EXIT_INVALID_COMMAND, EXIT_IO, EXIT_SCORING};

    #[test]
    fn error_kinds_map_to_stable_exit_codes() {
        assert_eq!(
            CliError::load("score", LoadError::Selection(CoreError::MissingSet)).code,
            EXIT_INVALID_COMMAND
        );
        let missing = CliError::load(
            "score",
            LoadError::NotFound {
                path: "items_public_32.json".to_string(),
            },
        );
        assert_eq!((missing.code, missing.kind.as_str()), (EXIT_IO, "NotFound"));
        assert_eq!(
            CliError::core("score", CoreError::UnknownItem("Q9".to_string())).code,
            EXIT_SCORING
        );
        assert_eq!(
            CliError::store("show", StoreError::InvalidId("../x".to_string())).code,
            EXIT_INVALID_COMMAND
        );
    }
}
