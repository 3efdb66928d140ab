//! Process-level error type.
//!
//! The feature/cost engine is total and never fails; errors only come from the
//! edges (reading tables, writing outputs) and from an oversized cross join.
//! `dataset::CapacityError` stays typed inside the assembler and becomes an
//! `AppError` with `EXIT_CAPACITY` at the `?` in `app::pipeline::run_build`.
//! `main` turns `exit_code` into the process exit status.

/// Bad input files, unreadable CSV/JSON, failed writes.
pub const EXIT_IO: u8 = 2;
/// The road × weather cross join exceeds the configured row cap.
pub const EXIT_CAPACITY: u8 = 3;

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn io(message: impl Into<String>) -> Self {
        Self::new(EXIT_IO, message)
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_errors_carry_the_io_exit_code() {
        let err = AppError::io("Failed to open CSV 'roads.csv'");
        assert_eq!(err.exit_code(), EXIT_IO);
        assert_eq!(err.to_string(), "Failed to open CSV 'roads.csv'");
    }
}
