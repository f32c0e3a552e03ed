//! Credit ledger error types.

/// Error kinds for credit operations.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum CreditErrorKind {
    /// Balance too low for the requested reservation.
    #[display("Insufficient credits: {required} required, {available} available")]
    InsufficientCredits {
        /// Credits the tool costs
        required: u32,
        /// Credits left on the account
        available: u32,
    },
    /// Daily usage limit reached.
    #[display("Daily limit of {_0} generations reached")]
    DailyLimitReached(u32),
    /// Account not known to the ledger.
    #[display("Unknown account: {_0}")]
    UnknownAccount(String),
    /// Ledger backend failed.
    #[display("Ledger unavailable: {_0}")]
    Unavailable(String),
}

impl CreditErrorKind {
    /// Message shown to the user.
    pub fn user_message(&self) -> String {
        match self {
            CreditErrorKind::InsufficientCredits {
                required,
                available,
            } => format!(
                "This tool needs {} credits but your balance is {}. Please top up to continue.",
                required, available
            ),
            CreditErrorKind::DailyLimitReached(limit) => format!(
                "You have used all {} free generations for today. Come back tomorrow or upgrade.",
                limit
            ),
            _ => "We could not verify your credit balance. Please refresh and try again."
                .to_string(),
        }
    }
}

/// Credit error with location tracking.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Credit Error: {} at line {} in {}", kind, line, file)]
pub struct CreditError {
    kind: CreditErrorKind,
    line: u32,
    file: &'static str,
}

impl CreditError {
    /// Create a new credit error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: CreditErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Get the error kind.
    pub fn kind(&self) -> &CreditErrorKind {
        &self.kind
    }
}

impl From<CreditErrorKind> for CreditError {
    #[track_caller]
    fn from(kind: CreditErrorKind) -> Self {
        Self::new(kind)
    }
}
