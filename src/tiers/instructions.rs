//! Supplemental instruction port (tool-protocol servers and similar).

/// Yields supplemental instruction text appended to the project tier.
///
/// The text carries no source path and is never tracked for deduplication.
pub trait InstructionSource: Send + Sync {
    fn instructions(&self) -> String;
}

/// Fixed supplemental text
#[derive(Debug, Clone, Default)]
pub struct StaticInstructions(String);

impl StaticInstructions {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }
}

impl InstructionSource for StaticInstructions {
    fn instructions(&self) -> String {
        self.0.clone()
    }
}
