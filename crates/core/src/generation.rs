use serde::{Deserialize, Serialize};

pub const GENERATION_MESSAGES: [&str; 5] = [
    "Analyzing your preferences...",
    "Finding the best activities...",
    "Optimizing your daily routes...",
    "Checking the local forecast...",
    "Finalizing your itinerary...",
];

/// Progress of the itinerary generation phase as shown to the user.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationStatus {
    pub is_generating: bool,
    pub progress: u8,
    pub message_index: usize,
}

impl GenerationStatus {
    pub fn started() -> Self {
        Self {
            is_generating: true,
            progress: 0,
            message_index: 0,
        }
    }

    /// Moves progress forward by `step` percent, saturating at 100. The
    /// message index follows progress in equal bands.
    pub fn advanced(self, step: u8) -> Self {
        let progress = self.progress.saturating_add(step.max(1)).min(100);
        let bands = GENERATION_MESSAGES.len();
        let message_index = (usize::from(progress) * bands / 100).min(bands - 1);
        Self {
            is_generating: self.is_generating,
            progress,
            message_index: message_index.max(self.message_index),
        }
    }

    pub fn is_complete(&self) -> bool {
        self.progress >= 100
    }

    pub fn finished() -> Self {
        Self {
            is_generating: false,
            progress: 100,
            message_index: GENERATION_MESSAGES.len() - 1,
        }
    }

    pub fn message(&self) -> &'static str {
        GENERATION_MESSAGES[self.message_index.min(GENERATION_MESSAGES.len() - 1)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advances_to_completion_in_fixed_steps() {
        let mut status = GenerationStatus::started();
        let mut ticks = 0;
        while !status.is_complete() {
            status = status.advanced(5);
            ticks += 1;
        }
        assert_eq!(ticks, 20);
        assert_eq!(status.progress, 100);
        assert_eq!(status.message(), "Finalizing your itinerary...");
    }

    #[test]
    fn message_index_never_moves_backwards() {
        let status = GenerationStatus::started().advanced(45);
        assert_eq!(status.message_index, 2);
        assert!(status.advanced(1).message_index >= 2);
    }

    #[test]
    fn zero_step_still_makes_progress() {
        assert_eq!(GenerationStatus::started().advanced(0).progress, 1);
    }
}
