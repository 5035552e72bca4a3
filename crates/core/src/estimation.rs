//! Credit cost estimation constants, types, and pure logic.
//!
//! The estimate gates the submit control client-side. It is advisory:
//! the backend re-prices every request authoritatively, so drift between
//! these constants and server pricing is an accepted, non-fatal error
//! class. The constants therefore live on a [`Pricing`] value that
//! callers may override rather than being baked into the functions.

use crate::error::CoreError;
use crate::media::GenerationMode;

// ---------------------------------------------------------------------------
// Pricing constants
// ---------------------------------------------------------------------------

/// Credits charged per generated image.
pub const IMAGE_UNIT_CREDITS: f64 = 10.0;
/// Credits charged per character of narrated scene content.
pub const AUDIO_CREDITS_PER_CHAR: f64 = 0.25;

// ---------------------------------------------------------------------------
// Pricing configuration
// ---------------------------------------------------------------------------

/// Client-side unit prices used for estimates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pricing {
    /// Flat price per image.
    pub image_unit: f64,
    /// Price per character of audio narration.
    pub audio_per_char: f64,
}

impl Default for Pricing {
    fn default() -> Self {
        Self {
            image_unit: IMAGE_UNIT_CREDITS,
            audio_per_char: AUDIO_CREDITS_PER_CHAR,
        }
    }
}

impl Pricing {
    /// Estimated cost of generating one image per item.
    pub fn image_cost(&self, item_count: usize) -> f64 {
        self.image_unit * item_count as f64
    }

    /// Estimated cost of narrating the given per-item character counts,
    /// rounded up to two decimal places. An empty item contributes 0.
    pub fn audio_cost(&self, char_counts: &[usize]) -> f64 {
        let total_chars: usize = char_counts.iter().sum();
        round_up_cents(self.audio_per_char * total_chars as f64)
    }

    /// Estimated cost of a batch in the given mode.
    ///
    /// `char_counts` carries one entry per selected scene; its length is
    /// the item count for image pricing.
    pub fn cost(&self, mode: GenerationMode, char_counts: &[usize]) -> f64 {
        match mode {
            GenerationMode::Image => self.image_cost(char_counts.len()),
            GenerationMode::Audio => self.audio_cost(char_counts),
            GenerationMode::Both => {
                self.image_cost(char_counts.len()) + self.audio_cost(char_counts)
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Rounding
// ---------------------------------------------------------------------------

/// Round a credit amount up to two decimal places.
pub fn round_up_cents(amount: f64) -> f64 {
    (amount * 100.0).ceil() / 100.0
}

// ---------------------------------------------------------------------------
// Balance gate
// ---------------------------------------------------------------------------

/// Check that the last known balance covers an estimated cost.
///
/// Runs before any network call; a failure here is a precondition error
/// surfaced inline with no server round-trip.
pub fn check_balance(available: f64, required: f64) -> Result<(), CoreError> {
    if available < required {
        return Err(CoreError::InsufficientCredits {
            required,
            available,
        });
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
