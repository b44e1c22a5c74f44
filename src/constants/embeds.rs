use serenity::all::{Colour, CreateEmbed, UserId};

// ============================================================================
// Color Palette
// ============================================================================

/// Success color - Emerald green
pub const SUCCESS_COLOR: Colour = Colour::from_rgb(16, 185, 129);

/// Error color - Rose red
pub const ERROR_COLOR: Colour = Colour::from_rgb(244, 63, 94);

/// Warning color - Amber
pub const WARNING_COLOR: Colour = Colour::from_rgb(245, 158, 11);

// ============================================================================
// Embed Builders
// ============================================================================

/// Create a success embed
pub fn success_embed() -> CreateEmbed {
    CreateEmbed::new().color(SUCCESS_COLOR)
}

/// Create an error embed
pub fn error_embed() -> CreateEmbed {
    CreateEmbed::new().color(ERROR_COLOR)
}

/// Create a warning embed
pub fn warning_embed() -> CreateEmbed {
    CreateEmbed::new().color(WARNING_COLOR)
}

/// Alert posted to a guild's log channel when a global ban could not be applied there
pub fn failed_ban_alert(target: UserId, reason: &str) -> CreateEmbed {
    error_embed()
        .title("Global Ban Failed")
        .description(format!(
            "I tried to globally ban <@{}> ({}) here but the ban failed. \
             Please check my permissions and ban them manually.",
            target, target
        ))
        .field("Reason", reason, false)
}
