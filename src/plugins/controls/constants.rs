//! Shared styling constants for controls UI

use bevy::prelude::Color;

pub const BUTTON_BORDER_RADIUS_PX: f32 = 4.0;
pub const BUTTON_GAP_PX: f32 = 4.0;
pub const BUTTON_PADDING_PX: f32 = 4.0;
pub const BUTTON_WIDTH_PX: f32 = 200.0;

pub const BUTTON_COLOR_NORMAL: Color = Color::srgba(1.0, 1.0, 1.0, 0.05);
pub const BUTTON_COLOR_HOVERED: Color = Color::srgba(1.0, 1.0, 1.0, 0.15);
pub const BUTTON_COLOR_PRESSED: Color = Color::srgba(1.0, 1.0, 1.0, 0.25);
