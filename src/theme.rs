//! Built-in color palettes, picked by the `[theme] scheme` preference.

use ratatui::style::Color;

/// All runtime colors used in the UI.
#[derive(Debug, Clone)]
pub struct ThemeColors {
    // Tree panel
    pub tree_fg: Color,
    pub tree_cursor_bg: Color,
    pub tree_cursor_fg: Color,
    pub tree_folder_fg: Color,
    pub tree_note_fg: Color,
    pub tree_connector_fg: Color,
    /// The note currently shown in the preview.
    pub tree_opened_fg: Color,

    // Preview panel
    pub preview_fg: Color,
    pub preview_gutter_fg: Color,

    // Status bar
    pub status_bg: Color,
    pub status_fg: Color,

    // Borders & chrome
    pub border_fg: Color,
    pub border_focused_fg: Color,
    pub dialog_border_fg: Color,

    // Semantic
    pub error_fg: Color,
    pub success_fg: Color,
    pub info_fg: Color,
    pub dim_fg: Color,
}

/// Dark palette (Catppuccin Mocha).
pub fn dark_theme() -> ThemeColors {
    ThemeColors {
        tree_fg: Color::Rgb(205, 214, 244),           // text
        tree_cursor_bg: Color::Rgb(69, 71, 90),       // surface1
        tree_cursor_fg: Color::Rgb(205, 214, 244),
        tree_folder_fg: Color::Rgb(137, 180, 250),    // blue
        tree_note_fg: Color::Rgb(205, 214, 244),
        tree_connector_fg: Color::Rgb(88, 91, 112),   // surface2
        tree_opened_fg: Color::Rgb(203, 166, 247),    // mauve

        preview_fg: Color::Rgb(205, 214, 244),
        preview_gutter_fg: Color::Rgb(108, 112, 134), // overlay0

        status_bg: Color::Rgb(30, 30, 46),            // base
        status_fg: Color::Rgb(205, 214, 244),

        border_fg: Color::Rgb(88, 91, 112),
        border_focused_fg: Color::Rgb(137, 180, 250),
        dialog_border_fg: Color::Rgb(137, 180, 250),

        error_fg: Color::Rgb(243, 139, 168),          // red
        success_fg: Color::Rgb(166, 227, 161),        // green
        info_fg: Color::Rgb(137, 180, 250),
        dim_fg: Color::Rgb(108, 112, 134),
    }
}

/// Light palette (Catppuccin Latte).
pub fn light_theme() -> ThemeColors {
    ThemeColors {
        tree_fg: Color::Rgb(76, 79, 105),             // text
        tree_cursor_bg: Color::Rgb(204, 208, 218),    // surface1
        tree_cursor_fg: Color::Rgb(76, 79, 105),
        tree_folder_fg: Color::Rgb(30, 102, 245),     // blue
        tree_note_fg: Color::Rgb(76, 79, 105),
        tree_connector_fg: Color::Rgb(172, 176, 190), // surface2
        tree_opened_fg: Color::Rgb(136, 57, 239),     // mauve

        preview_fg: Color::Rgb(76, 79, 105),
        preview_gutter_fg: Color::Rgb(156, 160, 176), // overlay0

        status_bg: Color::Rgb(239, 241, 245),         // base
        status_fg: Color::Rgb(76, 79, 105),

        border_fg: Color::Rgb(172, 176, 190),
        border_focused_fg: Color::Rgb(30, 102, 245),
        dialog_border_fg: Color::Rgb(30, 102, 245),

        error_fg: Color::Rgb(210, 15, 57),            // red
        success_fg: Color::Rgb(64, 160, 43),          // green
        info_fg: Color::Rgb(30, 102, 245),
        dim_fg: Color::Rgb(156, 160, 176),
    }
}

/// Palette for a scheme name. Unknown names fall back to dark.
pub fn resolve_theme(scheme: &str) -> ThemeColors {
    match scheme {
        "light" => light_theme(),
        _ => dark_theme(),
    }
}
