//! Task id color management for terminal output

use colored::Color;

/// Get a consistent color for a task id
pub fn get_task_color(task_id: &str) -> Color {
    // Stable byte fold so the same id always gets the same color
    let hash = task_id
        .bytes()
        .fold(0u64, |acc, b| acc.wrapping_mul(131).wrapping_add(b as u64));

    // Label colors that stay distinct from the red/green status tags
    let colors = [
        Color::TrueColor {
            r: 102,
            g: 153,
            b: 255,
        }, // cornflower
        Color::TrueColor {
            r: 0,
            g: 191,
            b: 165,
        }, // teal
        Color::TrueColor {
            r: 186,
            g: 104,
            b: 200,
        }, // orchid
        Color::TrueColor {
            r: 255,
            g: 167,
            b: 38,
        }, // amber
        Color::TrueColor {
            r: 77,
            g: 182,
            b: 172,
        }, // sea green
    ];

    colors[(hash % colors.len() as u64) as usize]
}
