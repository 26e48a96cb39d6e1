//! Help prompts -- the "which button does what" strip.
//!
//! Layers report raw prompts; [`aggregate_prompts`] removes duplicate icons,
//! merges the two d-pad axes into one prompt when they share an action, and
//! sorts the result into the fixed on-screen order. [`HelpBar`] draws it.

use std::collections::{HashMap, HashSet};

use crate::backend::{Color, Renderer};
use crate::error::Result;

pub const ICON_ALL_DIRECTIONS: &str = "up/down/left/right";
pub const ICON_UP_DOWN: &str = "up/down";
pub const ICON_LEFT_RIGHT: &str = "left/right";

/// Display order of known icon keys. Unknown keys rank with the first entry.
const ICON_ORDER: [&str; 11] = [
    ICON_ALL_DIRECTIONS,
    ICON_UP_DOWN,
    ICON_LEFT_RIGHT,
    "a",
    "b",
    "x",
    "y",
    "l",
    "r",
    "start",
    "select",
];

/// One input hint: an icon key (`"a"`, `"up/down"`, ...) and the action it
/// triggers.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HelpPrompt {
    pub icon: String,
    pub action: String,
}

impl HelpPrompt {
    pub fn new(icon: impl Into<String>, action: impl Into<String>) -> Self {
        Self {
            icon: icon.into(),
            action: action.into(),
        }
    }
}

/// Where and how the help strip is drawn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HelpStyle {
    /// Top-left corner as fractions of the screen size.
    pub origin: (f32, f32),
    pub text_color: Color,
    pub icon_color: Color,
    pub font_size: u16,
}

impl Default for HelpStyle {
    fn default() -> Self {
        Self {
            origin: (0.012, 0.9515),
            text_color: Color::from_rgba_u32(0x777777FF),
            icon_color: Color::from_rgba_u32(0x777777FF),
            font_size: 8,
        }
    }
}

fn icon_rank(icon: &str) -> usize {
    ICON_ORDER.iter().position(|k| *k == icon).unwrap_or(0)
}

fn is_axis_pair(a: &str, b: &str) -> bool {
    (a == ICON_UP_DOWN && b == ICON_LEFT_RIGHT) || (a == ICON_LEFT_RIGHT && b == ICON_UP_DOWN)
}

/// Deduplicate, merge and sort raw prompts.
///
/// - Only the first prompt for a given icon key survives.
/// - `up/down` and `left/right` bound to the same action collapse into one
///   `up/down/left/right` prompt at the position of the first of the two.
/// - The result is stably sorted: all directions, vertical, horizontal,
///   `a b x y l r`, `start select`.
pub fn aggregate_prompts(prompts: &[HelpPrompt]) -> Vec<HelpPrompt> {
    let mut out: Vec<HelpPrompt> = Vec::with_capacity(prompts.len());
    let mut seen_icons: HashSet<&str> = HashSet::new();
    let mut action_slot: HashMap<&str, usize> = HashMap::new();

    for prompt in prompts {
        if !seen_icons.insert(prompt.icon.as_str()) {
            continue;
        }
        match action_slot.get(prompt.action.as_str()) {
            Some(&slot) if is_axis_pair(&prompt.icon, &out[slot].icon) => {
                out[slot].icon = ICON_ALL_DIRECTIONS.to_string();
            },
            Some(_) => out.push(prompt.clone()),
            None => {
                action_slot.insert(prompt.action.as_str(), out.len());
                out.push(prompt.clone());
            },
        }
    }

    out.sort_by_key(|p| icon_rank(&p.icon));
    out
}

/// Short on-screen label for an icon key.
fn icon_label(icon: &str) -> String {
    match icon {
        ICON_ALL_DIRECTIONS => "DPAD".to_string(),
        ICON_UP_DOWN => "U/D".to_string(),
        ICON_LEFT_RIGHT => "L/R".to_string(),
        other => other.to_uppercase(),
    }
}

/// The help strip drawn along the bottom of the screen.
#[derive(Debug, Default)]
pub struct HelpBar {
    prompts: Vec<HelpPrompt>,
    style: HelpStyle,
}

impl HelpBar {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the shown prompts. Callers pass already-aggregated prompts.
    pub fn set(&mut self, prompts: Vec<HelpPrompt>, style: HelpStyle) {
        self.prompts = prompts;
        self.style = style;
    }

    pub fn clear(&mut self) {
        self.prompts.clear();
    }

    pub fn prompts(&self) -> &[HelpPrompt] {
        &self.prompts
    }

    pub fn style(&self) -> &HelpStyle {
        &self.style
    }

    /// Restyle from the theme without touching the prompts.
    pub fn set_style(&mut self, style: HelpStyle) {
        self.style = style;
    }

    pub fn render(&self, renderer: &mut dyn Renderer) -> Result<()> {
        if self.prompts.is_empty() {
            return Ok(());
        }
        let (sw, sh) = renderer.screen_size();
        let fs = self.style.font_size;
        let line_h = renderer.measure_text_height(fs);
        let pad = (line_h / 4).max(1);
        let mut x = (sw as f32 * self.style.origin.0) as i32;
        let y = (sh as f32 * self.style.origin.1) as i32 - line_h as i32 / 2;

        for prompt in &self.prompts {
            let label = icon_label(&prompt.icon);
            let icon_w = renderer.measure_text(&label, fs) + pad * 2;
            renderer.fill_rounded_rect(
                x,
                y - pad as i32,
                icon_w,
                line_h + pad * 2,
                pad as u16,
                self.style.icon_color.with_alpha(90),
            )?;
            renderer.draw_text(&label, x + pad as i32, y, fs, self.style.icon_color)?;
            x += (icon_w + pad) as i32;

            let action = prompt.action.to_uppercase();
            renderer.draw_text(&action, x, y, fs, self.style.text_color)?;
            x += (renderer.measure_text(&action, fs) + line_h) as i32;
        }
        Ok(())
    }
}
