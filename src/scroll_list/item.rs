//! Items and rendered item handles of the scroll list.
//!
//! Any `Display` value with a [`Keyed`] identity can be listed. When an item
//! scrolls into view it is rendered once into a [`TextHandle`]: its display
//! text split into lines, cut to the viewport width and styled. The number of
//! lines is the item's measured height.

use crate::error::BoxError;
use crate::windowed::{ItemHandle, Keyed};
use lipgloss_extras::lipgloss::width as lg_width;
use lipgloss_extras::prelude::*;
use std::fmt::Display;
use std::sync::{Arc, Mutex};
use unicode_width::UnicodeWidthChar;

/// Items that can be shown in a scroll list.
///
/// Implemented for every `Keyed + Display + Clone + Send` type.
pub trait Item: Keyed + Display + Clone + Send + 'static {}

impl<T: Keyed + Display + Clone + Send + 'static> Item for T {}

/// Rendering parameters shared between the list model and its item factory.
#[derive(Debug, Clone)]
pub(crate) struct RenderSettings {
    pub width: usize,
    pub item_style: Style,
}

pub(crate) type SharedSettings = Arc<Mutex<RenderSettings>>;

/// One item rendered into terminal lines.
#[derive(Debug, Clone)]
pub struct TextHandle {
    lines: Vec<String>,
    slot: Option<usize>,
}

impl TextHandle {
    /// Renders `text` into lines no wider than `width` (`0` means unbounded).
    pub fn render(text: &str, width: usize, style: &Style) -> Self {
        let lines = text
            .split('\n')
            .map(|line| {
                let line = line.trim_end_matches('\r');
                let cut = if width > 0 && lg_width(line) > width {
                    cut_to_width(line, width)
                } else {
                    line.to_string()
                };
                style.render(&cut)
            })
            .collect();
        Self { lines, slot: None }
    }

    /// Rendered lines, top to bottom.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Record position this handle was last attached at.
    pub fn slot(&self) -> Option<usize> {
        self.slot
    }
}

impl ItemHandle for TextHandle {
    fn measured_extent(&self) -> Option<usize> {
        match self.lines.len() {
            0 => None,
            n => Some(n),
        }
    }

    fn attach(&mut self, index: usize) {
        self.slot = Some(index);
    }

    fn destroy(self) {
        log::trace!("text handle at {:?} destroyed", self.slot);
    }
}

/// Builds the item factory used by the scroll list.
pub(crate) fn text_factory<I: Item>(
    settings: SharedSettings,
) -> impl FnMut(&I, usize) -> Result<TextHandle, BoxError> + Send + 'static {
    move |item: &I, _index: usize| -> Result<TextHandle, BoxError> {
        let settings = settings
            .lock()
            .map_err(|err| format!("render settings poisoned: {err}"))?;
        Ok(TextHandle::render(
            &item.to_string(),
            settings.width,
            &settings.item_style,
        ))
    }
}

/// Keeps the leading characters of `s` that fit in `width` columns.
fn cut_to_width(s: &str, width: usize) -> String {
    let mut out = String::new();
    let mut used = 0;
    for ch in s.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w > width {
            break;
        }
        used += w;
        out.push(ch);
    }
    out
}
