//! Slicing the rendered window into terminal rows.

use super::item::Item;
use super::Model;
use crate::windowed::SpacerKind;
use unicode_width::UnicodeWidthChar;

impl<I: Item> Model<I> {
    /// The rows currently on screen, top to bottom, without the frame.
    ///
    /// Rows covered by the top spacer come first, then the lines of the
    /// materialized items starting at the scroll offset. Rows past the last
    /// rendered line are spacer rows as well.
    pub fn visible_lines(&self) -> Vec<String> {
        let host = self.list.host();
        let rows = host.height;
        let top = self.list.top_spacer().height;

        let lead = top.saturating_sub(host.y_offset).min(rows);
        let skip = host.y_offset.saturating_sub(top);

        let mut lines = Vec::with_capacity(rows);
        lines.extend(std::iter::repeat_with(|| self.spacer_row()).take(lead));
        lines.extend(
            self.list
                .materialized()
                .flat_map(|(_, handle)| handle.lines().iter().cloned())
                .skip(skip)
                .take(rows - lead),
        );
        while lines.len() < rows {
            lines.push(self.spacer_row());
        }
        lines
    }

    fn spacer_row(&self) -> String {
        match self.list.config().spacer_kind {
            SpacerKind::Blank => String::new(),
            SpacerKind::Fill(ch) => {
                let width = self.list.host().width;
                if width == 0 {
                    return String::new();
                }
                let cell = ch.width().unwrap_or(1).max(1);
                self.styles
                    .spacer
                    .render(&ch.to_string().repeat(width / cell))
            }
        }
    }
}
