//! Variables pane rendering
//!
//! Shows every variable visible at the current step, one per row, with its
//! printed value and a right-aligned type annotation. Values that differ
//! from the previous step are highlighted.

use crate::snapshot::VariableView;
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem},
    Frame,
};
use std::collections::BTreeMap;

/// Data needed to render the variables pane
pub struct VariablesRenderData<'a> {
    pub variables: Option<&'a BTreeMap<String, VariableView>>,
    /// Variables at the previous step, for change highlighting
    pub previous: Option<&'a BTreeMap<String, VariableView>>,
}

/// Style a printed value by the type it belongs to
fn value_style(view: &VariableView) -> Style {
    if view.value == "unset" {
        return Style::default().fg(DEFAULT_THEME.comment);
    }
    match view.var_type.as_str() {
        "INTEGER" | "REAL" | "BOOLEAN" => Style::default().fg(DEFAULT_THEME.number),
        "STRING" | "CHAR" => Style::default().fg(DEFAULT_THEME.string),
        _ => Style::default().fg(DEFAULT_THEME.fg),
    }
}

/// Render the variables pane
pub fn render_variables_pane(
    frame: &mut Frame,
    area: Rect,
    data: VariablesRenderData,
    is_focused: bool,
    scroll_offset: &mut usize,
) {
    let border_style = if is_focused {
        Style::default()
            .fg(DEFAULT_THEME.border_focused)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(DEFAULT_THEME.border_normal)
    };

    let block = Block::default()
        .title(" Variables ")
        .borders(Borders::ALL)
        .border_style(border_style);

    let content_width = area.width.saturating_sub(2) as usize;

    let all_items: Vec<ListItem> = match data.variables {
        Some(variables) if !variables.is_empty() => variables
            .iter()
            .map(|(name, view)| {
                let changed = data
                    .previous
                    .is_some_and(|previous| previous.get(name) != Some(view));

                let name_style = if changed {
                    Style::default()
                        .fg(DEFAULT_THEME.changed)
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(DEFAULT_THEME.fg)
                };

                let left = format!(" {} = {}", name, view.value);
                let padding = content_width
                    .saturating_sub(left.chars().count() + view.var_type.chars().count() + 1);

                ListItem::new(Line::from(vec![
                    Span::styled(format!(" {}", name), name_style),
                    Span::styled(" = ", Style::default().fg(DEFAULT_THEME.comment)),
                    Span::styled(view.value.clone(), value_style(view)),
                    Span::raw(" ".repeat(padding)),
                    Span::styled(
                        view.var_type.clone(),
                        Style::default().fg(DEFAULT_THEME.type_name),
                    ),
                ]))
            })
            .collect(),
        _ => vec![ListItem::new("(no variables)").style(Style::default().fg(DEFAULT_THEME.comment))],
    };

    let total_items = all_items.len();
    let visible_height = area.height.saturating_sub(2).max(1) as usize;

    if total_items > visible_height {
        *scroll_offset = (*scroll_offset).min(total_items - visible_height);
    } else {
        *scroll_offset = 0;
    }

    let visible_items: Vec<ListItem> = all_items
        .into_iter()
        .skip(*scroll_offset)
        .take(visible_height)
        .collect();

    frame.render_widget(List::new(visible_items).block(block), area);
}
