//! Display-ready table structures composed from normalized entities.

mod positions;

pub use positions::{compose_positions_table, PositionsTableVariant};

use crate::format::camel_case;
use crate::models::ValueStyle;

/// Highlight class for a table cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CellStyle {
    #[default]
    None,
    Gain,
    Loss,
    Breakeven,
}

impl From<ValueStyle> for CellStyle {
    fn from(style: ValueStyle) -> Self {
        match style {
            ValueStyle::Gain => CellStyle::Gain,
            ValueStyle::Loss => CellStyle::Loss,
            ValueStyle::Breakeven => CellStyle::Breakeven,
            ValueStyle::Unset => CellStyle::None,
        }
    }
}

/// One display-ready cell.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Cell {
    pub text: String,
    pub style: CellStyle,
}

impl Cell {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            style: CellStyle::None,
        }
    }

    pub fn styled(text: impl Into<String>, style: impl Into<CellStyle>) -> Self {
        Self {
            text: text.into(),
            style: style.into(),
        }
    }
}

/// A table column: stable id plus the camel-cased field name consumed by
/// the render layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub id: &'static str,
    pub name: String,
}

impl Column {
    pub fn from_id(id: &'static str) -> Self {
        Self {
            id,
            name: camel_case(id),
        }
    }
}

/// A composed table: fixed column ordering plus one row of cells per
/// entity.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DataTable {
    pub columns: Vec<Column>,
    pub rows: Vec<Vec<Cell>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_name_is_camel_cased_id() {
        let column = Column::from_id("col.date.open");
        assert_eq!(column.name, "colDateOpen");
    }

    #[test]
    fn test_cell_style_from_value_style() {
        assert_eq!(CellStyle::from(ValueStyle::Gain), CellStyle::Gain);
        assert_eq!(CellStyle::from(ValueStyle::Unset), CellStyle::None);
    }
}
