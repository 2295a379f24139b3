//! Declarative cell styling for the Excel report
//!
//! Three rules are applied in order (header, summary, body). A rule only
//! overrides the attributes it sets, so a summary cell ends up with the summary
//! fill and font plus the body alignment and border.

use rust_xlsxwriter::{Color, Format, FormatAlign, FormatBorder, FormatPattern};

use super::aggregate::SUMMARY_ROW_COUNT;

pub const HEADER_FILL: u32 = 0x4F81BD;
pub const SUMMARY_FILL: u32 = 0xFFFF00;
pub const WHITE: u32 = 0xFFFFFF;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Center,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Border {
    Thin,
}

/// Resolved style of a single cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CellStyle {
    pub bold: bool,
    pub font_color: Option<u32>,
    pub fill: Option<u32>,
    pub align: Option<Align>,
    pub border: Option<Border>,
}

/// Attributes a rule sets; `None` leaves the current value alone
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StylePatch {
    pub bold: Option<bool>,
    pub font_color: Option<Option<u32>>,
    pub fill: Option<u32>,
    pub align: Option<Align>,
    pub border: Option<Border>,
}

impl StylePatch {
    fn apply(&self, style: &mut CellStyle) {
        if let Some(bold) = self.bold {
            style.bold = bold;
        }
        if let Some(color) = self.font_color {
            style.font_color = color;
        }
        if let Some(fill) = self.fill {
            style.fill = Some(fill);
        }
        if let Some(align) = self.align {
            style.align = Some(align);
        }
        if let Some(border) = self.border {
            style.border = Some(border);
        }
    }
}

/// Which rows of the sheet a rule targets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowTarget {
    /// First sheet row
    Header,
    /// The trailing Total and Average rows
    Summary,
    /// Every row below the header, summary rows included
    Body,
}

impl RowTarget {
    /// `row` is zero-based over the whole sheet, `row_count` includes the header
    pub fn matches(&self, row: u32, row_count: u32) -> bool {
        match self {
            RowTarget::Header => row == 0,
            RowTarget::Summary => {
                let first = row_count.saturating_sub(SUMMARY_ROW_COUNT as u32);
                row >= first.max(1) && row < row_count
            }
            RowTarget::Body => row >= 1 && row < row_count,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StyleRule {
    pub target: RowTarget,
    pub patch: StylePatch,
}

pub fn header_rule() -> StyleRule {
    StyleRule {
        target: RowTarget::Header,
        patch: StylePatch {
            bold: Some(true),
            font_color: Some(Some(WHITE)),
            fill: Some(HEADER_FILL),
            align: Some(Align::Center),
            border: Some(Border::Thin),
        },
    }
}

pub fn summary_rule() -> StyleRule {
    StyleRule {
        target: RowTarget::Summary,
        patch: StylePatch {
            bold: Some(true),
            // Summary font replaces the whole font, colour included
            font_color: Some(None),
            fill: Some(SUMMARY_FILL),
            border: Some(Border::Thin),
            ..Default::default()
        },
    }
}

pub fn body_rule() -> StyleRule {
    StyleRule {
        target: RowTarget::Body,
        patch: StylePatch {
            align: Some(Align::Center),
            border: Some(Border::Thin),
            ..Default::default()
        },
    }
}

/// The report's rules in application order
#[derive(Debug, Clone)]
pub struct StyleSheet {
    rules: Vec<StyleRule>,
}

impl Default for StyleSheet {
    fn default() -> Self {
        Self {
            rules: vec![header_rule(), summary_rule(), body_rule()],
        }
    }
}

impl StyleSheet {
    pub fn rules(&self) -> &[StyleRule] {
        &self.rules
    }

    pub fn resolve(&self, row: u32, row_count: u32) -> CellStyle {
        let mut style = CellStyle::default();
        for rule in self.rules.iter().filter(|r| r.target.matches(row, row_count)) {
            rule.patch.apply(&mut style);
        }
        style
    }
}

impl CellStyle {
    pub fn to_format(&self) -> Format {
        let mut format = Format::new();
        if self.bold {
            format = format.set_bold();
        }
        if let Some(color) = self.font_color {
            format = format.set_font_color(Color::RGB(color));
        }
        if let Some(fill) = self.fill {
            format = format
                .set_pattern(FormatPattern::Solid)
                .set_background_color(Color::RGB(fill));
        }
        if let Some(Align::Center) = self.align {
            format = format.set_align(FormatAlign::Center);
        }
        if let Some(Border::Thin) = self.border {
            format = format.set_border(FormatBorder::Thin);
        }
        format
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // header + 2 data rows + 2 summary rows
    const ROWS: u32 = 5;

    #[test]
    fn test_header_style() {
        let style = StyleSheet::default().resolve(0, ROWS);
        assert_eq!(
            style,
            CellStyle {
                bold: true,
                font_color: Some(WHITE),
                fill: Some(HEADER_FILL),
                align: Some(Align::Center),
                border: Some(Border::Thin),
            }
        );
    }

    #[test]
    fn test_body_style() {
        let sheet = StyleSheet::default();
        for row in 1..3 {
            assert_eq!(
                sheet.resolve(row, ROWS),
                CellStyle {
                    bold: false,
                    font_color: None,
                    fill: None,
                    align: Some(Align::Center),
                    border: Some(Border::Thin),
                }
            );
        }
    }

    #[test]
    fn test_summary_rows_get_both_passes() {
        let sheet = StyleSheet::default();
        for row in 3..5 {
            assert_eq!(
                sheet.resolve(row, ROWS),
                CellStyle {
                    bold: true,
                    font_color: None,
                    fill: Some(SUMMARY_FILL),
                    align: Some(Align::Center),
                    border: Some(Border::Thin),
                }
            );
        }
    }

    #[test]
    fn test_summary_never_covers_header() {
        // Empty input: header followed directly by the two summary rows
        assert!(!RowTarget::Summary.matches(0, 3));
        assert!(RowTarget::Summary.matches(1, 3));
        assert!(RowTarget::Summary.matches(2, 3));
        assert!(!RowTarget::Summary.matches(3, 3));
    }

    #[test]
    fn test_rules_in_fixed_order() {
        let targets: Vec<_> = StyleSheet::default().rules().iter().map(|r| r.target).collect();
        assert_eq!(targets, vec![RowTarget::Header, RowTarget::Summary, RowTarget::Body]);
    }
}
