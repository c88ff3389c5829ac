//! Calendar styles.
//!
//! The calendar reuses the picker's class prefix (`ant-picker` by default) and
//! hangs its own rules off `{componentCls}-calendar`. The tree covers:
//!
//! - the base rule with the component reset, background and header controls
//! - the `&-rtl` direction variant
//! - panel rules scoped under the calendar
//! - the `-mini` size variant
//! - the `-full` variant with hover, selected and today states
//! - a responsive branch below the `screenXS` breakpoint
//!
//! Selector suffixes are concatenated in a fixed order; downstream matching
//! relies on it (`&-in-view{componentCls}-cell-selected`, not the reverse).

use crate::derive::{Derivation, DerivedTokenCalculator};
use crate::error::TokenError;
use crate::registry::ComponentStyle;
use crate::style::{reset_component, MediaQuery, StyleNode};
use crate::theme::global_schema;
use crate::token::{TokenKind, TokenReader, TokenSchema, TokenSet};

/// Registry name of the calendar.
pub const CALENDAR: &str = "Calendar";

/// Class prefix the calendar is styled under unless told otherwise.
pub const DEFAULT_PREFIX: &str = "ant-picker";

/// Rows of events visible in a full-calendar cell.
pub const DATE_CONTENT_ROWS: u32 = 3;

/// The calendar's own tokens.
pub fn calendar_schema() -> TokenSchema {
    TokenSchema::new()
        .declare_all(
            ["yearControlWidth", "monthControlWidth", "miniContentHeight"],
            TokenKind::Number,
        )
        .declare_all(["fullBg", "fullPanelBg", "itemActiveBg"], TokenKind::String)
}

/// Default values for the calendar tokens, taken from the outer theme where
/// they follow a global token.
pub fn calendar_defaults(tokens: &TokenSet) -> TokenSet {
    let mut defaults = TokenSet::new()
        .with("yearControlWidth", 80)
        .with("monthControlWidth", 70)
        .with("miniContentHeight", 256);
    if let Some(bg) = tokens.get("colorBgContainer") {
        defaults = defaults
            .with("fullBg", bg.clone())
            .with("fullPanelBg", bg.clone());
    }
    if let Some(active) = tokens.get("controlItemBgActive") {
        defaults = defaults.with("itemActiveBg", active.clone());
    }
    defaults
}

/// Height of a full-calendar cell's content area holding `rows` lines.
///
/// `(fontSizeSM * lineHeightSM + marginXS) * rows + lineWidth * 2`
pub fn date_content_height(rows: u32) -> Derivation {
    let rows = f64::from(rows);
    Derivation::numeric(
        "dateContentHeight",
        &["fontSizeSM", "lineHeightSM", "marginXS", "lineWidth"],
        move |v| (v[0] * v[1] + v[2]) * rows + v[3] * 2.0,
    )
}

/// Derived calendar tokens.
pub fn calendar_derivations() -> DerivedTokenCalculator {
    DerivedTokenCalculator::new()
        .text("calendarCls", &["componentCls"], |v| format!("{}-calendar", v[0]))
        .text("pickerCellInnerCls", &["componentCls"], |v| {
            format!("{}-cell-inner", v[0])
        })
        .rule(Derivation::alias("dateValueHeight", "controlHeightSM"))
        .numeric("weekHeight", &["controlHeightSM"], |v| v[0] * 0.75)
        .rule(date_content_height(DATE_CONTENT_ROWS))
}

/// The calendar as a registrable component.
///
/// Theme overrides for the calendar may name its own tokens or any global
/// token; anything else is rejected at merge time.
pub fn calendar_component() -> ComponentStyle {
    ComponentStyle::new(CALENDAR, build_calendar_styles, calendar_defaults)
        .with_derivations(calendar_derivations())
        .with_schema(calendar_schema().extend(&global_schema()))
}

/// Builds the calendar style tree from fully resolved tokens.
pub fn build_calendar_styles(tokens: &TokenSet) -> Result<StyleNode, TokenError> {
    let t = tokens.reader(CALENDAR);
    let calendar_cls = t.text("calendarCls")?;
    let component_cls = t.text("componentCls")?;

    let margin_xs = t.number("marginXS")?;
    let padding_xs = t.number("paddingXS")?;
    let padding_sm = t.number("paddingSM")?;
    let line_type = t.text("lineType")?;
    let color_split = t.text("colorSplit")?;
    let color_text = t.text("colorText")?;
    let color_primary = t.text("colorPrimary")?;
    let full_bg = t.text("fullBg")?;
    let week_height = t.number("weekHeight")?;
    let radius_lg = t.number("borderRadiusLG")?;
    let motion_slow = t.text("motionDurationSlow")?;

    let header = format!("{}-header", calendar_cls);
    let year_select = format!("{}-year-select", calendar_cls);
    let month_select = format!("{}-month-select", calendar_cls);
    let mode_switch = format!("{}-mode-switch", calendar_cls);
    let date = format!("{}-date", calendar_cls);
    let date_value = format!("{}-date-value", calendar_cls);
    let date_and_today = format!("{}-date, {}-date-today", calendar_cls, calendar_cls);
    let panel = format!("{}-panel", component_cls);
    let body = format!("{}-body", component_cls);
    let content = format!("{}-content", component_cls);
    let cell = format!("{}-cell", component_cls);

    let base = StyleNode::new(calendar_cls)
        .props(reset_component(tokens)?)
        .prop("background", full_bg)
        .child(StyleNode::new("&-rtl").prop("direction", "rtl"))
        .child(
            StyleNode::new(&header)
                .prop("display", "flex")
                .prop("justifyContent", "flex-end")
                .prop("padding", format!("{}px 0", padding_sm))
                .child(StyleNode::new(&year_select).prop("minWidth", t.number("yearControlWidth")?))
                .child(
                    StyleNode::new(&month_select)
                        .prop("minWidth", t.number("monthControlWidth")?)
                        .prop("marginInlineStart", margin_xs),
                )
                .child(StyleNode::new(&mode_switch).prop("marginInlineStart", margin_xs)),
        );

    let scoped_panel = StyleNode::new(format!("{} {}", calendar_cls, panel))
        .prop("background", t.text("fullPanelBg")?)
        .prop("border", 0)
        .prop(
            "borderTop",
            format!("{}px {} {}", t.number("lineWidth")?, line_type, color_split),
        )
        .prop("borderRadius", 0)
        .child(
            StyleNode::new(format!("{}-month-panel, {}-date-panel", component_cls, component_cls))
                .prop("width", "auto"),
        )
        .child(StyleNode::new(&body).prop("padding", format!("{}px 0", padding_xs)))
        .child(StyleNode::new(&content).prop("width", "100%"));

    let mini = StyleNode::new(format!("{}-mini", calendar_cls))
        .prop("borderRadius", radius_lg)
        .child(
            StyleNode::new(&header)
                .prop("paddingInlineEnd", padding_xs)
                .prop("paddingInlineStart", padding_xs),
        )
        .child(
            StyleNode::new(&panel)
                .prop("borderRadius", format!("0 0 {}px {}px", radius_lg, radius_lg)),
        )
        .child(
            StyleNode::new(&content)
                .prop("height", t.number("miniContentHeight")?)
                .child(
                    StyleNode::new("th")
                        .prop("height", "auto")
                        .prop("padding", 0)
                        .prop("lineHeight", format!("{}px", week_height)),
                ),
        )
        .child(StyleNode::new(format!("{}::before", cell)).prop("pointerEvents", "none"));

    let full = StyleNode::new(format!("{}{}-full", calendar_cls, calendar_cls))
        .child(
            StyleNode::new(&panel)
                .prop("display", "block")
                .prop("width", "100%")
                .prop("textAlign", "end")
                .prop("background", full_bg)
                .prop("border", 0)
                .child(
                    StyleNode::new(&body)
                        .child(StyleNode::new("th, td").prop("padding", 0))
                        .child(
                            StyleNode::new("th")
                                .prop("height", "auto")
                                .prop("paddingInlineEnd", padding_sm)
                                .prop("paddingBottom", t.number("paddingXXS")?)
                                .prop("lineHeight", format!("{}px", week_height)),
                        ),
                ),
        )
        .child(full_cell_states(&t, &cell, &date, &date_value, &date_and_today, component_cls)?)
        .child(
            StyleNode::new(&date)
                .prop("display", "block")
                .prop("width", "auto")
                .prop("height", "auto")
                .prop("margin", format!("0 {}px", margin_xs / 2.0))
                .prop("padding", format!("{}px {}px 0", padding_xs / 2.0, padding_xs))
                .prop("border", 0)
                .prop(
                    "borderTop",
                    format!("{}px {} {}", t.number("lineWidthBold")?, line_type, color_split),
                )
                .prop("borderRadius", 0)
                .prop("transition", format!("background {}", motion_slow))
                .child(
                    StyleNode::new("&-value")
                        .prop("lineHeight", format!("{}px", t.number("dateValueHeight")?))
                        .prop("transition", format!("color {}", motion_slow)),
                )
                .child(
                    StyleNode::new("&-content")
                        .prop("position", "static")
                        .prop("width", "auto")
                        .prop("height", t.number("dateContentHeight")?)
                        .prop("overflowY", "auto")
                        .prop("color", color_text)
                        .prop("lineHeight", t.number("lineHeight")?)
                        .prop("textAlign", "start"),
                )
                .child(
                    StyleNode::new("&-today")
                        .prop("borderColor", color_primary)
                        .child(StyleNode::new(&date_value).prop("color", color_text)),
                ),
        );

    let responsive = StyleNode::new(calendar_cls).child(
        StyleNode::new(&header)
            .prop("display", "block")
            .child(StyleNode::new(&year_select).prop("width", "50%"))
            .child(
                StyleNode::new(&month_select).prop("width", format!("calc(50% - {}px)", padding_xs)),
            )
            .child(
                StyleNode::new(&mode_switch)
                    .prop("width", "100%")
                    .prop("marginTop", margin_xs)
                    .prop("marginInlineStart", 0)
                    .child(
                        StyleNode::new("> label")
                            .prop("width", "50%")
                            .prop("textAlign", "center"),
                    ),
            ),
    );

    Ok(StyleNode::root()
        .child(base)
        .child(scoped_panel)
        .child(mini)
        .child(full)
        .media(MediaQuery::MaxWidth(t.number("screenXS")?), vec![responsive]))
}

/// Hover, today and selected states of a full-calendar cell.
fn full_cell_states(
    t: &TokenReader<'_>,
    cell: &str,
    date: &str,
    date_value: &str,
    date_and_today: &str,
    component_cls: &str,
) -> Result<StyleNode, TokenError> {
    let calendar_cls = t.text("calendarCls")?;
    Ok(StyleNode::new(cell)
        .child(StyleNode::new("&::before").prop("display", "none"))
        .child(
            StyleNode::new("&:hover")
                .child(StyleNode::new(date).prop("background", t.text("controlItemBgHover")?)),
        )
        .child(StyleNode::new(format!("{}-date-today::before", calendar_cls)).prop("display", "none"))
        // selected
        .child(
            StyleNode::new(format!("&-in-view{}-cell-selected", component_cls)).child(
                StyleNode::new(date_and_today).prop("background", t.text("itemActiveBg")?),
            ),
        )
        .child(
            StyleNode::new("&-selected, &-selected:hover").child(
                StyleNode::new(date_and_today)
                    .child(StyleNode::new(date_value).prop("color", t.text("colorPrimary")?)),
            ),
        ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::PropValue;
    use crate::theme::default_tokens;

    fn resolved() -> TokenSet {
        calendar_component()
            .resolve_tokens(&default_tokens(), DEFAULT_PREFIX)
            .unwrap()
    }

    #[test]
    fn test_defaults_follow_theme() {
        let defaults = calendar_defaults(&default_tokens());
        assert_eq!(defaults.get_str("fullBg"), Some("#ffffff"));
        assert_eq!(defaults.get_str("itemActiveBg"), Some("#e6f4ff"));
        assert_eq!(defaults.get_number("yearControlWidth"), Some(80.0));
        assert_eq!(defaults.get_number("monthControlWidth"), Some(70.0));
        assert_eq!(defaults.get_number("miniContentHeight"), Some(256.0));
        assert!(calendar_schema().validate(&defaults).is_ok());
    }

    #[test]
    fn test_derived_tokens() {
        let tokens = resolved();
        assert_eq!(tokens.get_str("componentCls"), Some(".ant-picker"));
        assert_eq!(tokens.get_str("calendarCls"), Some(".ant-picker-calendar"));
        assert_eq!(tokens.get_str("pickerCellInnerCls"), Some(".ant-picker-cell-inner"));
        assert_eq!(tokens.get_number("dateValueHeight"), Some(24.0));
        assert_eq!(tokens.get_number("weekHeight"), Some(18.0));
    }

    #[test]
    fn test_content_height_scenario() {
        let tokens = TokenSet::new()
            .with("marginXS", 4)
            .with("fontSizeSM", 10)
            .with("lineHeightSM", 1.2)
            .with("lineWidth", 1);
        let value = date_content_height(3).evaluate(&tokens).unwrap();
        assert_eq!(value.as_number(), Some(50.0));
    }

    #[test]
    fn test_tree_top_level_order() {
        let tree = build_calendar_styles(&resolved()).unwrap();
        let selectors: Vec<&str> = tree.children().iter().map(|c| c.selector()).collect();
        assert_eq!(
            selectors,
            vec![
                ".ant-picker-calendar",
                ".ant-picker-calendar .ant-picker-panel",
                ".ant-picker-calendar-mini",
                ".ant-picker-calendar.ant-picker-calendar-full",
                "@media only screen and (max-width: 480px)",
            ]
        );
    }

    #[test]
    fn test_base_rule() {
        let tree = build_calendar_styles(&resolved()).unwrap();
        let base = tree.find(&[".ant-picker-calendar"]).unwrap();
        assert_eq!(base.property("background"), Some(&PropValue::from("#ffffff")));
        assert_eq!(base.property("boxSizing"), Some(&PropValue::from("border-box")));
        assert_eq!(
            base.find(&["&-rtl"]).unwrap().property("direction"),
            Some(&PropValue::from("rtl"))
        );

        let header = base.find(&[".ant-picker-calendar-header"]).unwrap();
        assert_eq!(header.property("padding"), Some(&PropValue::from("12px 0")));
        assert_eq!(
            header
                .find(&[".ant-picker-calendar-month-select"])
                .unwrap()
                .property("minWidth"),
            Some(&PropValue::Number(70.0))
        );
    }

    #[test]
    fn test_selected_state_selector_order() {
        let tree = build_calendar_styles(&resolved()).unwrap();
        let selected = tree
            .find(&[
                ".ant-picker-calendar.ant-picker-calendar-full",
                ".ant-picker-cell",
                "&-in-view.ant-picker-cell-selected",
                ".ant-picker-calendar-date, .ant-picker-calendar-date-today",
            ])
            .unwrap();
        assert_eq!(selected.property("background"), Some(&PropValue::from("#e6f4ff")));
    }

    #[test]
    fn test_full_date_rule() {
        let tree = build_calendar_styles(&resolved()).unwrap();
        let date = tree
            .find(&[
                ".ant-picker-calendar.ant-picker-calendar-full",
                ".ant-picker-calendar-date",
            ])
            .unwrap();
        assert_eq!(date.property("margin"), Some(&PropValue::from("0 4px")));
        assert_eq!(date.property("padding"), Some(&PropValue::from("4px 8px 0")));
        assert_eq!(
            date.property("borderTop"),
            Some(&PropValue::from("2px solid rgba(5, 5, 5, 0.06)"))
        );
        assert_eq!(
            date.find(&["&-value"]).unwrap().property("lineHeight"),
            Some(&PropValue::from("24px"))
        );
    }

    #[test]
    fn test_missing_token_fails_build() {
        let tokens = resolved().without("colorSplit");
        assert_eq!(
            build_calendar_styles(&tokens),
            Err(TokenError::MissingToken {
                token: "colorSplit".into(),
                required_by: CALENDAR.into(),
            })
        );
    }

    #[test]
    fn test_build_is_deterministic() {
        let tokens = resolved();
        assert_eq!(
            build_calendar_styles(&tokens).unwrap(),
            build_calendar_styles(&tokens).unwrap()
        );
    }
}
