use console::Style;
use once_cell::sync::Lazy;

/// Terminal styles used by the renderer.
pub struct ShopTheme {
    pub header: Style,
    pub dim: Style,
    pub label: Style,
    pub info: Style,
    pub success: Style,
    pub warning: Style,
    pub error: Style,
}

pub static SHOP_THEME: Lazy<ShopTheme> = Lazy::new(|| ShopTheme {
    header: Style::new().bold(),
    dim: Style::new().color256(246),
    label: Style::new().cyan(),
    info: Style::new().dim(),
    success: Style::new().green(),
    warning: Style::new().yellow(),
    error: Style::new().red(),
});
