use serde::{Deserialize, Serialize};
use std::fmt;

/// 字幕樣式名稱
///
/// 封閉列舉，未知名稱一律退回 `Modern`，不會因為外觀參數而中斷合成
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum CaptionStyle {
    #[default]
    Modern,
    Bold,
    Minimal,
    Gaming,
}

impl CaptionStyle {
    pub const ALL: [Self; 4] = [Self::Modern, Self::Bold, Self::Minimal, Self::Gaming];

    #[must_use]
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_lowercase().as_str() {
            "bold" => Self::Bold,
            "minimal" => Self::Minimal,
            "gaming" => Self::Gaming,
            _ => Self::Modern,
        }
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Modern => "modern",
            Self::Bold => "bold",
            Self::Minimal => "minimal",
            Self::Gaming => "gaming",
        }
    }

    #[must_use]
    pub const fn profile(self) -> StyleProfile {
        match self {
            Self::Modern => StyleProfile {
                style: self,
                alignment: 2,
                font_family: "Arial",
                font_size: 18,
                bold: true,
                primary_color: "&H00FFFFFF",
                outline_color: "&H00000000",
                outline_width: 2,
                shadow_depth: 1,
                vertical_margin: 60,
            },
            Self::Bold => StyleProfile {
                style: self,
                alignment: 2,
                font_family: "Impact",
                font_size: 24,
                bold: true,
                primary_color: "&H0000FFFF",
                outline_color: "&H00000000",
                outline_width: 3,
                shadow_depth: 2,
                vertical_margin: 80,
            },
            Self::Minimal => StyleProfile {
                style: self,
                alignment: 2,
                font_family: "Helvetica",
                font_size: 14,
                bold: false,
                primary_color: "&H00FFFFFF",
                outline_color: "&H00404040",
                outline_width: 1,
                shadow_depth: 0,
                vertical_margin: 40,
            },
            Self::Gaming => StyleProfile {
                style: self,
                alignment: 2,
                font_family: "Arial Black",
                font_size: 22,
                bold: true,
                primary_color: "&H00FFFF00",
                outline_color: "&H00000000",
                outline_width: 3,
                shadow_depth: 2,
                vertical_margin: 70,
            },
        }
    }
}

impl From<String> for CaptionStyle {
    fn from(name: String) -> Self {
        Self::from_name(&name)
    }
}

impl From<CaptionStyle> for String {
    fn from(style: CaptionStyle) -> Self {
        style.name().to_string()
    }
}

impl fmt::Display for CaptionStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// 字幕渲染屬性，顏色為 libass 的 `&HAABBGGRR` 格式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StyleProfile {
    pub style: CaptionStyle,
    /// ASS 對齊編號（2 = 底部置中）
    pub alignment: u8,
    pub font_family: &'static str,
    pub font_size: u32,
    pub bold: bool,
    pub primary_color: &'static str,
    pub outline_color: &'static str,
    pub outline_width: u32,
    pub shadow_depth: u32,
    /// 與畫面下緣的距離
    pub vertical_margin: u32,
}

impl StyleProfile {
    /// 產生 `subtitles` 濾鏡的 `force_style` 參數
    #[must_use]
    pub fn force_style(&self) -> String {
        format!(
            "Alignment={},FontName={},FontSize={},Bold={},PrimaryColour={},OutlineColour={},BorderStyle=1,Outline={},Shadow={},MarginV={}",
            self.alignment,
            self.font_family,
            self.font_size,
            u8::from(self.bold),
            self.primary_color,
            self.outline_color,
            self.outline_width,
            self.shadow_depth,
            self.vertical_margin
        )
    }
}

/// 依名稱取得樣式，未知名稱回傳 modern
#[must_use]
pub fn resolve_style(name: &str) -> StyleProfile {
    CaptionStyle::from_name(name).profile()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_names() {
        assert_eq!(resolve_style("bold").style, CaptionStyle::Bold);
        assert_eq!(resolve_style("Minimal").style, CaptionStyle::Minimal);
        assert_eq!(resolve_style(" gaming ").style, CaptionStyle::Gaming);
    }

    #[test]
    fn test_unknown_names_fall_back_to_modern() {
        let modern = resolve_style("modern");
        for name in ["", "fancy", "MODERNISH", "bold!", "🙂"] {
            assert_eq!(resolve_style(name), modern, "name {name:?}");
        }
    }

    #[test]
    fn test_name_round_trip() {
        for style in CaptionStyle::ALL {
            assert_eq!(CaptionStyle::from_name(style.name()), style);
        }
    }

    #[test]
    fn test_force_style_directive() {
        let directive = resolve_style("modern").force_style();
        assert_eq!(
            directive,
            "Alignment=2,FontName=Arial,FontSize=18,Bold=1,PrimaryColour=&H00FFFFFF,OutlineColour=&H00000000,BorderStyle=1,Outline=2,Shadow=1,MarginV=60"
        );
        assert!(resolve_style("minimal").force_style().contains("Bold=0"));
    }

    #[test]
    fn test_serde_fallback() {
        let style: CaptionStyle = serde_json::from_str("\"gaming\"").unwrap();
        assert_eq!(style, CaptionStyle::Gaming);
        let style: CaptionStyle = serde_json::from_str("\"sparkly\"").unwrap();
        assert_eq!(style, CaptionStyle::Modern);
        assert_eq!(serde_json::to_string(&CaptionStyle::Bold).unwrap(), "\"bold\"");
    }
}
