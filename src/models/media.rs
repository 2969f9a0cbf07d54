//! 图片题的图片信息

/// 图片对齐方式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alignment {
    Left,
    Center,
    Right,
}

impl Alignment {
    pub fn from_code(code: Option<i64>) -> Option<Self> {
        match code? {
            0 => Some(Alignment::Left),
            1 => Some(Alignment::Center),
            2 => Some(Alignment::Right),
            _ => None,
        }
    }
}

/// 图片
///
/// 内嵌数据里只有内部 ID 和尺寸，地址要从页面 HTML 中找
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImageObject {
    pub id: Option<String>,
    pub width: Option<i64>,
    pub height: Option<i64>,
    pub alignment: Option<Alignment>,
    /// 图片地址，只有图片所在的页面被加载过才有
    pub url: Option<String>,
}

impl ImageObject {
    pub fn size_str(&self) -> Option<String> {
        Some(format!("{}x{}", self.width?, self.height?))
    }

    pub fn to_str(&self) -> String {
        let mut text = "<图片".to_string();
        if let Some(size) = self.size_str() {
            text.push_str(&format!(" ({})", size));
        }
        if let Some(url) = &self.url {
            text.push_str(&format!(": {}", url));
        }
        text.push('>');
        text
    }
}
