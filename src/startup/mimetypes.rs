use std::collections::HashMap;
use std::path::Path;

/// 平台额外注册的字体类型
const PLATFORM_TYPES: [(&str, &str); 4] = [
    ("eot", "application/vnd.ms-fontobject"),
    ("otf", "application/x-font-opentype"),
    ("ttf", "application/x-font-ttf"),
    ("woff", "application/font-woff"),
];

/// 扩展名到 MIME 类型的映射
#[derive(Debug, Clone, Default)]
pub struct MimeTypes {
    types: HashMap<String, String>,
}

impl MimeTypes {
    pub fn with_platform_types() -> Self {
        let mut mime_types = Self::default();
        for (ext, mime) in PLATFORM_TYPES {
            mime_types.add_type(mime, ext);
        }
        mime_types
    }

    /// 扩展名可带或不带前导点，大小写不敏感
    pub fn add_type(&mut self, mime: &str, ext: &str) {
        let ext = ext.trim_start_matches('.').to_ascii_lowercase();
        self.types.insert(ext, mime.to_string());
    }

    pub fn guess(&self, path: impl AsRef<Path>) -> Option<&str> {
        let ext = path.as_ref().extension()?.to_str()?.to_ascii_lowercase();
        self.types.get(&ext).map(String::as_str)
    }
}
