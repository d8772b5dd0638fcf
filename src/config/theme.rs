// src/config/theme.rs
// 系统默认主题配置，前端外壳启动时读取一次，之后只读。

use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// 导航布局模式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum Layout {
    // 左侧菜单
    #[default]
    #[serde(alias = "siderbar")]
    Sidebar,
    // 左侧 + 顶部菜单
    #[serde(alias = "mix")]
    Mixed,
    // 顶部菜单
    Top,
    // 双列菜单
    #[serde(alias = "mixbar")]
    DualColumn,
}

/// 主题配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeConfig {
    pub layout: Layout,
    // 固定头部
    pub fix_header: bool,
    // 菜单宽度 (CSS 长度)
    pub menu_width: String,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            layout: Layout::Sidebar,
            fix_header: true,
            menu_width: "266px".to_string(),
        }
    }
}

impl ThemeConfig {
    /// 从 YAML 文本解析主题 (外壳自带主题文件时使用)
    pub fn from_yaml(content: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(content)
    }
}

/// 导出默认主题配置
pub fn sys_theme() -> &'static ThemeConfig {
    static THEME: OnceLock<ThemeConfig> = OnceLock::new();
    THEME.get_or_init(ThemeConfig::default)
}
