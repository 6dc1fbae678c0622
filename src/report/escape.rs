//! HTML 转义
//!
//! 错误说明会嵌入报表内容；嵌入前把 & < > " ' 五个字符替换为实体，
//! 避免错误路径向渲染输出引入未转义的标记。

/// 将 & < > " ' 替换为对应的 HTML 实体
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
