//! 报表渲染
//!
//! 渲染器把模板 ID + 上下文变为最终内容；引擎把渲染器当作不透明的外部
//! 组件，渲染失败与数据源失败走同一条错误路径。

use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::Value;

use crate::directory::ContactSummary;
use crate::report::escape::escape_html;

/// 内置模板 ID
pub const CONTENT_TEMPLATE_ID: &str = "report/content";

/// 渲染上下文：每个数据源的结果、每个数据源的耗时（`time_<key>`）、
/// `total_time_ms` 与 `generated_at`
pub type RenderContext = HashMap<String, Value>;

/// 渲染器接口
#[async_trait]
pub trait Renderer: Send + Sync {
    /// 渲染模板，失败返回错误描述
    async fn render(&self, template_id: &str, context: &RenderContext) -> Result<String, String>;
}

/// 内置 HTML 渲染器：只认识 report/content 模板
pub struct HtmlRenderer;

#[async_trait]
impl Renderer for HtmlRenderer {
    async fn render(&self, template_id: &str, context: &RenderContext) -> Result<String, String> {
        if template_id != CONTENT_TEMPLATE_ID {
            return Err(format!("unknown template: {}", template_id));
        }

        let user_count = context
            .get("user_count")
            .and_then(Value::as_u64)
            .ok_or_else(|| "context missing user_count".to_string())?;
        let contacts_value = context
            .get("contacts")
            .ok_or_else(|| "context missing contacts".to_string())?;
        let contacts: Vec<ContactSummary> = serde_json::from_value(contacts_value.clone())
            .map_err(|e| format!("bad contacts value: {}", e))?;

        let time_users = context
            .get("time_user_count")
            .and_then(Value::as_u64)
            .unwrap_or(0);
        let time_contacts = context
            .get("time_contacts")
            .and_then(Value::as_u64)
            .unwrap_or(0);
        let total_ms = context
            .get("total_time_ms")
            .and_then(Value::as_u64)
            .unwrap_or(0);
        let generated_at = context
            .get("generated_at")
            .and_then(Value::as_i64)
            .and_then(chrono::DateTime::from_timestamp_millis)
            .map(|t| t.to_rfc3339())
            .unwrap_or_default();

        let mut html = String::new();
        html.push_str("<div class='report'>\n");
        html.push_str("<h2>Contact directory report</h2>\n");
        html.push_str(&format!(
            "<p>Total users: <strong>{}</strong></p>\n",
            user_count
        ));
        html.push_str(&format!(
            "<p>Contacts listed: <strong>{}</strong></p>\n",
            contacts.len()
        ));
        html.push_str("<table class='contacts'>\n");
        html.push_str("<tr><th>Name</th><th>Email</th><th>Favorite</th></tr>\n");
        for contact in &contacts {
            html.push_str(&format!(
                "<tr><td>{}</td><td>{}</td><td>{}</td></tr>\n",
                escape_html(&contact.display_name),
                escape_html(contact.email.as_deref().unwrap_or("-")),
                if contact.is_favorite { "★" } else { "" },
            ));
        }
        html.push_str("</table>\n");
        html.push_str(&format!(
            "<p class='timings'>users: {} ms, contacts: {} ms, total: {} ms</p>\n",
            time_users, time_contacts, total_ms
        ));
        html.push_str(&format!(
            "<p class='generated'>Generated at {}</p>\n",
            generated_at
        ));
        html.push_str("</div>\n");

        Ok(html)
    }
}
