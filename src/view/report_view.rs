use crate::entity::{PriceReport, ReportLine};
use crate::utils::format_price;
use anyhow::Result;
use async_trait::async_trait;
use teloxide::{prelude::*, types::ParseMode, utils::html, Bot};

/// Outbound channel for scheduled reports
#[async_trait]
pub trait MessageTransport: Send + Sync {
    async fn send_report(&self, user_id: i64, html_text: &str) -> Result<()>;
}

pub struct TelegramTransport {
    bot: Bot,
}

impl TelegramTransport {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }
}

#[async_trait]
impl MessageTransport for TelegramTransport {
    async fn send_report(&self, user_id: i64, html_text: &str) -> Result<()> {
        self.bot
            .send_message(ChatId(user_id), html_text)
            .parse_mode(ParseMode::Html)
            .await?;

        Ok(())
    }
}

pub fn format_report_line(line: &ReportLine) -> String {
    format!(
        "<b>{}</b>: ${}\n{} {}\n",
        html::escape(&line.symbol),
        format_price(line.price),
        line.change.direction.indicator(),
        line.change.format_percent()
    )
}

/// Header plus one block per asset, ready for HTML parse mode
pub fn format_report(report: &PriceReport) -> String {
    let header = format!("📊 <b>Report for {}</b>\n\n", report.date.format("%Y-%m-%d"));
    let lines: Vec<String> = report.lines.iter().map(format_report_line).collect();

    header + &lines.join("\n")
}
