// ==========================================
// Notification layer
// ==========================================
// Composes HTML table emails from either an open-task list or a
// key/value plan-summary list and hands them to a MailTransport.
// SMTP delivery itself is an external collaborator behind the trait.
// ==========================================

use crate::domain::planning::OpenTaskRow;
use thiserror::Error;

// ==========================================
// Transport contract
// ==========================================
#[derive(Error, Debug)]
pub enum NotifyError {
    #[error("mail transport failed: {0}")]
    TransportFailed(String),
}

pub type NotifyResult<T> = Result<T, NotifyError>;

#[derive(Debug, Clone, PartialEq)]
pub struct EmailMessage {
    pub to: Vec<String>,
    pub subject: String,
    pub html_body: String,
}

/// SMTP sender contract; implementations live outside the engine
pub trait MailTransport: Send + Sync {
    fn send(&self, message: &EmailMessage) -> NotifyResult<()>;
}

// ==========================================
// EmailComposer
// ==========================================
pub struct EmailComposer;

impl EmailComposer {
    /// Compose the open-task email (overdue / upcoming shipments)
    pub fn open_tasks(to: Vec<String>, subject: &str, tasks: &[OpenTaskRow]) -> EmailMessage {
        let headers = ["Item", "Customer", "Open qty", "Requested", "Note"];
        let rows: Vec<Vec<String>> = tasks
            .iter()
            .map(|t| {
                vec![
                    t.item.clone(),
                    t.customer_name.clone(),
                    format!("{}", t.open_qty),
                    t.requested_date
                        .map(|d| d.format("%Y-%m-%d").to_string())
                        .unwrap_or_default(),
                    t.note.clone(),
                ]
            })
            .collect();

        EmailMessage {
            to,
            subject: subject.to_string(),
            html_body: html_table(&headers, &rows),
        }
    }

    /// Compose the plan-summary email from key/value pairs
    pub fn plan_summary(
        to: Vec<String>,
        subject: &str,
        pairs: &[(String, String)],
    ) -> EmailMessage {
        let headers = ["Figure", "Value"];
        let rows: Vec<Vec<String>> = pairs
            .iter()
            .map(|(k, v)| vec![k.clone(), v.clone()])
            .collect();

        EmailMessage {
            to,
            subject: subject.to_string(),
            html_body: html_table(&headers, &rows),
        }
    }
}

/// Render a bordered HTML table, header row first
fn html_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut html = String::from("<table border=\"1\" cellpadding=\"4\" cellspacing=\"0\">\n");

    html.push_str("  <tr>");
    for h in headers {
        html.push_str(&format!("<th>{}</th>", escape(h)));
    }
    html.push_str("</tr>\n");

    for row in rows {
        html.push_str("  <tr>");
        for cell in row {
            html.push_str(&format!("<td>{}</td>", escape(cell)));
        }
        html.push_str("</tr>\n");
    }

    html.push_str("</table>\n");
    html
}

fn escape(raw: &str) -> String {
    raw.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_task_table_has_header_and_rows() {
        let tasks = vec![OpenTaskRow {
            item: "ITEM-1".to_string(),
            customer_name: "Acme <Kft>".to_string(),
            open_qty: 120.0,
            requested_date: None,
            note: "overdue".to_string(),
        }];
        let msg = EmailComposer::open_tasks(vec!["a@b.c".to_string()], "Open tasks", &tasks);

        assert!(msg.html_body.contains("<th>Item</th>"));
        assert!(msg.html_body.contains("<td>ITEM-1</td>"));
        assert!(msg.html_body.contains("Acme &lt;Kft&gt;"));
        assert_eq!(msg.html_body.matches("<tr>").count(), 2);
    }

    #[test]
    fn test_plan_summary_renders_pairs() {
        let pairs = vec![("Output plan sales".to_string(), "12 500 EUR".to_string())];
        let msg = EmailComposer::plan_summary(vec!["a@b.c".to_string()], "Summary", &pairs);

        assert!(msg.html_body.contains("<td>Output plan sales</td>"));
        assert!(msg.html_body.contains("<td>12 500 EUR</td>"));
    }
}
