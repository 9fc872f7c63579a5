//! Job handlers, resolved by job type.
//!
//! Handlers are idempotent in effect: at-least-once delivery means a job
//! can run twice, and a duplicated welcome email is acceptable.

use job_queue::{JobType, NotificationJob};

use crate::error::Result;
use crate::mailer::MailClient;

/// Execute the handler registered for the job's type.
pub async fn execute(mailer: &MailClient, job: &NotificationJob) -> Result<()> {
    match job.job_type {
        JobType::SendRegistrationEmail => send_registration_email(mailer, job).await,
    }
}

async fn send_registration_email(mailer: &MailClient, job: &NotificationJob) -> Result<()> {
    let subject = "Successfully signed up!";
    let text = render_welcome_text(&job.username);
    let html = render_welcome_html(&job.username);

    mailer
        .send(&job.recipient_email, subject, &text, &html)
        .await
}

fn render_welcome_text(username: &str) -> String {
    format!("Hi {}, you have registered!", username)
}

fn render_welcome_html(username: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="UTF-8">
    <style>
        body {{ font-family: Arial, sans-serif; line-height: 1.6; color: #333; }}
        .container {{ max-width: 600px; margin: 0 auto; padding: 20px; }}
        .header {{ background-color: #2b6777; color: white; padding: 20px; text-align: center; border-radius: 5px 5px 0 0; }}
        .content {{ background-color: #f9f9f9; padding: 20px; border-radius: 0 0 5px 5px; }}
    </style>
</head>
<body>
    <div class="container">
        <div class="header">
            <h1>Welcome to Stockroom!</h1>
        </div>
        <div class="content">
            <p>Hi <strong>{}</strong>,</p>
            <p>Your account is ready. You can now sign in and start managing your stores.</p>
        </div>
    </div>
</body>
</html>
"#,
        username
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_welcome_text_mentions_username() {
        let text = render_welcome_text("alice");
        assert_eq!(text, "Hi alice, you have registered!");
    }

    #[test]
    fn test_welcome_html_mentions_username() {
        let html = render_welcome_html("alice");
        assert!(html.contains("<strong>alice</strong>"));
    }
}
