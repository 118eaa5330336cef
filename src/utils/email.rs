use lettre::message::{MultiPart, SinglePart, header};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};
use lousa_config::EmailConfig;
use lousa_core::AppError;
use tracing::{debug, info, instrument};

/// Sends account emails over SMTP.
///
/// When [`EmailConfig::enabled`] is false nothing is sent. The reset link of
/// an unsent email is only logged at `debug`, so local development can still
/// pick it up with `RUST_LOG=lousa=debug`.
pub struct EmailService {
    config: EmailConfig,
}

impl EmailService {
    pub fn new(config: EmailConfig) -> Self {
        Self { config }
    }

    #[instrument(skip(self, reset_token))]
    pub async fn send_password_reset_email(
        &self,
        to_email: &str,
        to_name: &str,
        reset_token: &str,
        ttl_hours: i64,
    ) -> Result<(), AppError> {
        let reset_link = self.config.reset_link(reset_token);

        let html_body = password_reset_template(to_name, &reset_link, ttl_hours);
        let text_body = format!(
            "Hi {},\n\n\
             We received a request to reset your Lousa password.\n\n\
             Open the link below to choose a new password:\n\
             {}\n\n\
             This link expires in {} hours and can be used once.\n\n\
             If you didn't request this, you can ignore this email.",
            to_name, reset_link, ttl_hours
        );

        if !self.config.enabled {
            info!(to = %to_email, "SMTP disabled, password reset email not sent");
            debug!(reset_link = %reset_link, "Unsent password reset link");
            return Ok(());
        }

        self.send_email(to_email, "Reset your password", &text_body, &html_body)
            .await
    }

    #[instrument(skip(self))]
    pub async fn send_password_reset_confirmation(
        &self,
        to_email: &str,
        to_name: &str,
    ) -> Result<(), AppError> {
        if !self.config.enabled {
            info!(to = %to_email, "SMTP disabled, password reset confirmation not sent");
            return Ok(());
        }

        let html_body = password_reset_confirmation_template(to_name);
        let text_body = format!(
            "Hi {},\n\n\
             Your Lousa password was just changed.\n\n\
             If you didn't make this change, contact your school administrator immediately.",
            to_name
        );

        self.send_email(to_email, "Your password was changed", &text_body, &html_body)
            .await
    }

    #[instrument(skip(self, html_body, text_body))]
    async fn send_email(
        &self,
        to_email: &str,
        subject: &str,
        text_body: &str,
        html_body: &str,
    ) -> Result<(), AppError> {
        let from = format!("{} <{}>", self.config.from_name, self.config.from_email);

        let email = Message::builder()
            .from(
                from.parse()
                    .map_err(|e| AppError::internal_error(format!("Invalid from email: {}", e)))?,
            )
            .to(to_email
                .parse()
                .map_err(|e| AppError::internal_error(format!("Invalid to email: {}", e)))?)
            .subject(subject)
            .multipart(
                MultiPart::alternative()
                    .singlepart(
                        SinglePart::builder()
                            .header(header::ContentType::TEXT_PLAIN)
                            .body(text_body.to_string()),
                    )
                    .singlepart(
                        SinglePart::builder()
                            .header(header::ContentType::TEXT_HTML)
                            .body(html_body.to_string()),
                    ),
            )
            .map_err(|e| AppError::internal_error(format!("Failed to build email: {}", e)))?;

        let mailer = if self.config.smtp_username.is_empty() {
            SmtpTransport::builder_dangerous(&self.config.smtp_host)
                .port(self.config.smtp_port)
                .build()
        } else {
            let creds = Credentials::new(
                self.config.smtp_username.clone(),
                self.config.smtp_password.clone(),
            );

            SmtpTransport::relay(&self.config.smtp_host)
                .map_err(|e| {
                    AppError::internal_error(format!("Failed to create SMTP relay: {}", e))
                })?
                .port(self.config.smtp_port)
                .credentials(creds)
                .build()
        };

        tokio::task::spawn_blocking(move || mailer.send(&email))
            .await
            .map_err(|e| AppError::internal_error(format!("Task join error: {}", e)))?
            .map_err(|e| AppError::internal_error(format!("Failed to send email: {}", e)))?;

        info!(to = %to_email, subject = %subject, "Email sent");
        Ok(())
    }
}

fn layout(title: &str, accent: &str, content: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
</head>
<body style="margin: 0; padding: 24px; font-family: Arial, sans-serif; background-color: #f4f4f4;">
    <div style="max-width: 560px; margin: 0 auto; background-color: #ffffff; border-radius: 8px; overflow: hidden;">
        <div style="background-color: {accent}; padding: 24px; text-align: center; color: #ffffff; font-size: 24px;">Lousa</div>
        <div style="padding: 32px; color: #444444; font-size: 15px; line-height: 1.5;">
            <h2 style="margin-top: 0; color: #222222;">{title}</h2>
            {content}
        </div>
    </div>
</body>
</html>"#
    )
}

fn password_reset_template(name: &str, reset_link: &str, ttl_hours: i64) -> String {
    layout(
        "Reset your password",
        "#1F6FEB",
        &format!(
            r#"<p>Hi <strong>{name}</strong>,</p>
            <p>We received a request to reset your password.</p>
            <p style="text-align: center; margin: 28px 0;">
                <a href="{reset_link}" style="padding: 12px 32px; background-color: #1F6FEB; color: #ffffff; text-decoration: none; border-radius: 6px;">Choose a new password</a>
            </p>
            <p style="word-break: break-all; font-size: 13px;">{reset_link}</p>
            <p><strong>This link expires in {ttl_hours} hours and can be used once.</strong></p>
            <p>If you didn't request this, you can ignore this email.</p>"#
        ),
    )
}

fn password_reset_confirmation_template(name: &str) -> String {
    layout(
        "Password changed",
        "#10B981",
        &format!(
            r#"<p>Hi <strong>{name}</strong>,</p>
            <p>Your password was just changed. You can now sign in with the new one.</p>
            <p>If you didn't make this change, contact your school administrator immediately.</p>"#
        ),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::sync::{Arc, Mutex};
    use tracing::Level;

    #[test]
    fn test_reset_template_contains_link_and_ttl() {
        let html = password_reset_template(
            "Ana",
            "http://localhost:3000/auth/reset-password?token=abc",
            24,
        );
        assert!(html.contains("Ana"));
        assert!(html.contains("token=abc"));
        assert!(html.contains("expires in 24 hours"));
    }

    fn disabled_config() -> EmailConfig {
        EmailConfig {
            enabled: false,
            smtp_host: "unreachable.invalid".to_string(),
            smtp_port: 1,
            smtp_username: String::new(),
            smtp_password: String::new(),
            from_email: "noreply@lousa.app".to_string(),
            from_name: "Lousa".to_string(),
            frontend_url: "http://localhost:3000".to_string(),
        }
    }

    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_disabled_service_keeps_token_out_of_info_logs() {
        let logs = CapturedLogs::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(Level::INFO)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();
        let _guard = tracing::subscriber::set_default(subscriber);

        EmailService::new(disabled_config())
            .send_password_reset_email("ana@x.com", "Ana", "raw-secret-token", 24)
            .await
            .unwrap();

        let output = String::from_utf8(logs.0.lock().unwrap().clone()).unwrap();
        assert!(output.contains("password reset email not sent"));
        assert!(!output.contains("raw-secret-token"));
    }

    #[tokio::test]
    async fn test_disabled_service_does_not_send() {
        let service = EmailService::new(disabled_config());

        assert!(
            service
                .send_password_reset_email("ana@x.com", "Ana", "token", 24)
                .await
                .is_ok()
        );
        assert!(
            service
                .send_password_reset_confirmation("ana@x.com", "Ana")
                .await
                .is_ok()
        );
    }
}
