//! SMTP delivery via lettre.

use lettre::{
    message::header::ContentType,
    transport::smtp::{authentication::Credentials, Error as SmtpError},
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use secrecy::{ExposeSecret, SecretString};

use crate::{reset_message, MailError, Mailer, RESET_SUBJECT};

/// SMTP relay settings.
#[derive(Debug, Clone)]
pub struct MailConfig {
    pub smtp_host:     String,
    pub smtp_port:     u16,
    pub smtp_username: String,
    pub smtp_password: SecretString,
    pub from_address:  String,
}

/// Production mailer delivering over STARTTLS.
#[derive(Clone)]
pub struct SmtpMailer {
    transport:    AsyncSmtpTransport<Tokio1Executor>,
    from_address: String,
}

impl SmtpMailer {
    /// Build a mailer from relay settings.
    ///
    /// # Errors
    ///
    /// Fails when the relay host cannot be used as a STARTTLS endpoint.
    /// No connection is made until the first send.
    pub fn new(config: &MailConfig) -> Result<Self, SmtpError> {
        let credentials = Credentials::new(
            config.smtp_username.clone(),
            config.smtp_password.expose_secret().to_string(),
        );

        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)?
            .port(config.smtp_port)
            .credentials(credentials)
            .build();

        Ok(Self {
            transport,
            from_address: config.from_address.clone(),
        })
    }
}

#[async_trait::async_trait]
impl Mailer for SmtpMailer {
    async fn send_password_reset(&self, to: &str, reset_url: &str) -> Result<(), MailError> {
        let email = Message::builder()
            .from(
                self.from_address
                    .parse()
                    .map_err(|_| MailError::InvalidAddress(self.from_address.clone()))?,
            )
            .to(to
                .parse()
                .map_err(|_| MailError::InvalidAddress(to.to_string()))?)
            .subject(RESET_SUBJECT)
            .header(ContentType::TEXT_PLAIN)
            .body(reset_message(reset_url))?;

        self.transport.send(email).await?;

        tracing::info!(to = %to, "Password reset email sent");
        Ok(())
    }
}
